// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Single-threaded task queue driven explicitly by the test.

use fluxion_bind_host::Task;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::task::{waker, ArcWake};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

#[derive(Default)]
struct WakeFlag {
    woken: AtomicBool,
}

impl ArcWake for WakeFlag {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.woken.store(true, Ordering::Release);
    }
}

/// Runs spawned tasks when [`run_until_stalled`](Self::run_until_stalled)
/// is called and never otherwise.
#[derive(Default)]
pub struct Scheduler {
    incoming: Mutex<Vec<Task>>,
    running: Mutex<FuturesUnordered<Task>>,
}

impl Scheduler {
    pub fn spawn(&self, task: Task) {
        self.incoming.lock().push(task);
    }

    /// Poll every task until none can make progress. Returns the number of
    /// tasks that finished.
    pub fn run_until_stalled(&self) -> usize {
        let flag = Arc::new(WakeFlag::default());
        let waker = waker(flag.clone());
        let mut cx = Context::from_waker(&waker);
        let mut finished = 0;

        // Tasks spawned while polling land in `incoming`, never in `running`
        let mut running = self.running.lock();
        loop {
            let spawned = std::mem::take(&mut *self.incoming.lock());
            running.extend(spawned);

            flag.woken.store(false, Ordering::Release);
            match running.poll_next_unpin(&mut cx) {
                Poll::Ready(Some(())) => finished += 1,
                Poll::Ready(None) => {
                    if self.incoming.lock().is_empty() {
                        break;
                    }
                }
                Poll::Pending => {
                    if !flag.woken.load(Ordering::Acquire) && self.incoming.lock().is_empty() {
                        break;
                    }
                }
            }
        }
        finished
    }

    /// Tasks that have been spawned and have not finished yet.
    pub fn pending(&self) -> usize {
        self.incoming.lock().len() + self.running.lock().len()
    }
}
