// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cancellable subscription handle.
//!
//! A [`Subscription`] is shared between whoever holds it (usually a
//! [`SubscriptionRegistry`](crate::SubscriptionRegistry)) and the work it
//! controls. The work either polls [`Subscription::is_closed`] or awaits
//! [`Subscription::cancelled`]; the holder calls
//! [`Subscription::unsubscribe`].

use event_listener::{Event, EventListener};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

type Teardown = Box<dyn FnOnce() + Send>;

struct Inner {
    closed: AtomicBool,
    event: Event,
    teardown: Mutex<Option<Teardown>>,
}

/// Handle to one active consumer or one attached listener.
///
/// Cloning yields another handle to the same subscription. Unsubscribing is
/// idempotent: the teardown runs exactly once, whichever clone asks first.
///
/// # Example
///
/// ```
/// use fluxion_bind_core::Subscription;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let calls = Arc::new(AtomicUsize::new(0));
/// let counter = calls.clone();
/// let subscription = Subscription::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// subscription.unsubscribe();
/// subscription.unsubscribe();
///
/// assert!(subscription.is_closed());
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<Inner>,
}

impl Subscription {
    /// A subscription that runs `teardown` when cancelled.
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self::with_teardown(Some(Box::new(teardown)))
    }

    /// A subscription with nothing to tear down; its work watches the flag.
    #[must_use]
    pub fn token() -> Self {
        Self::with_teardown(None)
    }

    fn with_teardown(teardown: Option<Teardown>) -> Self {
        Self {
            inner: Arc::new(Inner {
                closed: AtomicBool::new(false),
                event: Event::new(),
                teardown: Mutex::new(teardown),
            }),
        }
    }

    /// Cancel the subscription.
    ///
    /// The flag is set before the teardown runs, so work observing it stops
    /// delivering immediately. Later calls do nothing.
    pub fn unsubscribe(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        self.inner.event.notify(usize::MAX);

        // Take the closure out first so it never runs under the lock
        let teardown = self.inner.teardown.lock().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    /// Returns `true` once [`unsubscribe`](Self::unsubscribe) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Resolves when the subscription is cancelled.
    pub fn cancelled(&self) -> Cancelled {
        Cancelled {
            subscription: self.clone(),
            listener: None,
        }
    }

    /// `true` when both handles control the same subscription.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Future returned by [`Subscription::cancelled`].
pub struct Cancelled {
    subscription: Subscription,
    listener: Option<EventListener>,
}

impl Future for Cancelled {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.subscription.is_closed() {
            return Poll::Ready(());
        }

        if self.listener.is_none() {
            self.listener = Some(self.subscription.inner.event.listen());

            // unsubscribe() may have run between the check and listen()
            if self.subscription.is_closed() {
                return Poll::Ready(());
            }
        }

        match self.listener.as_mut() {
            Some(listener) => Pin::new(listener).poll(cx),
            None => Poll::Pending,
        }
    }
}
