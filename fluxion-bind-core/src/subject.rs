// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, multi-subscriber subject.
//!
//! A [`Subject`] is the sink every event adapter pushes into. Each subscriber
//! gets its own unbounded channel, so a single underlying listener can feed
//! any number of consumers without being registered twice.
//!
//! ## Characteristics
//!
//! - **Hot**: late subscribers only see items sent after they subscribed.
//! - **Unbounded**: a push never blocks the event that triggered it.
//! - **Shared**: clones share the same state.
//! - **Terminal**: an error or [`Subject::close`] completes every subscriber.
//!
//! ## Example
//!
//! ```
//! use fluxion_bind_core::{StreamItem, Subject};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let subject = Subject::<i32>::new();
//! let mut stream = subject.subscribe().unwrap();
//!
//! subject.next(1).unwrap();
//! subject.close();
//!
//! assert_eq!(stream.next().await, Some(StreamItem::Value(1)));
//! assert_eq!(stream.next().await, None);
//! # }
//! ```

use crate::{FluxionError, Observable, StreamItem, SubjectError};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use parking_lot::Mutex;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

struct SubjectState<T> {
    closed: bool,
    next_id: u64,
    senders: Vec<(u64, UnboundedSender<StreamItem<T>>)>,
}

/// A hot, unbounded subject that broadcasts items to all current subscribers.
pub struct Subject<T: Clone + Send + 'static> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T: Clone + Send + 'static> Subject<T> {
    /// Creates an open subject with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                closed: false,
                next_id: 0,
                senders: Vec::new(),
            })),
        }
    }

    /// Subscribe and receive every item sent from now on.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn subscribe(&self) -> Result<SubjectStream<T>, SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        let (tx, rx) = mpsc::unbounded();
        let id = state.next_id;
        state.next_id += 1;
        state.senders.push((id, tx));

        Ok(SubjectStream {
            id,
            rx,
            state: Arc::downgrade(&self.state),
        })
    }

    /// Send an item to all active subscribers, in subscription order.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn send(&self, item: StreamItem<T>) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        state
            .senders
            .retain(|(_, tx)| tx.unbounded_send(item.clone()).is_ok());
        Ok(())
    }

    /// Send a value to all active subscribers.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has been closed.
    pub fn next(&self, value: T) -> Result<(), SubjectError> {
        self.send(StreamItem::Value(value))
    }

    /// Send an error to all subscribers and close the subject.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject was already closed.
    pub fn error(&self, err: FluxionError) -> Result<(), SubjectError> {
        let result = self.send(StreamItem::Error(err));
        self.close();
        result
    }

    /// Completes every subscriber stream. Idempotent.
    ///
    /// Items already sent stay in the subscribers' channels and are still
    /// delivered before the end of the stream.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.senders.clear();
    }

    /// Returns `true` once the subject has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of live subscribers. Dropped [`SubjectStream`]s are removed
    /// immediately.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().senders.len()
    }

    /// A read-only handle on this subject.
    #[must_use]
    pub fn observable(&self) -> Observable<T> {
        Observable::from_subject(self.clone())
    }

    /// `true` when both handles share the same underlying subject.
    #[must_use]
    pub fn same_subject(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl<T: Clone + Send + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Subject")
            .field("closed", &state.closed)
            .field("subscribers", &state.senders.len())
            .finish()
    }
}

/// The receiving end of one subscription to a [`Subject`].
///
/// Dropping it unregisters the subscriber.
pub struct SubjectStream<T> {
    id: u64,
    rx: UnboundedReceiver<StreamItem<T>>,
    state: Weak<Mutex<SubjectState<T>>>,
}

impl<T> Stream for SubjectStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

impl<T> Drop for SubjectStream<T> {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.lock().senders.retain(|(id, _)| *id != self.id);
        }
    }
}
