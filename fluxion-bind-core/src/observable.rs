// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Read side of a subject, and conversions between plain streams and
//! streams of [`StreamItem`].
//!
//! Operators come from `futures::StreamExt`; this module only bridges the
//! value/error representation.

use crate::{FluxionError, StreamItem, Subject, SubjectError, SubjectStream};
use futures::future;
use futures::stream::{BoxStream, Stream, StreamExt};

/// A hot observable backed by a shared [`Subject`].
///
/// It can be subscribed any number of times. Every subscription observes the
/// same sequence; the producer behind it is attached only once.
pub struct Observable<T: Clone + Send + 'static> {
    subject: Subject<T>,
}

impl<T: Clone + Send + 'static> Observable<T> {
    pub(crate) fn from_subject(subject: Subject<T>) -> Self {
        Self { subject }
    }

    /// Start receiving items.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` once the producer has been torn down.
    pub fn subscribe(&self) -> Result<SubjectStream<T>, SubjectError> {
        self.subject.subscribe()
    }

    /// Start receiving plain values. The stream ends at the first error.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` once the producer has been torn down.
    pub fn values(&self) -> Result<BoxStream<'static, T>, SubjectError> {
        Ok(self.subscribe()?.values())
    }

    /// Returns `true` once the producer has been torn down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.subject.is_closed()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subject.subscriber_count()
    }

    /// `true` when both observables are fed by the same subject.
    #[must_use]
    pub fn shares_source_with(&self, other: &Self) -> bool {
        self.subject.same_subject(&other.subject)
    }
}

impl<T: Clone + Send + 'static> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            subject: self.subject.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("subject", &self.subject)
            .finish()
    }
}

/// Wraps plain streams so they can be bound to component state.
pub trait IntoObservable<T>: Stream<Item = T> + Sized {
    /// Every item becomes `StreamItem::Value`.
    fn into_observable(self) -> BoxStream<'static, StreamItem<T>>
    where
        Self: Send + 'static,
        T: Send + 'static,
    {
        self.map(StreamItem::Value).boxed()
    }
}

impl<T, S: Stream<Item = T> + Sized> IntoObservable<T> for S {}

/// Helpers for streams of [`StreamItem`].
pub trait ObservableExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Unwrap values; the stream ends at the first error.
    fn values(self) -> BoxStream<'static, T>
    where
        Self: Send + 'static,
        T: Send + 'static,
    {
        self.take_while(|item| future::ready(!item.is_error()))
            .filter_map(|item| future::ready(item.ok()))
            .boxed()
    }

    /// Apply `f` to values, passing errors through.
    fn map_values<U, F>(self, mut f: F) -> BoxStream<'static, StreamItem<U>>
    where
        Self: Send + 'static,
        T: 'static,
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        self.map(move |item| item.map(&mut f)).boxed()
    }

    /// Turn every value into the result of `f`, an `Err` becoming a stream error.
    fn try_map_values<U, F>(self, mut f: F) -> BoxStream<'static, StreamItem<U>>
    where
        Self: Send + 'static,
        T: 'static,
        U: Send + 'static,
        F: FnMut(T) -> Result<U, FluxionError> + Send + 'static,
    {
        self.map(move |item| match item {
            StreamItem::Value(value) => StreamItem::from(f(value)),
            StreamItem::Error(err) => StreamItem::Error(err),
        })
        .boxed()
    }
}

impl<T, S: Stream<Item = StreamItem<T>> + Sized> ObservableExt<T> for S {}
