// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::FluxionError;

/// A stream item that can be either a value or an error.
///
/// Bound streams carry `StreamItem<T>` so a failure can travel through the
/// same channel as the values. An error terminates the sequence for whoever
/// consumes it.
#[derive(Debug, Clone)]
pub enum StreamItem<T> {
    /// A successful value
    Value(T),
    /// An error that terminates the stream
    Error(FluxionError),
}

impl<T> StreamItem<T> {
    /// Transform the value, leaving an error untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> StreamItem<U> {
        match self {
            Self::Value(value) => StreamItem::Value(f(value)),
            Self::Error(err) => StreamItem::Error(err),
        }
    }

    /// Returns the value, discarding an error.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// `true` for [`StreamItem::Error`].
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl<T> From<Result<T, FluxionError>> for StreamItem<T> {
    fn from(result: Result<T, FluxionError>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(err) => Self::Error(err),
        }
    }
}

impl<T: PartialEq> PartialEq for StreamItem<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StreamItem::Value(a), StreamItem::Value(b)) => a == b,
            _ => false, // Errors are never equal
        }
    }
}
