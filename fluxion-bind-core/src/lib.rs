// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core types for binding push-based streams to component lifecycles.
//!
//! - [`Subject`] / [`Observable`]: hot multicast sources fed by event adapters
//! - [`Subscription`]: idempotent cancellable handle
//! - [`SubscriptionRegistry`]: per-component teardown point
//! - [`Observer`]: next/error/complete callbacks
//! - error taxonomy rooted at [`FluxionError`]

#[macro_use]
mod logging;

pub mod error;
pub mod observable;
pub mod observer;
pub mod registry;
pub mod stream_item;
pub mod subject;
pub mod subject_error;
pub mod subscription;

pub use self::error::{BindingError, FluxionError, LifecycleError, Result, StreamRuntimeError};
pub use self::observable::{IntoObservable, Observable, ObservableExt};
pub use self::observer::Observer;
pub use self::registry::SubscriptionRegistry;
pub use self::stream_item::StreamItem;
pub use self::subject::{Subject, SubjectStream};
pub use self::subject_error::SubjectError;
pub use self::subscription::{Cancelled, Subscription};

#[doc(hidden)]
pub mod __private {
    #[cfg(feature = "tracing")]
    pub use tracing;
}
