// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Bind push-based streams to the state, events and lifecycle of UI
//! components.
//!
//! A component declares streams in its [`RxOptions`]; [`FluxionBind::install`]
//! binds each one to a reactive property, turns declared methods and
//! directive-bound DOM events into streams, and cancels everything when the
//! component is destroyed.
//!
//! ```
//! use fluxion_bind::{FluxionBind, RxOptions};
//! use fluxion_bind_core::IntoObservable;
//! use fluxion_bind_test_utils::TestRuntime;
//! use futures::stream;
//! use serde_json::json;
//!
//! let runtime = TestRuntime::new();
//! let component = runtime.component("greeter");
//! let host = component.handle().unwrap();
//!
//! let options = RxOptions::new()
//!     .subscription("msg", stream::iter(vec![json!("hello")]).into_observable());
//! FluxionBind::new().install(host, options).unwrap();
//!
//! runtime.tick();
//! assert_eq!(component.rendered("msg"), Some(json!("hello")));
//! ```
//!
//! Delivery happens on the host's event loop: adapters push into their
//! subjects synchronously when an event fires, bound keys are written when
//! the loop runs the subscriber tasks, and the host renders afterwards.

mod adapters;
mod binder;
mod config;
mod directive;
mod events;
mod options;
mod rx;
mod subject_table;

pub use self::adapters::DomTarget;
pub use self::config::BindConfig;
pub use self::directive::StreamDirective;
pub use self::events::{
    CallArg, DomStreamItem, Envelope, FrameworkEvent, MethodCall, TriggeredEvent, WatchChange,
};
pub use self::options::{BoxObservable, ObservableMethods, RxOptions, StreamMap};
pub use self::rx::{ComponentRx, FluxionBind};

pub use fluxion_bind_core::{
    BindingError, FluxionError, IntoObservable, LifecycleError, Observable, ObservableExt,
    Observer, Result, StreamItem, StreamRuntimeError, Subject, Subscription,
};
