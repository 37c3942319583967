// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! An in-memory component host for testing stream bindings.
//!
//! [`TestRuntime`] plays the role of the UI framework's event loop: it owns a
//! small DOM, queues spawned tasks and renders dirty components when the test
//! calls [`TestRuntime::tick`]. [`TestComponent`] implements
//! [`ComponentHost`](fluxion_bind_host::ComponentHost).
//!
//! ```
//! use fluxion_bind_host::{json, ComponentHost};
//! use fluxion_bind_test_utils::TestRuntime;
//!
//! let runtime = TestRuntime::new();
//! let counter = runtime.component("counter");
//! counter.data("count", json!(0));
//!
//! counter.set("count", json!(1));
//! assert_eq!(counter.rendered("count"), None);
//!
//! runtime.tick();
//! assert_eq!(counter.rendered("count"), Some(json!(1)));
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod component;
mod dom;
pub mod helpers;
pub mod runtime;
pub mod scheduler;

pub use component::TestComponent;
pub use helpers::{is_terminated, ready_items};
pub use runtime::TestRuntime;
