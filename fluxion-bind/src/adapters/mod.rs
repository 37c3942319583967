// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Turn imperative event sources into hot observables.
//!
//! Every adapter attaches exactly one listener to its source, pushes into a
//! fresh [`Subject`](fluxion_bind_core::Subject) and registers a teardown
//! that detaches the listener and completes the subject. Handlers never block
//! and never fail: an emission into a subject without subscribers is simply
//! dropped.

mod dom_event;
mod framework_event;
mod method;
mod watch;

pub use self::dom_event::DomTarget;
