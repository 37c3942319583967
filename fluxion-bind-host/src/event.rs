// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{ElementId, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct EventFlags {
    propagation_stopped: AtomicBool,
    default_prevented: AtomicBool,
}

/// A native DOM event as dispatched by the host.
///
/// Clones share the propagation and default-action flags, so a listener that
/// stops propagation is seen by the dispatcher holding the original.
#[derive(Debug, Clone)]
pub struct NativeEvent {
    kind: String,
    target: ElementId,
    detail: Value,
    flags: Arc<EventFlags>,
}

impl NativeEvent {
    /// An event of type `kind` fired at `target`.
    pub fn new(kind: impl Into<String>, target: ElementId) -> Self {
        Self {
            kind: kind.into(),
            target,
            detail: Value::Null,
            flags: Arc::default(),
        }
    }

    /// Attach event-specific data (key code, pointer position, ...).
    #[must_use]
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = detail;
        self
    }

    /// The event type, e.g. `"click"`.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The element the event was fired at.
    #[must_use]
    pub const fn target(&self) -> ElementId {
        self.target
    }

    /// Event-specific data.
    #[must_use]
    pub const fn detail(&self) -> &Value {
        &self.detail
    }

    pub fn stop_propagation(&self) {
        self.flags.propagation_stopped.store(true, Ordering::Release);
    }

    pub fn prevent_default(&self) {
        self.flags.default_prevented.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_propagation_stopped(&self) -> bool {
        self.flags.propagation_stopped.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.flags.default_prevented.load(Ordering::Acquire)
    }
}

impl PartialEq for NativeEvent {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.target == other.target && self.detail == other.detail
    }
}
