// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The host framework as seen from the binding layer.
//!
//! A UI framework integrates by implementing [`ComponentHost`] for its
//! component instances. The binding layer never owns a component; it keeps an
//! [`ComponentRef`] and attaches its own state through
//! [`ComponentHost::attach`].

use crate::{ComponentId, ElementId, ListenerId, NativeEvent, Value};
use fluxion_bind_core::FluxionError;
use futures::future::BoxFuture;
use std::any::Any;
use std::sync::Arc;

/// Shared handle on a component instance.
pub type ComponentRef = Arc<dyn ComponentHost>;

/// Handler for the instance event bus; receives the emitted arguments.
pub type EventHandler = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Handler for native DOM events.
pub type NativeHandler = Arc<dyn Fn(&NativeEvent) + Send + Sync>;

/// Handler for reactive property changes; receives `(new, old)`.
pub type WatchHandler = Arc<dyn Fn(&Value, &Value) + Send + Sync>;

/// A component method. Receives the instance it is called on and the
/// arguments, returns the method's result.
pub type MethodBody = Arc<dyn Fn(&ComponentRef, &[Value]) -> Value + Send + Sync>;

/// Run once when the instance is destroyed.
pub type DestroyHook = Box<dyn FnOnce() + Send>;

/// Unit of work scheduled on the host's event loop.
pub type Task = BoxFuture<'static, ()>;

/// Per-instance services a host framework provides.
///
/// All methods are called from the host's own (single) event-loop thread.
/// Implementations must not hold internal locks while invoking handlers,
/// since handlers routinely call back into the instance.
pub trait ComponentHost: Send + Sync {
    /// Identity of this instance.
    fn id(&self) -> ComponentId;

    /// Human readable label used in errors and logs, e.g. `counter#c3`.
    fn label(&self) -> String;

    // Reactive state

    /// Define a reactive property; writes to it trigger a re-render.
    fn define_reactive(&self, key: &str, initial: Value);

    /// Current value of a data property or prop.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a reactive property and notify the renderer and watchers.
    fn set(&self, key: &str, value: Value);

    /// `true` if `key` is a data property, a prop or a method.
    fn has_property(&self, key: &str) -> bool;

    /// Call `handler` whenever the property `key` changes.
    fn watch(&self, key: &str, handler: WatchHandler) -> ListenerId;

    fn unwatch(&self, key: &str, id: ListenerId);

    // Instance event bus

    fn on(&self, event: &str, handler: EventHandler) -> ListenerId;

    fn off(&self, event: &str, id: ListenerId);

    /// Emit `event` to handlers registered with [`on`](Self::on). Lifecycle
    /// hooks are emitted as `hook:<name>` pseudo-events.
    fn emit(&self, event: &str, args: &[Value]);

    // Methods

    fn method(&self, name: &str) -> Option<MethodBody>;

    /// Install (`Some`) or remove (`None`) a method.
    fn set_method(&self, name: &str, body: Option<MethodBody>);

    // DOM

    /// The element the instance renders into, once it exists.
    fn root(&self) -> Option<ElementId>;

    /// Elements below (and including) the root that match `selector`.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// Listen to `event` on `element`. Returns `None` when the element does
    /// not exist (any more).
    fn add_event_listener(
        &self,
        element: ElementId,
        event: &str,
        handler: NativeHandler,
    ) -> Option<ListenerId>;

    fn remove_event_listener(&self, element: ElementId, event: &str, id: ListenerId);

    // Lifecycle

    /// Register a destruction hook. Hooks added after destruction run
    /// immediately.
    fn on_destroy(&self, hook: DestroyHook);

    fn is_destroyed(&self) -> bool;

    // Private per-instance state

    /// Attach plugin state to the instance under `key`.
    fn attach(&self, key: &'static str, value: Arc<dyn Any + Send + Sync>);

    fn attached(&self, key: &'static str) -> Option<Arc<dyn Any + Send + Sync>>;

    fn detach(&self, key: &'static str);

    // Scheduling and errors

    /// Run `task` on the host's event loop.
    fn spawn(&self, task: Task);

    /// The host's global error channel.
    fn report_error(&self, error: FluxionError);
}
