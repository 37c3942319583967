// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Items emitted by the event adapters and the stream directive.

use fluxion_bind_host::{ComponentRef, NativeEvent, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Collapse handler arguments into one emitted value: nothing becomes
/// `Null`, a single argument is passed as is, several become an array.
pub(crate) fn pack_args(args: &[Value]) -> Value {
    match args {
        [] => Value::Null,
        [single] => single.clone(),
        many => Value::Array(many.to_vec()),
    }
}

/// An event emitted on a component's event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkEvent {
    /// Name the event was emitted under
    pub name: String,
    /// The emitted arguments, packed
    pub msg: Value,
}

impl FrameworkEvent {
    pub(crate) fn from_args(name: &str, args: &[Value]) -> Self {
        Self {
            name: name.to_string(),
            msg: pack_args(args),
        }
    }
}

/// A change of a watched property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchChange {
    pub new_value: Value,
    pub old_value: Value,
}

/// What triggered a directive emission.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggeredEvent {
    /// A DOM event on the bound element
    Native(NativeEvent),
    /// An event emitted by the child component at the bound node
    Component(FrameworkEvent),
}

impl TriggeredEvent {
    /// The event name, whichever kind it is.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Native(event) => event.kind(),
            Self::Component(event) => &event.name,
        }
    }

    #[must_use]
    pub const fn as_native(&self) -> Option<&NativeEvent> {
        match self {
            Self::Native(event) => Some(event),
            Self::Component(_) => None,
        }
    }

    #[must_use]
    pub const fn as_component(&self) -> Option<&FrameworkEvent> {
        match self {
            Self::Native(_) => None,
            Self::Component(event) => Some(event),
        }
    }
}

/// One emission of a directive-fed stream.
#[derive(Clone)]
pub struct Envelope<E> {
    /// The triggering event
    pub event: E,
    /// The binding's payload, evaluated when the event fired
    pub data: Option<Value>,
    /// The component the event originated from, for component events
    pub context: Option<ComponentRef>,
}

impl<E: fmt::Debug> fmt::Debug for Envelope<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("event", &self.event)
            .field("data", &self.data)
            .field("context", &self.context.as_ref().map(|c| c.label()))
            .finish()
    }
}

/// Item type of the streams fed by the `stream` directive.
pub type DomStreamItem = Envelope<TriggeredEvent>;

/// One argument of a [`MethodCall`] sequence.
#[derive(Clone)]
pub enum CallArg {
    Value(Value),
    /// The instance the method was called on
    Context(ComponentRef),
}

impl fmt::Debug for CallArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Context(component) => f.debug_tuple("Context").field(&component.label()).finish(),
        }
    }
}

impl PartialEq for CallArg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Context(a), Self::Context(b)) => a.id() == b.id(),
            _ => false,
        }
    }
}

/// A call of an observable method, emitted with its calling context.
#[derive(Clone)]
pub struct MethodCall {
    /// Arguments in call order
    pub args: Vec<Value>,
    /// The instance the method was called on
    pub context: ComponentRef,
}

impl MethodCall {
    /// The arguments followed by the calling instance.
    #[must_use]
    pub fn sequence(&self) -> Vec<CallArg> {
        self.args
            .iter()
            .cloned()
            .map(CallArg::Value)
            .chain(std::iter::once(CallArg::Context(self.context.clone())))
            .collect()
    }
}

impl PartialEq for MethodCall {
    fn eq(&self, other: &Self) -> bool {
        self.args == other.args && self.context.id() == other.context.id()
    }
}

impl fmt::Debug for MethodCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodCall")
            .field("args", &self.args)
            .field("context", &self.context.label())
            .finish()
    }
}
