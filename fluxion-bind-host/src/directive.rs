// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Descriptors the host's template compiler hands to element directives.
//!
//! A template binding such as
//! `v-stream:click.native="{ subject: plus$, data: delta }"` becomes a
//! [`DirectiveBinding`] with `arg = "click"`, the `native` modifier and a
//! [`BindingValue::WithData`] value whose payload reads `delta` from state.

use crate::{ComponentHost, ComponentRef, Value};
use std::fmt;
use std::sync::Arc;

/// Data attached to every emission of a binding, evaluated at fire time.
#[derive(Clone)]
pub enum Payload {
    /// A fixed value
    Const(Value),
    /// The current value of a reactive property (`Null` when missing)
    State(String),
    /// Computed from the component when the event fires
    Computed(Arc<dyn Fn(&dyn ComponentHost) -> Value + Send + Sync>),
}

impl Payload {
    /// A payload computed by `f` on every emission.
    pub fn computed(f: impl Fn(&dyn ComponentHost) -> Value + Send + Sync + 'static) -> Self {
        Self::Computed(Arc::new(f))
    }

    /// Evaluate against the component's current state.
    pub fn evaluate(&self, component: &dyn ComponentHost) -> Value {
        match self {
            Self::Const(value) => value.clone(),
            Self::State(key) => component.get(key).unwrap_or(Value::Null),
            Self::Computed(f) => f(component),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(value) => f.debug_tuple("Const").field(value).finish(),
            Self::State(key) => f.debug_tuple("State").field(key).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Value side of a stream binding.
#[derive(Debug, Clone)]
pub enum BindingValue {
    /// `v-stream:click="click$"`
    Subject(String),
    /// `v-stream:click="{ subject: click$, data: ... }"`
    WithData {
        /// Name of the shared stream
        subject: String,
        /// Payload attached to every emission
        data: Payload,
    },
}

impl BindingValue {
    /// Name of the stream this binding feeds.
    #[must_use]
    pub fn subject(&self) -> &str {
        match self {
            Self::Subject(name) | Self::WithData { subject: name, .. } => name,
        }
    }

    /// The declared payload, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&Payload> {
        match self {
            Self::Subject(_) => None,
            Self::WithData { data, .. } => Some(data),
        }
    }
}

/// Directive modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Listen to the native DOM event even on a child component's element
    pub native: bool,
    /// Call `stop_propagation()` before emitting
    pub stop: bool,
    /// Call `prevent_default()` before emitting
    pub prevent: bool,
}

/// One element-level binding as seen at bind, update and unbind time.
#[derive(Debug, Clone)]
pub struct DirectiveBinding {
    /// The event name (directive argument)
    pub arg: Option<String>,
    /// Source text of the binding value, identifies the binding on its element
    pub expression: String,
    /// Evaluated binding value
    pub value: BindingValue,
    pub modifiers: Modifiers,
}

impl DirectiveBinding {
    /// `v-stream:<event>="<value>"`
    pub fn new(event: impl Into<String>, value: BindingValue) -> Self {
        let expression = match &value {
            BindingValue::Subject(name) => name.clone(),
            BindingValue::WithData { subject, data } => {
                format!("{{ subject: {subject}, data: {data:?} }}")
            }
        };
        Self {
            arg: Some(event.into()),
            expression,
            value,
            modifiers: Modifiers::default(),
        }
    }

    /// Shorthand for a binding without payload.
    pub fn subject(event: impl Into<String>, subject: impl Into<String>) -> Self {
        Self::new(event, BindingValue::Subject(subject.into()))
    }

    /// Shorthand for a binding with a payload.
    pub fn with_data(
        event: impl Into<String>,
        subject: impl Into<String>,
        data: Payload,
    ) -> Self {
        Self::new(
            event,
            BindingValue::WithData {
                subject: subject.into(),
                data,
            },
        )
    }

    #[must_use]
    pub const fn native(mut self) -> Self {
        self.modifiers.native = true;
        self
    }

    #[must_use]
    pub const fn stop(mut self) -> Self {
        self.modifiers.stop = true;
        self
    }

    #[must_use]
    pub const fn prevent(mut self) -> Self {
        self.modifiers.prevent = true;
        self
    }
}

/// The virtual node the directive is attached to.
#[derive(Clone)]
pub struct VNode {
    /// The component whose template contains the binding
    pub context: ComponentRef,
    /// The child component rendered at this node, if the node is one
    pub component_instance: Option<ComponentRef>,
}

impl VNode {
    /// A plain element node rendered by `context`.
    pub fn element(context: ComponentRef) -> Self {
        Self {
            context,
            component_instance: None,
        }
    }

    /// A node rendering the child component `child` inside `context`.
    pub fn component(context: ComponentRef, child: ComponentRef) -> Self {
        Self {
            context,
            component_instance: Some(child),
        }
    }
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VNode")
            .field("context", &self.context.label())
            .field(
                "component_instance",
                &self.component_instance.as_ref().map(|c| c.label()),
            )
            .finish()
    }
}
