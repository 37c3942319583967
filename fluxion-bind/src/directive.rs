// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The `stream` element directive.
//!
//! `v-stream:click="plus$"` pushes every click on the element into the
//! component's `plus$` stream. On a child component node the child's own
//! `click` event is listened to instead, unless the `native` modifier asks
//! for the DOM event.

use crate::{ComponentRx, DomStreamItem, Envelope, FrameworkEvent, TriggeredEvent};
use fluxion_bind_core::{BindingError, LifecycleError, Observable, Result, Subject, Subscription};
use fluxion_bind_host::{
    ComponentHost, ComponentRef, DirectiveBinding, ElementId, EventHandler, Modifiers, NativeEvent,
    NativeHandler, Payload, VNode, Value,
};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Identifies one binding on one element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct HandleKey {
    element: ElementId,
    event: String,
    expression: String,
}

impl HandleKey {
    fn of(element: ElementId, event: &str, binding: &DirectiveBinding) -> Self {
        Self {
            element,
            event: event.to_string(),
            expression: binding.expression.clone(),
        }
    }
}

/// Listener state of an active binding.
pub(crate) struct DirectiveHandle {
    subscription: Subscription,
    payload: Arc<Mutex<Option<Payload>>>,
}

impl Drop for DirectiveHandle {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

/// Host-facing entry points of the directive.
///
/// The host calls these from its template patching, with the element, the
/// compiled binding and the node the element belongs to.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamDirective;

impl StreamDirective {
    /// Name the directive is registered under.
    pub const NAME: &'static str = "stream";

    /// Start forwarding events from `element` into the named stream.
    ///
    /// Binding the same element, event and expression again replaces the
    /// previous listener.
    ///
    /// # Errors
    ///
    /// - `BindingError::PluginNotInstalled` when the owning component has no
    ///   stream bindings
    /// - `BindingError::InvalidDirective` without event argument or stream name
    /// - `BindingError::TargetNotFound` when `element` does not exist
    /// - `LifecycleError::Disposed` after the owning component was destroyed
    pub fn bind(&self, element: ElementId, binding: &DirectiveBinding, vnode: &VNode) -> Result<()> {
        if vnode.context.is_destroyed() {
            return Err(LifecycleError::Disposed {
                component: vnode.context.label(),
            }
            .into());
        }
        ComponentRx::require(&vnode.context)?.bind_directive(element, binding, vnode)
    }

    /// Refresh the payload of an existing binding. Bindings never bound are
    /// ignored.
    ///
    /// # Errors
    ///
    /// - `BindingError::PluginNotInstalled` when the owning component has no
    ///   stream bindings
    /// - `BindingError::InvalidDirective` without event argument
    pub fn update(
        &self,
        element: ElementId,
        binding: &DirectiveBinding,
        vnode: &VNode,
    ) -> Result<()> {
        ComponentRx::require(&vnode.context)?.update_directive(element, binding)
    }

    /// Detach the binding's listener. The stream itself stays open for the
    /// other bindings feeding it.
    ///
    /// # Errors
    ///
    /// Returns `BindingError::InvalidDirective` without event argument.
    /// Unbinding after the owning component was destroyed is a no-op.
    pub fn unbind(
        &self,
        element: ElementId,
        binding: &DirectiveBinding,
        vnode: &VNode,
    ) -> Result<()> {
        match ComponentRx::of(&vnode.context) {
            Some(rx) => rx.unbind_directive(element, binding),
            None => Ok(()),
        }
    }
}

fn event_arg(binding: &DirectiveBinding) -> std::result::Result<&str, BindingError> {
    binding
        .arg
        .as_deref()
        .filter(|event| !event.is_empty())
        .ok_or_else(|| BindingError::InvalidDirective {
            expression: binding.expression.clone(),
            reason: "missing event argument",
        })
}

impl ComponentRx {
    /// The stream fed by every `stream` directive naming `name`.
    ///
    /// # Errors
    ///
    /// Returns `BindingError::UnknownStream` when `name` was neither declared
    /// as a dom stream nor used by a binding yet.
    pub fn dom_stream(
        &self,
        name: &str,
    ) -> std::result::Result<Observable<DomStreamItem>, BindingError> {
        self.subjects
            .get(name)
            .map(|subject| subject.observable())
            .ok_or_else(|| BindingError::UnknownStream {
                name: name.to_string(),
            })
    }

    pub(crate) fn bind_directive(
        &self,
        element: ElementId,
        binding: &DirectiveBinding,
        vnode: &VNode,
    ) -> Result<()> {
        let event = event_arg(binding)?;
        let name = binding.value.subject();
        if name.is_empty() {
            return Err(BindingError::InvalidDirective {
                expression: binding.expression.clone(),
                reason: "missing stream name",
            }
            .into());
        }
        self.ensure_alive()?;

        let subject = self.subjects.get_or_create(name, self.label())?;
        let key = HandleKey::of(element, event, binding);
        let payload = Arc::new(Mutex::new(binding.value.data().cloned()));
        let emitter = Emitter {
            subject,
            payload: payload.clone(),
            context: Arc::downgrade(&vnode.context),
        };

        let subscription = match &vnode.component_instance {
            Some(child) if !binding.modifiers.native => listen_component(child, event, emitter),
            _ => listen_native(&self.host, element, event, binding.modifiers, emitter)
                .ok_or_else(|| self.target_not_found(element))?,
        };

        // Dropping the old handle detaches its listener
        let replaced = self.handles.lock().remove(&key);
        drop(replaced);

        self.registry.register(subscription.clone())?;
        self.handles.lock().insert(
            key,
            DirectiveHandle {
                subscription,
                payload,
            },
        );

        fluxion_bind_core::debug!(
            "bound `{}` on {} to stream `{}` of {}",
            event,
            element,
            name,
            self.label()
        );
        Ok(())
    }

    pub(crate) fn update_directive(
        &self,
        element: ElementId,
        binding: &DirectiveBinding,
    ) -> Result<()> {
        let key = HandleKey::of(element, event_arg(binding)?, binding);
        if let Some(handle) = self.handles.lock().get(&key) {
            *handle.payload.lock() = binding.value.data().cloned();
        }
        Ok(())
    }

    pub(crate) fn unbind_directive(
        &self,
        element: ElementId,
        binding: &DirectiveBinding,
    ) -> Result<()> {
        let event = event_arg(binding)?;
        let key = HandleKey::of(element, event, binding);
        let handle = self.handles.lock().remove(&key);
        if handle.is_some() {
            fluxion_bind_core::debug!("unbound `{}` on {} of {}", event, element, self.label());
        }
        drop(handle);
        Ok(())
    }

    /// Number of directive bindings currently attached.
    #[must_use]
    pub fn directive_count(&self) -> usize {
        self.handles.lock().len()
    }
}

/// Pushes envelopes into a binding's stream.
struct Emitter {
    subject: Subject<DomStreamItem>,
    payload: Arc<Mutex<Option<Payload>>>,
    context: Weak<dyn ComponentHost>,
}

impl Emitter {
    fn emit(&self, event: TriggeredEvent, origin: Option<ComponentRef>) {
        let payload = self.payload.lock().clone();
        let data = payload.and_then(|payload| {
            self.context
                .upgrade()
                .map(|component| payload.evaluate(&*component))
        });
        let _ = self.subject.next(Envelope {
            event,
            data,
            context: origin,
        });
    }
}

fn listen_native(
    host: &ComponentRef,
    element: ElementId,
    event: &str,
    modifiers: Modifiers,
    emitter: Emitter,
) -> Option<Subscription> {
    let handler: NativeHandler = Arc::new(move |e: &NativeEvent| {
        if modifiers.stop {
            e.stop_propagation();
        }
        if modifiers.prevent {
            e.prevent_default();
        }
        emitter.emit(TriggeredEvent::Native(e.clone()), None);
    });
    let listener = host.add_event_listener(element, event, handler)?;

    let host = Arc::downgrade(host);
    let event = event.to_string();
    Some(Subscription::new(move || {
        if let Some(host) = host.upgrade() {
            host.remove_event_listener(element, &event, listener);
        }
    }))
}

fn listen_component(child: &ComponentRef, event: &str, emitter: Emitter) -> Subscription {
    let origin = Arc::downgrade(child);
    let name = event.to_string();
    let handler: EventHandler = Arc::new(move |args: &[Value]| {
        emitter.emit(
            TriggeredEvent::Component(FrameworkEvent::from_args(&name, args)),
            origin.upgrade(),
        );
    });
    let listener = child.on(event, handler);

    let child = Arc::downgrade(child);
    let event = event.to_string();
    Subscription::new(move || {
        if let Some(child) = child.upgrade() {
            child.off(&event, listener);
        }
    })
}
