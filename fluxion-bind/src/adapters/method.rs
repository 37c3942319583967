// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::events::pack_args;
use crate::{ComponentRx, MethodCall};
use fluxion_bind_core::{BindingError, Observable, Result, Subject};
use fluxion_bind_host::{ComponentRef, MethodBody, Value};
use std::sync::Arc;

impl ComponentRx {
    /// Expose calls of the method `name` as a stream of their arguments.
    ///
    /// No argument emits `Null`, one argument emits it as is, several emit
    /// an array. A missing method is installed and returns `Null`; an
    /// existing one keeps working and runs after the emission. The previous
    /// method is restored when the component is destroyed.
    ///
    /// # Errors
    ///
    /// - `BindingError::InvalidName` for an empty name
    /// - `BindingError::PropertyConflict` when `name` is a data property or prop
    /// - `BindingError::DuplicateKey` when `name` is already observed
    /// - `LifecycleError::Disposed` after the component was destroyed
    pub fn create_observable_method(&self, name: &str) -> Result<Observable<Value>> {
        self.install_method(name, |args, _| pack_args(args))
    }

    /// Like [`create_observable_method`](Self::create_observable_method),
    /// emitting every argument together with the instance the method was
    /// called on.
    ///
    /// # Errors
    ///
    /// Same as [`create_observable_method`](Self::create_observable_method).
    pub fn create_observable_method_with_context(
        &self,
        name: &str,
    ) -> Result<Observable<MethodCall>> {
        self.install_method(name, |args, this| MethodCall {
            args: args.to_vec(),
            context: this.clone(),
        })
    }

    fn install_method<T, F>(&self, name: &str, emission: F) -> Result<Observable<T>>
    where
        T: Clone + Send + 'static,
        F: Fn(&[Value], &ComponentRef) -> T + Send + Sync + 'static,
    {
        self.ensure_alive()?;
        if name.is_empty() {
            return Err(BindingError::InvalidName {
                name: name.to_string(),
                what: "observable method",
            }
            .into());
        }
        if self.host.get(name).is_some() {
            return Err(BindingError::PropertyConflict {
                key: name.to_string(),
                component: self.label().to_string(),
            }
            .into());
        }
        // At most one wrapper per method name
        if !self.adapted_methods.lock().insert(name.to_string()) {
            return Err(BindingError::DuplicateKey {
                key: name.to_string(),
            }
            .into());
        }

        let original = self.host.method(name);
        if original.is_some() {
            fluxion_bind_core::warn!(
                "method `{}` already exists on {}; its calls are now also emitted",
                name,
                self.label()
            );
        }

        let subject = Subject::new();
        let sink = subject.clone();
        let inner = original.clone();
        let body: MethodBody = Arc::new(move |this: &ComponentRef, args: &[Value]| {
            let _ = sink.next(emission(args, this));
            inner.as_ref().map_or(Value::Null, |method| method(this, args))
        });
        self.host.set_method(name, Some(body));

        let host = Arc::downgrade(&self.host);
        let name = name.to_string();
        let closer = subject.clone();
        self.registry.add_teardown(move || {
            if let Some(host) = host.upgrade() {
                host.set_method(&name, original);
            }
            closer.close();
        })?;

        Ok(subject.observable())
    }
}
