// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{ComponentRx, FrameworkEvent};
use fluxion_bind_core::{BindingError, Observable, Result, Subject};
use fluxion_bind_host::{EventHandler, ListenerId, Value};
use std::sync::Arc;

impl ComponentRx {
    /// A hot stream of the component's own events named `names`.
    ///
    /// Lifecycle hooks are observable too, under their `hook:` names.
    ///
    /// # Errors
    ///
    /// - `BindingError::InvalidName` when no name or an empty name is given
    /// - `LifecycleError::Disposed` after the component was destroyed
    pub fn event_to_observable<I, N>(&self, names: I) -> Result<Observable<FrameworkEvent>>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.ensure_alive()?;
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() || names.iter().any(String::is_empty) {
            return Err(BindingError::InvalidName {
                name: names.join(","),
                what: "component event",
            }
            .into());
        }

        let subject = Subject::new();
        let listeners: Vec<(String, ListenerId)> = names
            .into_iter()
            .map(|name| {
                let sink = subject.clone();
                let event = name.clone();
                let handler: EventHandler = Arc::new(move |args: &[Value]| {
                    let _ = sink.next(FrameworkEvent::from_args(&event, args));
                });
                let id = self.host.on(&name, handler);
                (name, id)
            })
            .collect();

        let host = Arc::downgrade(&self.host);
        let closer = subject.clone();
        self.registry.add_teardown(move || {
            if let Some(host) = host.upgrade() {
                for (name, id) in listeners {
                    host.off(&name, id);
                }
            }
            closer.close();
        })?;

        Ok(subject.observable())
    }
}
