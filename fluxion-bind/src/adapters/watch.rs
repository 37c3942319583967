// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{ComponentRx, WatchChange};
use fluxion_bind_core::{BindingError, Observable, Result, Subject};
use fluxion_bind_host::{Value, WatchHandler};
use std::sync::Arc;

impl ComponentRx {
    /// A hot stream of the changes of the property `key`.
    ///
    /// Writes that leave the value unchanged are not emitted.
    ///
    /// # Errors
    ///
    /// - `BindingError::UnknownProperty` when `key` is neither data nor prop
    /// - `LifecycleError::Disposed` after the component was destroyed
    pub fn watch_as_observable(&self, key: &str) -> Result<Observable<WatchChange>> {
        self.ensure_alive()?;
        if self.host.get(key).is_none() {
            return Err(BindingError::UnknownProperty {
                key: key.to_string(),
                component: self.label().to_string(),
            }
            .into());
        }

        let subject = Subject::new();
        let sink = subject.clone();
        let handler: WatchHandler = Arc::new(move |new: &Value, old: &Value| {
            let _ = sink.next(WatchChange {
                new_value: new.clone(),
                old_value: old.clone(),
            });
        });
        let id = self.host.watch(key, handler);

        let host = Arc::downgrade(&self.host);
        let key = key.to_string();
        let closer = subject.clone();
        self.registry.add_teardown(move || {
            if let Some(host) = host.upgrade() {
                host.unwatch(&key, id);
            }
            closer.close();
        })?;

        Ok(subject.observable())
    }
}
