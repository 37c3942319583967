// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Plugin entry point and per-component binding state.

use crate::binder::ObservedSlot;
use crate::directive::{DirectiveHandle, HandleKey, StreamDirective};
use crate::subject_table::EventSubjectTable;
use crate::{BindConfig, ObservableMethods, RxOptions};
use fluxion_bind_core::{
    BindingError, LifecycleError, Observable, Result, SubscriptionRegistry,
};
use fluxion_bind_host::{ComponentRef, Value};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Key under which [`ComponentRx`] is attached to its instance.
pub(crate) const ATTACH_KEY: &str = "fluxion-bind";

/// The plugin. Holds the settings shared by every component it is installed
/// on.
#[derive(Debug, Clone, Default)]
pub struct FluxionBind {
    config: BindConfig,
}

impl FluxionBind {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_config(config: BindConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &BindConfig {
        &self.config
    }

    /// The `stream` element directive.
    #[must_use]
    pub const fn directive(&self) -> StreamDirective {
        StreamDirective
    }

    /// Set up stream bindings on a component that is being created.
    ///
    /// Runs in order: directive streams, observable methods, then the
    /// declared subscriptions. Teardown of everything created here is hooked
    /// to the component's destruction.
    ///
    /// # Errors
    ///
    /// - `LifecycleError::Disposed` if the component is already destroyed
    /// - `BindingError::AlreadyInstalled` on a second install
    /// - any `BindingError` raised by a declaration; whatever was set up
    ///   before the failing declaration is torn down again
    pub fn install(&self, host: ComponentRef, options: RxOptions) -> Result<Arc<ComponentRx>> {
        if host.is_destroyed() {
            return Err(LifecycleError::Disposed {
                component: host.label(),
            }
            .into());
        }
        if host.attached(ATTACH_KEY).is_some() {
            return Err(BindingError::AlreadyInstalled {
                component: host.label(),
            }
            .into());
        }

        let rx = Arc::new(ComponentRx::new(host.clone(), self.config.clone()));
        host.attach(ATTACH_KEY, rx.clone());
        let hook = rx.clone();
        host.on_destroy(Box::new(move || hook.teardown()));

        if let Err(err) = rx.setup(options) {
            fluxion_bind_core::warn!(
                "stream binding setup failed on {}: {}",
                rx.label(),
                err
            );
            rx.teardown();
            return Err(err);
        }

        fluxion_bind_core::info!(
            "stream bindings installed on {} ({} subscriptions)",
            rx.label(),
            rx.registry.len()
        );
        Ok(rx)
    }
}

/// Binding state of one component instance.
///
/// Created by [`FluxionBind::install`] and attached to the instance until it
/// is destroyed. Adapters and the binder register everything they create in
/// the instance's [`SubscriptionRegistry`].
pub struct ComponentRx {
    pub(crate) host: ComponentRef,
    label: String,
    pub(crate) config: BindConfig,
    pub(crate) registry: SubscriptionRegistry,
    pub(crate) subjects: EventSubjectTable,
    pub(crate) observed: Mutex<HashMap<String, Arc<ObservedSlot>>>,
    pub(crate) method_streams: Mutex<HashMap<String, Observable<Value>>>,
    pub(crate) adapted_methods: Mutex<HashSet<String>>,
    pub(crate) handles: Mutex<HashMap<HandleKey, DirectiveHandle>>,
}

impl ComponentRx {
    fn new(host: ComponentRef, config: BindConfig) -> Self {
        let label = host.label();
        Self {
            registry: SubscriptionRegistry::new(label.clone()),
            host,
            label,
            config,
            subjects: EventSubjectTable::new(),
            observed: Mutex::new(HashMap::new()),
            method_streams: Mutex::new(HashMap::new()),
            adapted_methods: Mutex::new(HashSet::new()),
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// The binding state attached to `host`, if the plugin is installed.
    #[must_use]
    pub fn of(host: &ComponentRef) -> Option<Arc<Self>> {
        host.attached(ATTACH_KEY)?.downcast::<Self>().ok()
    }

    /// Like [`of`](Self::of), failing when the plugin is not installed.
    pub(crate) fn require(host: &ComponentRef) -> std::result::Result<Arc<Self>, BindingError> {
        Self::of(host).ok_or_else(|| BindingError::PluginNotInstalled {
            component: host.label(),
        })
    }

    fn setup(&self, options: RxOptions) -> Result<()> {
        let RxOptions {
            streams,
            factory,
            dom_streams,
            observable_methods,
        } = options;

        for name in dom_streams {
            self.declare_dom_stream(&name)?;
        }

        if let Some(methods) = observable_methods {
            self.declare_observable_methods(methods)?;
        }

        let mut streams = streams;
        if let Some(factory) = factory {
            streams.extend(factory(self)?);
        }
        self.bind_streams(streams)
    }

    fn declare_dom_stream(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(BindingError::InvalidName {
                name: name.to_string(),
                what: "dom stream",
            }
            .into());
        }
        self.subjects.get_or_create(name, &self.label)?;
        Ok(())
    }

    fn declare_observable_methods(&self, methods: ObservableMethods) -> Result<()> {
        let pairs = match methods {
            ObservableMethods::List(names) => names
                .into_iter()
                .map(|method| {
                    let key = self.config.method_stream_key(&method);
                    (method, key)
                })
                .collect(),
            ObservableMethods::Map(pairs) => pairs,
        };

        for (method, key) in pairs {
            if key.is_empty() {
                return Err(BindingError::InvalidName {
                    name: key,
                    what: "method stream",
                }
                .into());
            }
            if self.method_streams.lock().contains_key(&key) {
                return Err(BindingError::DuplicateKey { key }.into());
            }
            if self.host.has_property(&key) {
                return Err(BindingError::PropertyConflict {
                    key,
                    component: self.label.clone(),
                }
                .into());
            }

            let stream = self.create_observable_method(&method)?;
            self.method_streams.lock().insert(key, stream);
        }
        Ok(())
    }

    /// Cancel everything this component created. Runs once from the
    /// destruction hook, and on failed installs; further calls do nothing.
    pub(crate) fn teardown(&self) {
        let cancelled = self.registry.dispose_all();
        self.subjects.close_all();
        for slot in std::mem::take(&mut *self.observed.lock()).into_values() {
            slot.close();
        }
        self.method_streams.lock().clear();
        self.adapted_methods.lock().clear();
        self.handles.lock().clear();
        self.host.detach(ATTACH_KEY);

        if cancelled > 0 {
            fluxion_bind_core::debug!("{}: {} subscriptions cancelled", self.label, cancelled);
        }
    }

    /// The component instance.
    #[must_use]
    pub const fn host(&self) -> &ComponentRef {
        &self.host
    }

    /// Label of the component instance, as used in errors.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub const fn config(&self) -> &BindConfig {
        &self.config
    }

    /// The component's registry.
    #[must_use]
    pub const fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    /// Current value of a data property or prop of the component.
    #[must_use]
    pub fn state(&self, key: &str) -> Option<Value> {
        self.host.get(key)
    }

    /// The stream an observable method emits to, by its stream key.
    ///
    /// # Errors
    ///
    /// Returns `BindingError::UnknownStream` for keys that were not declared.
    pub fn method_stream(&self, key: &str) -> std::result::Result<Observable<Value>, BindingError> {
        self.method_streams
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| BindingError::UnknownStream {
                name: key.to_string(),
            })
    }

    pub(crate) fn ensure_alive(&self) -> std::result::Result<(), LifecycleError> {
        if self.registry.is_disposed() {
            return Err(LifecycleError::Disposed {
                component: self.label.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for ComponentRx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRx")
            .field("component", &self.label)
            .field("registry", &self.registry)
            .field("dom_streams", &self.subjects.len())
            .field("observed", &self.observed.lock().len())
            .finish()
    }
}
