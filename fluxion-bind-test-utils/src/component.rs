// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::runtime::TestRuntime;
use fluxion_bind_core::FluxionError;
use fluxion_bind_host::{
    ComponentHost, ComponentId, ComponentRef, DestroyHook, ElementId, EventHandler, ListenerId,
    MethodBody, NativeHandler, Task, Value, WatchHandler,
};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Weak};

#[derive(Default)]
struct State {
    data: BTreeMap<String, Value>,
    props: BTreeMap<String, Value>,
    reactive: BTreeSet<String>,
    watchers: HashMap<String, Vec<(ListenerId, WatchHandler)>>,
    listeners: HashMap<String, Vec<(ListenerId, EventHandler)>>,
    methods: HashMap<String, MethodBody>,
    destroy_hooks: Vec<DestroyHook>,
    attached: HashMap<&'static str, Arc<dyn Any + Send + Sync>>,
    destroyed: bool,
    dirty: bool,
    render_count: usize,
    rendered: BTreeMap<String, Value>,
    writes: Vec<(String, Value)>,
    errors: Vec<FluxionError>,
}

/// An in-memory component instance.
///
/// Writes to reactive properties mark the component dirty; the next
/// [`TestRuntime::tick`] renders it, copying the state into a snapshot that
/// tests read with [`rendered`](Self::rendered), much like reading the text
/// of a rendered template.
pub struct TestComponent {
    id: ComponentId,
    name: String,
    root: ElementId,
    runtime: Arc<TestRuntime>,
    this: Weak<TestComponent>,
    state: Mutex<State>,
}

impl TestComponent {
    pub(crate) fn create(runtime: Arc<TestRuntime>, name: &str, root: ElementId) -> Arc<Self> {
        let id = runtime.next_component_id();
        Arc::new_cyclic(|this| Self {
            id,
            name: name.to_string(),
            root,
            runtime,
            this: this.clone(),
            state: Mutex::new(State::default()),
        })
    }

    /// This instance as a host handle.
    pub fn handle(&self) -> Option<ComponentRef> {
        self.this.upgrade().map(|c| c as ComponentRef)
    }

    /// Declare a reactive data property.
    pub fn data(&self, key: &str, value: Value) -> &Self {
        self.define_reactive(key, value);
        self
    }

    /// Declare a prop passed by the parent.
    pub fn prop(&self, key: &str, value: Value) -> &Self {
        self.state.lock().props.insert(key.to_string(), value);
        self
    }

    /// Define a method on the instance.
    pub fn define_method(
        &self,
        name: &str,
        body: impl Fn(&ComponentRef, &[Value]) -> Value + Send + Sync + 'static,
    ) -> &Self {
        self.set_method(name, Some(Arc::new(body)));
        self
    }

    /// Call a method the way template code would. `None` if it does not exist.
    pub fn call(&self, name: &str, args: &[Value]) -> Option<Value> {
        let body = self.state.lock().methods.get(name).cloned()?;
        let this = self.handle()?;
        Some(body(&this, args))
    }

    /// Run the `mounted` lifecycle step.
    pub fn mount(&self) {
        self.emit("hook:mounted", &[]);
    }

    /// Destroy the instance: `hook:beforeDestroy`, destruction hooks,
    /// `hook:destroyed`, then every event-bus handler is removed.
    pub fn destroy(&self) {
        if self.state.lock().destroyed {
            return;
        }

        self.emit("hook:beforeDestroy", &[]);

        let hooks = {
            let mut state = self.state.lock();
            state.destroyed = true;
            std::mem::take(&mut state.destroy_hooks)
        };
        for hook in hooks {
            hook();
        }

        self.emit("hook:destroyed", &[]);

        let mut state = self.state.lock();
        state.listeners.clear();
        state.watchers.clear();
        state.attached.clear();
    }

    pub(crate) fn render(&self) {
        let mut state = self.state.lock();
        if !state.dirty {
            return;
        }
        state.dirty = false;
        state.render_count += 1;
        let snapshot: BTreeMap<String, Value> = state
            .reactive
            .iter()
            .filter_map(|key| {
                state
                    .data
                    .get(key)
                    .map(|value| (key.clone(), value.clone()))
            })
            .collect();
        state.rendered = snapshot;
    }

    /// The value of `key` as of the last render pass.
    pub fn rendered(&self, key: &str) -> Option<Value> {
        self.state.lock().rendered.get(key).cloned()
    }

    /// Number of render passes so far.
    pub fn render_count(&self) -> usize {
        self.state.lock().render_count
    }

    /// Every value written to `key` through [`ComponentHost::set`], in order.
    pub fn writes(&self, key: &str) -> Vec<Value> {
        self.state
            .lock()
            .writes
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Errors received on the error channel.
    pub fn errors(&self) -> Vec<FluxionError> {
        self.state.lock().errors.clone()
    }

    /// Event-bus handlers currently registered for `event`.
    pub fn bus_listener_count(&self, event: &str) -> usize {
        self.state
            .lock()
            .listeners
            .get(event)
            .map_or(0, Vec::len)
    }

    /// Watchers currently registered for `key`.
    pub fn watcher_count(&self, key: &str) -> usize {
        self.state.lock().watchers.get(key).map_or(0, Vec::len)
    }

    /// Native listeners on this component's element tree.
    pub fn dom_listener_count(&self) -> usize {
        self.runtime.dom.lock().listener_count(self.root)
    }

    /// The runtime this component lives in.
    pub fn runtime(&self) -> &Arc<TestRuntime> {
        &self.runtime
    }

    /// Root element, always present for test components.
    pub fn root_element(&self) -> ElementId {
        self.root
    }

    /// The first element matching `selector`.
    pub fn find(&self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }
}

impl ComponentHost for TestComponent {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn label(&self) -> String {
        format!("{}#{}", self.name, self.id)
    }

    fn define_reactive(&self, key: &str, initial: Value) {
        let mut state = self.state.lock();
        state.reactive.insert(key.to_string());
        state.data.insert(key.to_string(), initial);
        state.dirty = true;
    }

    fn get(&self, key: &str) -> Option<Value> {
        let state = self.state.lock();
        state
            .data
            .get(key)
            .or_else(|| state.props.get(key))
            .cloned()
    }

    fn set(&self, key: &str, value: Value) {
        let (old, watchers) = {
            let mut state = self.state.lock();
            state.writes.push((key.to_string(), value.clone()));
            if state.reactive.contains(key) {
                state.dirty = true;
            }
            let old = state
                .data
                .insert(key.to_string(), value.clone())
                .unwrap_or(Value::Null);
            let watchers: Vec<WatchHandler> = state
                .watchers
                .get(key)
                .map(|w| w.iter().map(|(_, handler)| handler.clone()).collect())
                .unwrap_or_default();
            (old, watchers)
        };

        if old != value {
            for watcher in watchers {
                watcher(&value, &old);
            }
        }
    }

    fn has_property(&self, key: &str) -> bool {
        let state = self.state.lock();
        state.data.contains_key(key)
            || state.props.contains_key(key)
            || state.methods.contains_key(key)
    }

    fn watch(&self, key: &str, handler: WatchHandler) -> ListenerId {
        let id = self.runtime.next_listener_id();
        self.state
            .lock()
            .watchers
            .entry(key.to_string())
            .or_default()
            .push((id, handler));
        id
    }

    fn unwatch(&self, key: &str, id: ListenerId) {
        if let Some(watchers) = self.state.lock().watchers.get_mut(key) {
            watchers.retain(|(w, _)| *w != id);
        }
    }

    fn on(&self, event: &str, handler: EventHandler) -> ListenerId {
        let id = self.runtime.next_listener_id();
        self.state
            .lock()
            .listeners
            .entry(event.to_string())
            .or_default()
            .push((id, handler));
        id
    }

    fn off(&self, event: &str, id: ListenerId) {
        if let Some(listeners) = self.state.lock().listeners.get_mut(event) {
            listeners.retain(|(l, _)| *l != id);
        }
    }

    fn emit(&self, event: &str, args: &[Value]) {
        let handlers: Vec<EventHandler> = self
            .state
            .lock()
            .listeners
            .get(event)
            .map(|l| l.iter().map(|(_, handler)| handler.clone()).collect())
            .unwrap_or_default();
        for handler in handlers {
            handler(args);
        }
    }

    fn method(&self, name: &str) -> Option<MethodBody> {
        self.state.lock().methods.get(name).cloned()
    }

    fn set_method(&self, name: &str, body: Option<MethodBody>) {
        let mut state = self.state.lock();
        match body {
            Some(body) => {
                state.methods.insert(name.to_string(), body);
            }
            None => {
                state.methods.remove(name);
            }
        }
    }

    fn root(&self) -> Option<ElementId> {
        self.runtime
            .dom
            .lock()
            .contains(self.root)
            .then_some(self.root)
    }

    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        self.runtime.dom.lock().query_all(self.root, selector)
    }

    fn add_event_listener(
        &self,
        element: ElementId,
        event: &str,
        handler: NativeHandler,
    ) -> Option<ListenerId> {
        let id = self.runtime.next_listener_id();
        self.runtime
            .dom
            .lock()
            .add_listener(element, id, event, handler)
            .then_some(id)
    }

    fn remove_event_listener(&self, element: ElementId, _event: &str, id: ListenerId) {
        self.runtime.dom.lock().remove_listener(element, id);
    }

    fn on_destroy(&self, hook: DestroyHook) {
        let mut state = self.state.lock();
        if state.destroyed {
            drop(state);
            hook();
        } else {
            state.destroy_hooks.push(hook);
        }
    }

    fn is_destroyed(&self) -> bool {
        self.state.lock().destroyed
    }

    fn attach(&self, key: &'static str, value: Arc<dyn Any + Send + Sync>) {
        self.state.lock().attached.insert(key, value);
    }

    fn attached(&self, key: &'static str) -> Option<Arc<dyn Any + Send + Sync>> {
        self.state.lock().attached.get(key).cloned()
    }

    fn detach(&self, key: &'static str) {
        self.state.lock().attached.remove(key);
    }

    fn spawn(&self, task: Task) {
        self.runtime.spawn(task);
    }

    fn report_error(&self, error: FluxionError) {
        self.state.lock().errors.push(error);
    }
}
