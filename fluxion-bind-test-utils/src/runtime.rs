// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::component::TestComponent;
use crate::dom::{self, Dom};
use crate::scheduler::Scheduler;
use fluxion_bind_host::{ComponentId, ElementId, ListenerId, NativeEvent, Task};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// A page: one DOM, one event loop, any number of components.
///
/// Nothing runs on its own. Adapters push into subjects synchronously when an
/// event is dispatched; subscription callbacks and render passes happen when
/// the test calls [`tick`](Self::tick).
pub struct TestRuntime {
    next_id: AtomicU64,
    pub(crate) scheduler: Scheduler,
    pub(crate) dom: Mutex<Dom>,
    components: Mutex<Vec<Weak<TestComponent>>>,
}

impl TestRuntime {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU64::new(1),
            scheduler: Scheduler::default(),
            dom: Mutex::new(Dom::default()),
            components: Mutex::new(Vec::new()),
        })
    }

    fn next_raw(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn next_component_id(&self) -> ComponentId {
        ComponentId::new(self.next_raw())
    }

    pub(crate) fn next_element_id(&self) -> ElementId {
        ElementId::new(self.next_raw())
    }

    pub(crate) fn next_listener_id(&self) -> ListenerId {
        ListenerId::new(self.next_raw())
    }

    /// A new top-level component whose root element is a `div`.
    pub fn component(self: &Arc<Self>, name: &str) -> Arc<TestComponent> {
        let root = self.next_element_id();
        self.dom.lock().insert(root, "div", None);
        self.adopt(TestComponent::create(self.clone(), name, root))
    }

    /// A child component rendered as `spec` (e.g. `button#btn`) inside
    /// `parent_element`.
    pub fn child_component(
        self: &Arc<Self>,
        name: &str,
        spec: &str,
        parent_element: ElementId,
    ) -> Arc<TestComponent> {
        let root = self.next_element_id();
        self.dom.lock().insert(root, spec, Some(parent_element));
        self.adopt(TestComponent::create(self.clone(), name, root))
    }

    fn adopt(&self, component: Arc<TestComponent>) -> Arc<TestComponent> {
        self.components.lock().push(Arc::downgrade(&component));
        component
    }

    /// Append an element described like a selector under `parent`.
    pub fn append(&self, parent: ElementId, spec: &str) -> ElementId {
        let id = self.next_element_id();
        self.dom.lock().insert(id, spec, Some(parent));
        id
    }

    /// Fire `kind` at `target`, bubbling to the ancestors, and return the
    /// event so its flags can be inspected.
    pub fn dispatch(&self, target: ElementId, kind: &str) -> NativeEvent {
        self.dispatch_event(NativeEvent::new(kind, target))
    }

    pub fn dispatch_event(&self, event: NativeEvent) -> NativeEvent {
        let path = self.dom.lock().bubbling_path(event.target(), event.kind());
        dom::dispatch(path, &event);
        event
    }

    pub fn click(&self, target: ElementId) -> NativeEvent {
        self.dispatch(target, "click")
    }

    /// The next tick: run every ready task, then a render pass for each
    /// component with pending writes.
    pub fn tick(&self) {
        self.scheduler.run_until_stalled();

        let components: Vec<_> = {
            let mut components = self.components.lock();
            components.retain(|c| c.strong_count() > 0);
            components.iter().filter_map(Weak::upgrade).collect()
        };
        for component in components {
            component.render();
        }
    }

    pub(crate) fn spawn(&self, task: Task) {
        self.scheduler.spawn(task);
    }

    /// Spawned tasks that have not finished.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }
}
