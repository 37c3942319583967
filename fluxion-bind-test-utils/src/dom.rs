// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A minimal element tree with bubbling event dispatch.

use fluxion_bind_host::{ElementId, ListenerId, NativeEvent, NativeHandler};
use std::collections::HashMap;

#[derive(Default)]
struct Element {
    tag: String,
    id_attr: Option<String>,
    classes: Vec<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    listeners: Vec<(ListenerId, String, NativeHandler)>,
}

/// Simple selector: `tag`, `#id`, `.class` or a combination like `button#ok.primary`.
#[derive(Debug, Default, PartialEq, Eq)]
struct Selector {
    tag: Option<String>,
    id_attr: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    fn parse(text: &str) -> Self {
        let mut selector = Self::default();
        let mut current = String::new();
        let mut kind = ' ';

        for ch in text.trim().chars().chain(std::iter::once('\0')) {
            if ch == '#' || ch == '.' || ch == '\0' {
                if !current.is_empty() {
                    let part = std::mem::take(&mut current);
                    match kind {
                        '#' => selector.id_attr = Some(part),
                        '.' => selector.classes.push(part),
                        _ => selector.tag = Some(part),
                    }
                }
                kind = ch;
            } else {
                current.push(ch);
            }
        }
        selector
    }

    fn matches(&self, element: &Element) -> bool {
        self.tag.as_ref().is_none_or(|tag| *tag == element.tag)
            && self
                .id_attr
                .as_ref()
                .is_none_or(|id| element.id_attr.as_ref() == Some(id))
            && self.classes.iter().all(|c| element.classes.contains(c))
    }
}

#[derive(Default)]
pub(crate) struct Dom {
    elements: HashMap<ElementId, Element>,
}

impl Dom {
    /// Insert an element described like a selector (`button#ok.primary`).
    pub(crate) fn insert(&mut self, id: ElementId, spec: &str, parent: Option<ElementId>) {
        let selector = Selector::parse(spec);
        let element = Element {
            tag: selector.tag.unwrap_or_else(|| "div".to_string()),
            id_attr: selector.id_attr,
            classes: selector.classes,
            parent,
            ..Element::default()
        };
        self.elements.insert(id, element);
        if let Some(parent) = parent.and_then(|p| self.elements.get_mut(&p)) {
            parent.children.push(id);
        }
    }

    pub(crate) fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// `root` and its descendants matching `selector`, in document order.
    pub(crate) fn query_all(&self, root: ElementId, selector: &str) -> Vec<ElementId> {
        let selector = Selector::parse(selector);
        let mut found = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(element) = self.elements.get(&id) else {
                continue;
            };
            if selector.matches(element) {
                found.push(id);
            }
            stack.extend(element.children.iter().rev().copied());
        }
        found
    }

    pub(crate) fn add_listener(
        &mut self,
        element: ElementId,
        id: ListenerId,
        event: &str,
        handler: NativeHandler,
    ) -> bool {
        match self.elements.get_mut(&element) {
            Some(el) => {
                el.listeners.push((id, event.to_string(), handler));
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_listener(&mut self, element: ElementId, id: ListenerId) {
        if let Some(el) = self.elements.get_mut(&element) {
            el.listeners.retain(|(listener, _, _)| *listener != id);
        }
    }

    /// Handlers for `event` along the bubbling path from `target` upwards.
    pub(crate) fn bubbling_path(&self, target: ElementId, event: &str) -> Vec<Vec<NativeHandler>> {
        let mut path = Vec::new();
        let mut current = Some(target);
        while let Some(id) = current {
            let Some(element) = self.elements.get(&id) else {
                break;
            };
            path.push(
                element
                    .listeners
                    .iter()
                    .filter(|(_, kind, _)| kind == event)
                    .map(|(_, _, handler)| handler.clone())
                    .collect(),
            );
            current = element.parent;
        }
        path
    }

    /// Listeners registered on `root` and its descendants.
    pub(crate) fn listener_count(&self, root: ElementId) -> usize {
        let mut count = 0;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(element) = self.elements.get(&id) {
                count += element.listeners.len();
                stack.extend(element.children.iter().copied());
            }
        }
        count
    }
}

/// Fire `event` at its target and bubble it up until a listener stops it.
pub(crate) fn dispatch(path: Vec<Vec<NativeHandler>>, event: &NativeEvent) {
    for handlers in path {
        for handler in handlers {
            handler(event);
        }
        if event.is_propagation_stopped() {
            break;
        }
    }
}
