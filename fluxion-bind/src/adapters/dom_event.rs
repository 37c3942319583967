// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::ComponentRx;
use fluxion_bind_core::{BindingError, Observable, Result, Subject};
use fluxion_bind_host::{ElementId, NativeEvent, NativeHandler};
use std::sync::Arc;

/// Where a DOM event adapter listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomTarget {
    /// The component's root element itself; bubbled events are ignored.
    Root,
    /// Elements below the root matching the selector, now or later.
    Selector(String),
    /// One already resolved element.
    Element(ElementId),
}

impl From<&str> for DomTarget {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for DomTarget {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<ElementId> for DomTarget {
    fn from(element: ElementId) -> Self {
        Self::Element(element)
    }
}

impl ComponentRx {
    /// A hot stream of native `event`s fired at `target`.
    ///
    /// Selector targets are delegated: one listener sits on the root and
    /// events are matched against the selector when they fire, so elements
    /// rendered later are covered as well.
    ///
    /// # Errors
    ///
    /// - `BindingError::NoRootElement` before the component has rendered
    /// - `BindingError::TargetNotFound` if no element matches the selector,
    ///   or the given element does not exist
    /// - `LifecycleError::Disposed` after the component was destroyed
    pub fn from_dom_event(
        &self,
        target: impl Into<DomTarget>,
        event: &str,
    ) -> Result<Observable<NativeEvent>> {
        self.ensure_alive()?;
        if event.is_empty() {
            return Err(BindingError::InvalidName {
                name: event.to_string(),
                what: "dom event",
            }
            .into());
        }

        let subject = Subject::new();
        let sink = subject.clone();
        let (element, handler): (ElementId, NativeHandler) = match target.into() {
            DomTarget::Root => {
                let root = self.root()?;
                let handler: NativeHandler = Arc::new(move |e: &NativeEvent| {
                    if e.target() == root {
                        let _ = sink.next(e.clone());
                    }
                });
                (root, handler)
            }
            DomTarget::Element(element) => {
                let handler: NativeHandler = Arc::new(move |e: &NativeEvent| {
                    let _ = sink.next(e.clone());
                });
                (element, handler)
            }
            DomTarget::Selector(selector) => {
                let root = self.root()?;
                if self.host.query_all(&selector).is_empty() {
                    return Err(BindingError::TargetNotFound {
                        selector,
                        component: self.label().to_string(),
                    }
                    .into());
                }
                let host = Arc::downgrade(&self.host);
                let handler: NativeHandler = Arc::new(move |e: &NativeEvent| {
                    let matched = host
                        .upgrade()
                        .is_some_and(|h| h.query_all(&selector).contains(&e.target()));
                    if matched {
                        let _ = sink.next(e.clone());
                    }
                });
                (root, handler)
            }
        };

        let listener = self
            .host
            .add_event_listener(element, event, handler)
            .ok_or_else(|| self.target_not_found(element))?;
        let host = Arc::downgrade(&self.host);
        let event = event.to_string();
        let closer = subject.clone();
        self.registry.add_teardown(move || {
            if let Some(host) = host.upgrade() {
                host.remove_event_listener(element, &event, listener);
            }
            closer.close();
        })?;

        Ok(subject.observable())
    }

    pub(crate) fn target_not_found(&self, element: ElementId) -> BindingError {
        BindingError::TargetNotFound {
            selector: element.to_string(),
            component: self.label().to_string(),
        }
    }

    fn root(&self) -> std::result::Result<ElementId, BindingError> {
        self.host.root().ok_or_else(|| BindingError::NoRootElement {
            component: self.label().to_string(),
        })
    }
}
