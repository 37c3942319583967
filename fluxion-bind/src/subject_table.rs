// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::DomStreamItem;
use fluxion_bind_core::{LifecycleError, Subject};
use parking_lot::Mutex;
use std::collections::HashMap;

struct TableState {
    closed: bool,
    subjects: HashMap<String, Subject<DomStreamItem>>,
}

/// Subjects fed by the `stream` directive, one per name and component.
///
/// Every binding that names the same stream pushes into the same subject.
pub(crate) struct EventSubjectTable {
    state: Mutex<TableState>,
}

impl EventSubjectTable {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(TableState {
                closed: false,
                subjects: HashMap::new(),
            }),
        }
    }

    /// The subject for `name`, created on first use.
    pub(crate) fn get_or_create(
        &self,
        name: &str,
        component: &str,
    ) -> Result<Subject<DomStreamItem>, LifecycleError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(LifecycleError::Disposed {
                component: component.to_string(),
            });
        }
        Ok(state.subjects.entry(name.to_string()).or_default().clone())
    }

    pub(crate) fn get(&self, name: &str) -> Option<Subject<DomStreamItem>> {
        self.state.lock().subjects.get(name).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().subjects.len()
    }

    /// Complete every subject and refuse new ones. Idempotent.
    pub(crate) fn close_all(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        for subject in state.subjects.values() {
            subject.close();
        }
    }
}
