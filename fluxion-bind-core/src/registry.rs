// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Lifecycle-bound subscription registry.
//!
//! One registry exists per component instance. Everything created on behalf
//! of the component (stream subscriptions, DOM listeners, event-bus handlers,
//! method overrides, subjects) is registered here, and the component's
//! destruction hook calls [`SubscriptionRegistry::dispose_all`] once.

use crate::{LifecycleError, Subscription};
use parking_lot::Mutex;

struct RegistryState {
    disposed: bool,
    subscriptions: Vec<Subscription>,
}

/// Tracks all active subscriptions of one component instance.
///
/// Cancellation order is unspecified; registered subscriptions must not
/// depend on each other.
pub struct SubscriptionRegistry {
    owner: String,
    state: Mutex<RegistryState>,
}

impl SubscriptionRegistry {
    /// An empty registry for the component labelled `owner`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            state: Mutex::new(RegistryState {
                disposed: false,
                subscriptions: Vec::new(),
            }),
        }
    }

    /// Label of the owning component, used in errors and logs.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Add a subscription.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::Disposed` if the registry was already
    /// disposed. The rejected subscription is cancelled before returning so
    /// it cannot outlive the component.
    pub fn register(&self, subscription: Subscription) -> Result<(), LifecycleError> {
        let mut state = self.state.lock();
        if state.disposed {
            drop(state);
            crate::warn!(
                "late subscription on destroyed component {}; cancelling it",
                self.owner
            );
            subscription.unsubscribe();
            return Err(LifecycleError::Disposed {
                component: self.owner.clone(),
            });
        }

        state.subscriptions.retain(|s| !s.is_closed());
        state.subscriptions.push(subscription);
        Ok(())
    }

    /// Register a teardown closure and return its subscription handle.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::Disposed` if the registry was already
    /// disposed; `teardown` has run by then.
    pub fn add_teardown(
        &self,
        teardown: impl FnOnce() + Send + 'static,
    ) -> Result<Subscription, LifecycleError> {
        let subscription = Subscription::new(teardown);
        self.register(subscription.clone())?;
        Ok(subscription)
    }

    /// Cancel every registered subscription. Idempotent.
    ///
    /// Returns how many subscriptions were still open and got cancelled by
    /// this call.
    pub fn dispose_all(&self) -> usize {
        let subscriptions = {
            let mut state = self.state.lock();
            state.disposed = true;
            std::mem::take(&mut state.subscriptions)
        };

        let mut cancelled = 0;
        for subscription in subscriptions {
            if !subscription.is_closed() {
                subscription.unsubscribe();
                cancelled += 1;
            }
        }

        crate::debug!(
            "disposed registry of component {} ({} subscriptions)",
            self.owner,
            cancelled
        );
        cancelled
    }

    /// Returns `true` once [`dispose_all`](Self::dispose_all) has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }

    /// Number of subscriptions that are still open.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .subscriptions
            .iter()
            .filter(|s| !s.is_closed())
            .count()
    }

    /// `true` when no open subscription is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("owner", &self.owner)
            .field("disposed", &self.is_disposed())
            .field("open", &self.len())
            .finish()
    }
}
