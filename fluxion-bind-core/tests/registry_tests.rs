// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use fluxion_bind_core::{LifecycleError, Subscription, SubscriptionRegistry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn dispose_cancels_every_subscription_once() -> anyhow::Result<()> {
    // Arrange
    let registry = SubscriptionRegistry::new("counter#1");
    let calls = Arc::new(AtomicUsize::new(0));
    for _ in 0..3 {
        let counter = calls.clone();
        registry.add_teardown(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })?;
    }

    // Act
    let first = registry.dispose_all();
    let second = registry.dispose_all();

    // Assert
    assert_eq!(first, 3);
    assert_eq!(second, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(registry.is_disposed());
    Ok(())
}

#[test]
fn register_after_dispose_is_rejected_and_cancelled() {
    // Arrange
    let registry = SubscriptionRegistry::new("counter#2");
    registry.dispose_all();
    let late = Subscription::token();

    // Act
    let result = registry.register(late.clone());

    // Assert
    assert_eq!(
        result,
        Err(LifecycleError::Disposed {
            component: "counter#2".to_string()
        })
    );
    assert!(late.is_closed());
    assert!(registry.is_empty());
}

#[test]
fn closed_subscriptions_are_not_counted() -> anyhow::Result<()> {
    // Arrange
    let registry = SubscriptionRegistry::new("list#1");
    let finished = Subscription::token();
    let running = Subscription::token();
    registry.register(finished.clone())?;
    registry.register(running)?;

    // Act
    finished.unsubscribe();

    // Assert
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.dispose_all(), 1);
    Ok(())
}

#[test]
fn subscription_cancelled_early_is_not_torn_down_twice() -> anyhow::Result<()> {
    // Arrange
    let registry = SubscriptionRegistry::new("list#2");
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let subscription = registry.add_teardown(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })?;

    // Act
    subscription.unsubscribe();
    registry.dispose_all();

    // Assert
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}
