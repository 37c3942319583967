// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use fluxion_bind_core::Subscription;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn counting_subscription() -> (Subscription, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let subscription = Subscription::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (subscription, calls)
}

#[test]
fn teardown_runs_once_across_clones() {
    // Arrange
    let (subscription, calls) = counting_subscription();
    let clone = subscription.clone();

    // Act
    subscription.unsubscribe();
    clone.unsubscribe();
    subscription.unsubscribe();

    // Assert
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(clone.is_closed());
    assert!(clone.same_as(&subscription));
}

#[test]
fn token_has_no_teardown() {
    let token = Subscription::token();
    assert!(!token.is_closed());

    token.unsubscribe();

    assert!(token.is_closed());
}

#[tokio::test]
async fn cancelled_resolves_immediately_when_already_closed() {
    let token = Subscription::token();
    token.unsubscribe();

    tokio::time::timeout(Duration::from_millis(100), token.cancelled())
        .await
        .expect("cancelled() should resolve");
}

#[tokio::test]
async fn cancelled_wakes_a_waiting_task() {
    // Arrange
    let token = Subscription::token();
    let waiter = token.clone();
    let handle = tokio::spawn(async move {
        waiter.cancelled().await;
    });

    // Act
    tokio::task::yield_now().await;
    token.unsubscribe();

    // Assert
    tokio::time::timeout(Duration::from_millis(500), handle)
        .await
        .expect("waiter should finish")
        .expect("waiter should not panic");
}
