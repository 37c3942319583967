// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use fluxion_bind::{
    ComponentRx, FluxionBind, FluxionError, LifecycleError, ObservableMethods, Observer,
    RxOptions, StreamDirective, Subject,
};
use fluxion_bind_host::{json, ComponentHost, DirectiveBinding, VNode, Value};
use fluxion_bind_test_utils::{is_terminated, TestRuntime};
use parking_lot::Mutex;
use std::sync::Arc;

#[test]
fn destroy_releases_everything() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("leaky");
    vm.data("name", json!("a"));
    let button = runtime.append(vm.root_element(), "button.go");
    let host = vm.handle().unwrap();
    let source = Subject::<Value>::new();
    let rx = FluxionBind::new().install(
        host.clone(),
        RxOptions::new()
            .dom_streams(["click$"])
            .observable_methods(ObservableMethods::list(["save"]))
            .subscription("value", source.observable().subscribe()?),
    )?;
    let clicks = rx.from_dom_event(".go", "click")?;
    let events = rx.event_to_observable(["ping"])?;
    let changes = rx.watch_as_observable("name")?;
    let directive_stream = rx.dom_stream("click$")?;
    StreamDirective.bind(
        button,
        &DirectiveBinding::subject("click", "click$"),
        &VNode::element(host.clone()),
    )?;
    let mut observed = rx.observable("value")?;
    source.next(json!(1))?;
    runtime.tick();

    // Act
    vm.destroy();
    runtime.tick();
    source.next(json!(2))?;
    runtime.tick();

    // Assert
    assert!(rx.registry().is_disposed());
    assert!(rx.registry().is_empty());
    assert_eq!(runtime.pending_tasks(), 0);
    assert_eq!(vm.dom_listener_count(), 0);
    assert_eq!(source.subscriber_count(), 0);
    assert!(clicks.is_closed());
    assert!(events.is_closed());
    assert!(changes.is_closed());
    assert!(directive_stream.is_closed());
    assert_eq!(vm.call("save", &[]), None);
    assert_eq!(vm.writes("value"), vec![json!(1)]);
    assert!(ComponentRx::of(&host).is_none());
    let _ = fluxion_bind_test_utils::ready_items(&mut observed);
    assert!(is_terminated(&mut observed));
    Ok(())
}

#[test]
fn teardown_is_idempotent() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("twice");
    let rx = FluxionBind::new().install(vm.handle().unwrap(), RxOptions::new())?;
    rx.event_to_observable(["ping"])?;
    let cancelled = Arc::new(Mutex::new(0));
    let counter = cancelled.clone();
    rx.registry().add_teardown(move || *counter.lock() += 1)?;

    // Act
    vm.destroy();
    vm.destroy();
    let second_dispose = rx.registry().dispose_all();

    // Assert
    assert_eq!(*cancelled.lock(), 1);
    assert_eq!(second_dispose, 0);
    Ok(())
}

#[test]
fn subscribe_to_stops_after_destroy() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("listener");
    let rx = FluxionBind::new().install(vm.handle().unwrap(), RxOptions::new())?;
    let source = Subject::<Value>::new();
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let completed = Arc::new(Mutex::new(false));
    let done = completed.clone();
    rx.subscribe_to(
        source.observable().subscribe()?,
        Observer::new(move |value: Value| sink.lock().push(value)).on_complete(move || *done.lock() = true),
    )?;

    // Act
    source.next(json!(1))?;
    runtime.tick();
    vm.destroy();
    source.next(json!(2))?;
    runtime.tick();

    // Assert
    assert_eq!(*received.lock(), vec![json!(1)]);
    assert!(!*completed.lock());
    assert_eq!(source.subscriber_count(), 0);
    Ok(())
}

#[test]
fn subscribe_to_reports_unhandled_errors() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("careless");
    let rx = FluxionBind::new().install(vm.handle().unwrap(), RxOptions::new())?;
    let source = Subject::<Value>::new();
    rx.subscribe_to(source.observable().subscribe()?, Observer::new(|_: Value| {}))?;

    // Act
    source.error(FluxionError::stream_error("boom"))?;
    runtime.tick();

    // Assert
    assert!(matches!(
        vm.errors().as_slice(),
        [FluxionError::StreamRuntime(_)]
    ));
    Ok(())
}

#[test]
fn registration_after_destroy_is_rejected() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("late");
    let button = runtime.append(vm.root_element(), "button");
    let rx = FluxionBind::new().install(vm.handle().unwrap(), RxOptions::new())?;
    vm.destroy();
    let source = Subject::<Value>::new();

    // Act
    let dom = rx.from_dom_event(button, "click");
    let method = rx.create_observable_method("late");
    let subscription = rx.subscribe_to(source.observable().subscribe()?, Observer::new(|_: Value| {}));
    let directive = StreamDirective.bind(
        button,
        &DirectiveBinding::subject("click", "click$"),
        &VNode::element(vm.handle().unwrap()),
    );

    // Assert
    assert!(matches!(
        dom,
        Err(FluxionError::Lifecycle(LifecycleError::Disposed { .. }))
    ));
    assert!(matches!(
        method,
        Err(FluxionError::Lifecycle(LifecycleError::Disposed { .. }))
    ));
    assert!(matches!(subscription, Err(LifecycleError::Disposed { .. })));
    assert!(matches!(
        directive,
        Err(FluxionError::Lifecycle(LifecycleError::Disposed { .. }))
    ));
    assert_eq!(vm.dom_listener_count(), 0);
    assert_eq!(runtime.pending_tasks(), 0);
    Ok(())
}

#[test]
fn nothing_is_delivered_after_destroy_during_delivery() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("self-destruct");
    let rx = FluxionBind::new().install(vm.handle().unwrap(), RxOptions::new())?;
    let source = Subject::<Value>::new();
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let target = Arc::downgrade(&vm);
    rx.subscribe_to(
        source.observable().subscribe()?,
        Observer::new(move |value: Value| {
            let last = value == json!(2);
            sink.lock().push(value);
            if last {
                if let Some(vm) = target.upgrade() {
                    vm.destroy();
                }
            }
        }),
    )?;

    // Act
    for n in 1..=3 {
        source.next(json!(n))?;
    }
    runtime.tick();

    // Assert
    assert_eq!(*received.lock(), vec![json!(1), json!(2)]);
    assert_eq!(runtime.pending_tasks(), 0);
    Ok(())
}
