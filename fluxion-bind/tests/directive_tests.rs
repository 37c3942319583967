// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use fluxion_bind::{
    BindingError, ComponentRx, DomStreamItem, FluxionBind, FluxionError, IntoObservable,
    RxOptions, StreamDirective, StreamItem,
};
use fluxion_bind_host::{
    json, ComponentHost, DirectiveBinding, ElementId, NativeEvent, Payload, VNode, Value,
};
use fluxion_bind_test_utils::{ready_items, TestRuntime};
use futures::future;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;

fn running_total(
    deltas: BoxStream<'static, i64>,
) -> BoxStream<'static, StreamItem<Value>> {
    stream::iter(vec![0])
        .chain(deltas)
        .scan(0, |total, delta| {
            *total += delta;
            future::ready(Some(json!(*total)))
        })
        .into_observable()
}

#[test]
fn clicks_drive_a_counter() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("counter");
    let button = runtime.append(vm.root_element(), "button");
    let host = vm.handle().unwrap();
    FluxionBind::new().install(
        host.clone(),
        RxOptions::new()
            .dom_streams(["click$"])
            .subscriptions_with(|rx| {
                let clicks = rx.dom_stream("click$")?.values()?.map(|_| 1).boxed();
                Ok(vec![("count".to_string(), running_total(clicks))])
            }),
    )?;
    StreamDirective.bind(
        button,
        &DirectiveBinding::subject("click", "click$"),
        &VNode::element(host),
    )?;
    runtime.tick();
    let initial = vm.rendered("count");

    // Act
    runtime.click(button);
    runtime.tick();
    runtime.click(button);
    runtime.click(button);
    runtime.tick();

    // Assert
    assert_eq!(initial, Some(json!(0)));
    assert_eq!(vm.rendered("count"), Some(json!(3)));
    assert_eq!(vm.writes("count"), vec![json!(0), json!(1), json!(2), json!(3)]);
    Ok(())
}

#[test]
fn payloads_from_several_bindings_settle_the_sum() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("plus-minus");
    let plus = runtime.append(vm.root_element(), "button.plus");
    let minus = runtime.append(vm.root_element(), "input.minus");
    let host = vm.handle().unwrap();
    FluxionBind::new().install(
        host.clone(),
        RxOptions::new()
            .dom_streams(["plus$"])
            .subscriptions_with(|rx| {
                let deltas = rx
                    .dom_stream("plus$")?
                    .values()?
                    .map(|envelope| envelope.data.and_then(|d| d.as_i64()).unwrap_or(0))
                    .boxed();
                Ok(vec![("count".to_string(), running_total(deltas))])
            }),
    )?;
    let node = VNode::element(host);
    StreamDirective.bind(
        plus,
        &DirectiveBinding::with_data("click", "plus$", Payload::Const(json!(1))),
        &node,
    )?;
    StreamDirective.bind(
        minus,
        &DirectiveBinding::with_data("keyup", "plus$", Payload::Const(json!(-1))),
        &node,
    )?;

    // Act
    runtime.click(plus);
    runtime.tick();
    let after_click = vm.rendered("count");
    runtime.dispatch(minus, "keyup");
    runtime.tick();

    // Assert
    assert_eq!(after_click, Some(json!(1)));
    assert_eq!(vm.rendered("count"), Some(json!(0)));
    Ok(())
}

#[test]
fn bindings_with_the_same_name_share_one_stream() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("shared");
    let first = runtime.append(vm.root_element(), "button#first");
    let second = runtime.append(vm.root_element(), "button#second");
    let host = vm.handle().unwrap();
    let rx = FluxionBind::new().install(host.clone(), RxOptions::new())?;
    let node = VNode::element(host);
    StreamDirective.bind(first, &DirectiveBinding::subject("click", "click$"), &node)?;
    let stream = rx.dom_stream("click$")?;
    StreamDirective.bind(second, &DirectiveBinding::subject("click", "click$"), &node)?;
    let mut received = stream.values()?;

    // Act
    runtime.click(second);
    runtime.click(first);
    runtime.click(second);

    // Assert
    assert!(stream.shares_source_with(&rx.dom_stream("click$")?));
    let targets: Vec<_> = ready_items(&mut received)
        .iter()
        .filter_map(|envelope| envelope.event.as_native().map(NativeEvent::target))
        .collect();
    assert_eq!(targets, vec![second, first, second]);
    Ok(())
}

#[test]
fn payload_is_evaluated_when_the_event_fires() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("payload");
    vm.data("delta", json!(1));
    let button = runtime.append(vm.root_element(), "button");
    let host = vm.handle().unwrap();
    let rx = FluxionBind::new().install(host.clone(), RxOptions::new().dom_streams(["plus$"]))?;
    let mut received = rx.dom_stream("plus$")?.values()?;
    StreamDirective.bind(
        button,
        &DirectiveBinding::with_data("click", "plus$", Payload::State("delta".to_string())),
        &VNode::element(host),
    )?;

    // Act
    runtime.click(button);
    vm.set("delta", json!(5));
    runtime.click(button);

    // Assert
    let data: Vec<_> = ready_items(&mut received)
        .into_iter()
        .map(|envelope| envelope.data)
        .collect();
    assert_eq!(data, vec![Some(json!(1)), Some(json!(5))]);
    Ok(())
}

#[test]
fn update_replaces_the_payload() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("payload");
    let button = runtime.append(vm.root_element(), "button");
    let host = vm.handle().unwrap();
    let rx = FluxionBind::new().install(host.clone(), RxOptions::new().dom_streams(["plus$"]))?;
    let mut received = rx.dom_stream("plus$")?.values()?;
    let node = VNode::element(host);
    let binding = DirectiveBinding::with_data("click", "plus$", Payload::Const(json!("old")));
    StreamDirective.bind(button, &binding, &node)?;

    // Act
    let mut updated = binding.clone();
    updated.value = fluxion_bind_host::BindingValue::WithData {
        subject: "plus$".to_string(),
        data: Payload::Const(json!("new")),
    };
    StreamDirective.update(button, &updated, &node)?;
    runtime.click(button);

    // Assert
    let data: Vec<_> = ready_items(&mut received)
        .into_iter()
        .map(|envelope| envelope.data)
        .collect();
    assert_eq!(data, vec![Some(json!("new"))]);
    Ok(())
}

#[test]
fn child_component_events_are_listened_to_unless_native() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let parent = runtime.component("parent");
    let child = runtime.child_component("fancy-button", "button", parent.root_element());
    let parent_host = parent.handle().unwrap();
    let child_host = child.handle().unwrap();
    let rx = FluxionBind::new().install(parent_host.clone(), RxOptions::new())?;
    let node = VNode::component(parent_host, child_host);
    StreamDirective.bind(child.root_element(), &DirectiveBinding::subject("click", "custom$"), &node)?;
    StreamDirective.bind(
        child.root_element(),
        &DirectiveBinding::subject("click", "native$").native(),
        &node,
    )?;
    let mut custom = rx.dom_stream("custom$")?.values()?;
    let mut native = rx.dom_stream("native$")?.values()?;

    // Act
    child.emit("click", &[json!("hi")]);
    runtime.click(child.root_element());

    // Assert
    let custom: Vec<DomStreamItem> = ready_items(&mut custom);
    assert_eq!(custom.len(), 1);
    let event = custom[0].event.as_component().unwrap();
    assert_eq!(event.msg, json!("hi"));
    assert_eq!(custom[0].context.as_ref().map(|c| c.id()), Some(child.id()));
    let native: Vec<DomStreamItem> = ready_items(&mut native);
    assert_eq!(native.len(), 1);
    assert_eq!(native[0].event.name(), "click");
    assert!(native[0].context.is_none());
    Ok(())
}

#[test]
fn stop_and_prevent_modifiers_apply_before_emitting() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("form");
    let link = runtime.append(vm.root_element(), "a");
    let host = vm.handle().unwrap();
    let rx = FluxionBind::new().install(host.clone(), RxOptions::new())?;
    StreamDirective.bind(
        link,
        &DirectiveBinding::subject("click", "link$").stop().prevent(),
        &VNode::element(host.clone()),
    )?;
    let outer = rx.from_dom_event(vm.root_element(), "click")?;
    let mut outer = outer.values()?;

    // Act
    let event = runtime.click(link);

    // Assert
    assert!(event.is_propagation_stopped());
    assert!(event.is_default_prevented());
    assert!(ready_items(&mut outer).is_empty());
    Ok(())
}

#[test]
fn rebinding_replaces_the_listener_and_unbind_detaches_it() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("rebind");
    let button = runtime.append(vm.root_element(), "button");
    let host = vm.handle().unwrap();
    let rx = FluxionBind::new().install(host.clone(), RxOptions::new().dom_streams(["click$"]))?;
    let mut received = rx.dom_stream("click$")?.values()?;
    let node = VNode::element(host);
    let binding = DirectiveBinding::subject("click", "click$");
    let listeners_before = vm.dom_listener_count();

    // Act
    StreamDirective.bind(button, &binding, &node)?;
    StreamDirective.bind(button, &binding, &node)?;
    runtime.click(button);
    let while_bound = ready_items(&mut received).len();
    StreamDirective.unbind(button, &binding, &node)?;
    runtime.click(button);

    // Assert
    assert_eq!(while_bound, 1);
    assert!(ready_items(&mut received).is_empty());
    assert_eq!(vm.dom_listener_count(), listeners_before);
    assert_eq!(rx.directive_count(), 0);
    assert!(!rx.dom_stream("click$")?.is_closed());
    Ok(())
}

#[test]
fn undeclared_stream_names_are_unknown_until_bound() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("lazy");
    let button = runtime.append(vm.root_element(), "button");
    let host = vm.handle().unwrap();
    let rx = FluxionBind::new().install(host.clone(), RxOptions::new())?;

    // Act
    let before = rx.dom_stream("later$");
    StreamDirective.bind(button, &DirectiveBinding::subject("click", "later$"), &VNode::element(host))?;

    // Assert
    assert!(matches!(before, Err(BindingError::UnknownStream { .. })));
    assert!(rx.dom_stream("later$").is_ok());
    Ok(())
}

#[test]
fn malformed_bindings_are_rejected() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("bad");
    let button = runtime.append(vm.root_element(), "button");
    let host = vm.handle().unwrap();
    FluxionBind::new().install(host.clone(), RxOptions::new())?;
    let node = VNode::element(host);
    let mut no_event = DirectiveBinding::subject("click", "click$");
    no_event.arg = None;

    // Act
    let missing_event = StreamDirective.bind(button, &no_event, &node);
    let missing_name = StreamDirective.bind(button, &DirectiveBinding::subject("click", ""), &node);

    // Assert
    assert!(matches!(
        missing_event,
        Err(FluxionError::Binding(BindingError::InvalidDirective { .. }))
    ));
    assert!(matches!(
        missing_name,
        Err(FluxionError::Binding(BindingError::InvalidDirective { .. }))
    ));
    Ok(())
}

#[test]
fn binding_to_a_missing_element_is_rejected() -> anyhow::Result<()> {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("ghost");
    let host = vm.handle().unwrap();
    let rx = FluxionBind::new().install(host.clone(), RxOptions::new())?;
    let ghost = ElementId::new(u64::MAX);

    // Act
    let result = StreamDirective.bind(
        ghost,
        &DirectiveBinding::subject("click", "click$"),
        &VNode::element(host),
    );

    // Assert
    assert!(matches!(
        result,
        Err(FluxionError::Binding(BindingError::TargetNotFound { .. }))
    ));
    assert_eq!(rx.directive_count(), 0);
    assert_eq!(vm.dom_listener_count(), 0);
    Ok(())
}

#[test]
fn binding_without_plugin_is_rejected() {
    // Arrange
    let runtime = TestRuntime::new();
    let vm = runtime.component("plain");
    let button = runtime.append(vm.root_element(), "button");
    let host: Arc<dyn ComponentHost> = vm.handle().unwrap();

    // Act
    let result = StreamDirective.bind(
        button,
        &DirectiveBinding::subject("click", "click$"),
        &VNode::element(host.clone()),
    );

    // Assert
    assert!(matches!(
        result,
        Err(FluxionError::Binding(BindingError::PluginNotInstalled { .. }))
    ));
    assert!(ComponentRx::of(&host).is_none());
}
