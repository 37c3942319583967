// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Interface between `fluxion-bind` and a component-based UI framework.
//!
//! The framework implements [`ComponentHost`] for its instances and feeds
//! [`DirectiveBinding`]s to the stream directive. State values are
//! [`serde_json::Value`]s.

pub mod component;
pub mod directive;
pub mod event;
pub mod ids;

pub use self::component::{
    ComponentHost, ComponentRef, DestroyHook, EventHandler, MethodBody, NativeHandler, Task,
    WatchHandler,
};
pub use self::directive::{BindingValue, DirectiveBinding, Modifiers, Payload, VNode};
pub use self::event::NativeEvent;
pub use self::ids::{ComponentId, ElementId, ListenerId};
pub use serde_json::{json, Value};
