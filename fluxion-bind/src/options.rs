// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-component declarations handed to [`FluxionBind::install`](crate::FluxionBind::install).

use crate::ComponentRx;
use fluxion_bind_core::{Result, StreamItem};
use fluxion_bind_host::Value;
use futures::stream::{BoxStream, Stream, StreamExt};
use std::fmt;

/// A stream that can be bound to a state key.
pub type BoxObservable = BoxStream<'static, StreamItem<Value>>;

/// Stream keys and their streams, in declaration order.
pub type StreamMap = Vec<(String, BoxObservable)>;

type Factory = Box<dyn FnOnce(&ComponentRx) -> Result<StreamMap> + Send>;

/// Methods to expose as streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservableMethods {
    /// Each method `m` is exposed under `m` plus the configured suffix.
    List(Vec<String>),
    /// `(method, stream key)` pairs.
    Map(Vec<(String, String)>),
}

impl ObservableMethods {
    pub fn list<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(methods.into_iter().map(Into::into).collect())
    }

    pub fn map<I, M, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (M, K)>,
        M: Into<String>,
        K: Into<String>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(method, key)| (method.into(), key.into()))
                .collect(),
        )
    }
}

/// What a component declares: streams to bind to state, stream names fed by
/// the `stream` directive, and methods to expose as streams.
///
/// ```
/// use fluxion_bind::RxOptions;
/// use futures::stream;
/// use fluxion_bind_core::IntoObservable;
/// use serde_json::json;
///
/// let options = RxOptions::new()
///     .subscription("msg", stream::iter(vec![json!("hello")]).into_observable())
///     .dom_streams(["click$"]);
/// # drop(options);
/// ```
#[derive(Default)]
pub struct RxOptions {
    pub(crate) streams: StreamMap,
    pub(crate) factory: Option<Factory>,
    pub(crate) dom_streams: Vec<String>,
    pub(crate) observable_methods: Option<ObservableMethods>,
}

impl RxOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `stream` to the state key `key`.
    #[must_use]
    pub fn subscription<S>(mut self, key: impl Into<String>, stream: S) -> Self
    where
        S: Stream<Item = StreamItem<Value>> + Send + 'static,
    {
        self.streams.push((key.into(), stream.boxed()));
        self
    }

    /// Build further streams once the component is set up.
    ///
    /// The factory runs after directive streams and observable methods exist,
    /// so it can derive from them and read the component's initial state.
    /// Its keys are bound after those given to
    /// [`subscription`](Self::subscription).
    #[must_use]
    pub fn subscriptions_with(
        mut self,
        factory: impl FnOnce(&ComponentRx) -> Result<StreamMap> + Send + 'static,
    ) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Declare names fed by the `stream` directive.
    #[must_use]
    pub fn dom_streams<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dom_streams.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn observable_methods(mut self, methods: ObservableMethods) -> Self {
        self.observable_methods = Some(methods);
        self
    }

    /// `true` when nothing is declared; installing such options is a no-op
    /// apart from the lifecycle hook.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
            && self.factory.is_none()
            && self.dom_streams.is_empty()
            && self.observable_methods.is_none()
    }
}

impl fmt::Debug for RxOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RxOptions")
            .field(
                "streams",
                &self.streams.iter().map(|(key, _)| key).collect::<Vec<_>>(),
            )
            .field("factory", &self.factory.is_some())
            .field("dom_streams", &self.dom_streams)
            .field("observable_methods", &self.observable_methods)
            .finish()
    }
}
