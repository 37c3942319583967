// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Drives streams into component state.
//!
//! Every bound key gets a reactive property initialised to `Null` and a task
//! on the host's event loop that writes each value the stream produces. The
//! latest value is also kept in an [`ObservedSlot`] so the key can be read
//! back as a stream.

use crate::options::StreamMap;
use crate::ComponentRx;
use fluxion_bind_core::{
    BindingError, FluxionError, LifecycleError, Observer, Result, StreamItem, StreamRuntimeError,
    Subject, Subscription,
};
use fluxion_bind_host::{ComponentRef, Value};
use futures::future::{select, Either};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::pin::pin;
use std::sync::Arc;

struct SlotState {
    latest: Option<Value>,
    subject: Subject<Value>,
}

/// Latest value of one bound key plus the live feed of later values.
pub(crate) struct ObservedSlot {
    state: Mutex<SlotState>,
}

impl ObservedSlot {
    fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                latest: None,
                subject: Subject::new(),
            }),
        }
    }

    fn publish(&self, value: Value) {
        let mut state = self.state.lock();
        state.latest = Some(value.clone());
        // Closed once the source ended; readers still get `latest`
        let _ = state.subject.next(value);
    }

    fn fail(&self, err: FluxionError) {
        let _ = self.state.lock().subject.error(err);
    }

    pub(crate) fn close(&self) {
        self.state.lock().subject.close();
    }

    fn replay(&self) -> BoxStream<'static, StreamItem<Value>> {
        let state = self.state.lock();
        let latest = stream::iter(state.latest.clone().map(StreamItem::Value));
        match state.subject.subscribe() {
            Ok(live) => latest.chain(live).boxed(),
            Err(_) => latest.boxed(),
        }
    }
}

impl ComponentRx {
    /// Bind each stream to its key.
    ///
    /// All keys are validated before anything is bound, so a bad declaration
    /// leaves the component untouched.
    pub(crate) fn bind_streams(&self, streams: StreamMap) -> Result<()> {
        let mut seen = HashSet::new();
        for (key, _) in &streams {
            if key.is_empty() {
                return Err(BindingError::InvalidName {
                    name: key.clone(),
                    what: "subscription key",
                }
                .into());
            }
            if !seen.insert(key.as_str()) || self.observed.lock().contains_key(key) {
                return Err(BindingError::DuplicateKey { key: key.clone() }.into());
            }
            if self.host.has_property(key) || self.method_streams.lock().contains_key(key) {
                return Err(BindingError::PropertyConflict {
                    key: key.clone(),
                    component: self.label().to_string(),
                }
                .into());
            }
        }

        for (key, stream) in streams {
            self.bind_stream(key, stream)?;
        }
        Ok(())
    }

    fn bind_stream(
        &self,
        key: String,
        mut stream: BoxStream<'static, StreamItem<Value>>,
    ) -> Result<()> {
        self.ensure_alive()?;
        self.host.define_reactive(&key, Value::Null);
        let slot = Arc::new(ObservedSlot::new());
        self.observed.lock().insert(key.clone(), slot.clone());

        if self.config.prime_synchronous_values {
            match stream.next().now_or_never() {
                Some(Some(StreamItem::Value(value))) => {
                    write(&self.host, &slot, &key, value);
                }
                Some(Some(StreamItem::Error(err))) => {
                    report(&self.host, &slot, &key, err);
                    return Ok(());
                }
                Some(None) => {
                    slot.close();
                    return Ok(());
                }
                None => {}
            }
        }

        let host = Arc::downgrade(&self.host);
        let on_value = {
            let (host, slot, key) = (host.clone(), slot.clone(), key.clone());
            move |value| {
                if let Some(host) = host.upgrade() {
                    write(&host, &slot, &key, value);
                }
            }
        };
        let on_error = {
            let (slot, key) = (slot.clone(), key.clone());
            move |err| {
                if let Some(host) = host.upgrade() {
                    report(&host, &slot, &key, err);
                }
            }
        };
        let observer = Observer::new(on_value)
            .on_error(on_error)
            .on_complete(move || slot.close());

        self.subscribe_to(stream, observer)?;
        Ok(())
    }

    /// Consume `stream` for as long as the component lives.
    ///
    /// Items are delivered to `observer` on the host's event loop. Destroying
    /// the component (or cancelling the returned handle) stops delivery; a
    /// callback already running finishes, nothing is delivered afterwards. An
    /// error the observer does not handle goes to the host's error channel.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::Disposed` after the component was destroyed.
    pub fn subscribe_to<T, S>(
        &self,
        stream: S,
        observer: Observer<T>,
    ) -> std::result::Result<Subscription, LifecycleError>
    where
        T: Send + 'static,
        S: Stream<Item = StreamItem<T>> + Send + 'static,
    {
        let subscription = Subscription::token();
        self.registry.register(subscription.clone())?;

        let host = Arc::downgrade(&self.host);
        let label = self.label().to_string();
        let guard = subscription.clone();
        self.host.spawn(Box::pin(async move {
            let Some(unhandled) = drive(stream, observer, guard).await else {
                return;
            };
            fluxion_bind_core::error!("unhandled stream error on {}: {}", label, unhandled);
            if let Some(host) = host.upgrade() {
                host.report_error(StreamRuntimeError::new("subscribe_to", label, unhandled).into());
            }
        }));
        Ok(subscription)
    }

    /// The latest value bound to `key` followed by every later one.
    ///
    /// # Errors
    ///
    /// Returns `BindingError::UnknownStream` when `key` is not a bound key.
    pub fn observable(
        &self,
        key: &str,
    ) -> std::result::Result<BoxStream<'static, StreamItem<Value>>, BindingError> {
        self.observed
            .lock()
            .get(key)
            .map(|slot| slot.replay())
            .ok_or_else(|| BindingError::UnknownStream {
                name: key.to_string(),
            })
    }

    /// Keys bound to streams, sorted.
    #[must_use]
    pub fn bound_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.observed.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Deliver items until the stream ends, errors or `subscription` is
/// cancelled. Returns the error if the observer had no error callback.
async fn drive<T, S>(
    stream: S,
    mut observer: Observer<T>,
    subscription: Subscription,
) -> Option<FluxionError>
where
    S: Stream<Item = StreamItem<T>>,
{
    let mut stream = pin!(stream);
    let mut cancelled = subscription.cancelled();

    loop {
        let item = match select(stream.next(), &mut cancelled).await {
            Either::Left((item, _)) => item,
            Either::Right(((), _)) => return None,
        };
        if subscription.is_closed() {
            return None;
        }

        match item {
            Some(StreamItem::Value(value)) => observer.next(value),
            Some(StreamItem::Error(err)) => {
                subscription.unsubscribe();
                return observer.error(err);
            }
            None => {
                subscription.unsubscribe();
                observer.complete();
                return None;
            }
        }
    }
}

fn write(host: &ComponentRef, slot: &ObservedSlot, key: &str, value: Value) {
    host.set(key, value.clone());
    slot.publish(value);
}

fn report(host: &ComponentRef, slot: &ObservedSlot, key: &str, err: FluxionError) {
    fluxion_bind_core::error!("stream `{}` on {} failed: {}", key, host.label(), err);
    slot.fail(err.clone());
    host.report_error(StreamRuntimeError::new(key, host.label(), err).into());
}
