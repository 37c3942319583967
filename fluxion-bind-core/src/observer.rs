// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::FluxionError;

type NextFn<T> = Box<dyn FnMut(T) + Send>;
type ErrorFn = Box<dyn FnOnce(FluxionError) + Send>;
type CompleteFn = Box<dyn FnOnce() + Send>;

/// Callbacks receiving the notifications of one subscription.
///
/// ```
/// use fluxion_bind_core::Observer;
///
/// let observer = Observer::new(|value: i32| println!("{value}"))
///     .on_error(|err| eprintln!("{err}"))
///     .on_complete(|| println!("done"));
/// # drop(observer);
/// ```
pub struct Observer<T> {
    next: NextFn<T>,
    error: Option<ErrorFn>,
    complete: Option<CompleteFn>,
}

impl<T> Observer<T> {
    /// An observer handling values only.
    pub fn new(next: impl FnMut(T) + Send + 'static) -> Self {
        Self {
            next: Box::new(next),
            error: None,
            complete: None,
        }
    }

    /// Handle the terminating error.
    #[must_use]
    pub fn on_error(mut self, error: impl FnOnce(FluxionError) + Send + 'static) -> Self {
        self.error = Some(Box::new(error));
        self
    }

    /// Handle completion.
    #[must_use]
    pub fn on_complete(mut self, complete: impl FnOnce() + Send + 'static) -> Self {
        self.complete = Some(Box::new(complete));
        self
    }

    /// Deliver a value.
    pub fn next(&mut self, value: T) {
        (self.next)(value);
    }

    /// Deliver the error. Returns it back when no error callback was set, so
    /// the caller can report it elsewhere.
    pub fn error(self, err: FluxionError) -> Option<FluxionError> {
        match self.error {
            Some(error) => {
                error(err);
                None
            }
            None => Some(err),
        }
    }

    /// Deliver completion.
    pub fn complete(self) {
        if let Some(complete) = self.complete {
            complete();
        }
    }
}
