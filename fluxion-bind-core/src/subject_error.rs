// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Errors specific to subject operations.
///
/// A subject is closed when its owning component is destroyed or when an
/// error has been pushed through it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
    /// The subject has been closed and cannot accept new items or subscribers.
    #[error("Subject is closed")]
    Closed,
}
