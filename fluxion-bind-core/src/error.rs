// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for binding streams to component lifecycles.
//!
//! Errors fall into three families, each with its own type:
//!
//! - [`BindingError`]: a declared stream, method, property or element does not
//!   resolve while a component is being set up. Fatal for that setup.
//! - [`LifecycleError`]: a subscription was registered after the owning
//!   component started tearing down.
//! - [`StreamRuntimeError`]: a bound stream failed after setup succeeded. It is
//!   reported to the host, the affected slot keeps its last value.
//!
//! [`FluxionError`] is the root type that all of them convert into.
//!
//! # Examples
//!
//! ```
//! use fluxion_bind_core::{BindingError, FluxionError, Result};
//!
//! fn resolve(name: &str) -> Result<()> {
//!     Err(BindingError::UnknownStream { name: name.to_string() }.into())
//! }
//!
//! assert!(matches!(resolve("click$"), Err(FluxionError::Binding(_))));
//! ```

use crate::SubjectError;

/// A declaration could not be resolved while setting up a component.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// A stream, method or property name is empty.
    #[error("Invalid name `{name}` in {what} declaration")]
    InvalidName {
        /// The offending name
        name: String,
        /// Which declaration it came from (e.g. "subscriptions")
        what: &'static str,
    },

    /// The same key was declared twice.
    #[error("Key `{key}` is declared twice")]
    DuplicateKey {
        /// The repeated key
        key: String,
    },

    /// The key is already a property of the component.
    #[error("Property `{key}` is already defined on component {component}")]
    PropertyConflict {
        /// The conflicting key
        key: String,
        /// Label of the component
        component: String,
    },

    /// A reactive property to watch does not exist.
    #[error("Unknown property `{key}` on component {component}")]
    UnknownProperty {
        /// The missing key
        key: String,
        /// Label of the component
        component: String,
    },

    /// A DOM target did not resolve to an element.
    #[error("Target `{selector}` matched no element in component {component}")]
    TargetNotFound {
        /// The selector, or the element id, that was looked up
        selector: String,
        /// Label of the component
        component: String,
    },

    /// The component has no root element to listen on.
    #[error("Component {component} has no root element")]
    NoRootElement {
        /// Label of the component
        component: String,
    },

    /// A named stream was neither declared nor bound.
    #[error("Unknown stream `{name}`")]
    UnknownStream {
        /// The requested stream name
        name: String,
    },

    /// A directive binding is missing its event argument or subject.
    #[error("Invalid stream directive binding `{expression}`: {reason}")]
    InvalidDirective {
        /// Source expression of the binding
        expression: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// The plugin was installed twice on the same component.
    #[error("Stream bindings are already installed on component {component}")]
    AlreadyInstalled {
        /// Label of the component
        component: String,
    },

    /// The plugin was never installed on the component.
    #[error("Stream bindings are not installed on component {component}")]
    PluginNotInstalled {
        /// Label of the component
        component: String,
    },
}

/// A subscription was added after the owning component began tearing down.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// The registry has already been disposed.
    #[error("Component {component} is destroyed; cannot register a subscription")]
    Disposed {
        /// Label of the component owning the registry
        component: String,
    },
}

/// A bound stream emitted an error after setup.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Stream `{stream}` failed on component {component}: {source}")]
pub struct StreamRuntimeError {
    /// Key of the stream (slot) that failed
    pub stream: String,
    /// Label of the component
    pub component: String,
    /// The error carried by the stream
    #[source]
    pub source: Box<FluxionError>,
}

impl StreamRuntimeError {
    /// Wrap a stream error with the slot and component it belongs to.
    pub fn new(
        stream: impl Into<String>,
        component: impl Into<String>,
        source: FluxionError,
    ) -> Self {
        Self {
            stream: stream.into(),
            component: component.into(),
            source: Box::new(source),
        }
    }
}

/// Root error type for all stream binding operations.
#[derive(Debug, thiserror::Error)]
pub enum FluxionError {
    /// Stream processing encountered an error
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong during stream processing
        context: String,
    },

    /// Custom error from user code
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Setup-time resolution failure
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// Registration after teardown
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// A bound stream failed at runtime
    #[error(transparent)]
    StreamRuntime(#[from] StreamRuntimeError),

    /// Send or subscribe on a closed subject
    #[error(transparent)]
    Subject(#[from] SubjectError),
}

impl FluxionError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Errors raised while setting a component up abort that setup.
    #[must_use]
    pub const fn is_setup_error(&self) -> bool {
        matches!(self, Self::Binding(_))
    }
}

impl Clone for FluxionError {
    fn clone(&self) -> Self {
        match self {
            Self::StreamProcessingError { context } => Self::StreamProcessingError {
                context: context.clone(),
            },
            // The boxed user error cannot be cloned, keep its message
            Self::UserError(e) => Self::StreamProcessingError {
                context: format!("User error: {e}"),
            },
            Self::Binding(e) => Self::Binding(e.clone()),
            Self::Lifecycle(e) => Self::Lifecycle(e.clone()),
            Self::StreamRuntime(e) => Self::StreamRuntime(e.clone()),
            Self::Subject(e) => Self::Subject(e.clone()),
        }
    }
}

/// Specialized Result type for stream binding operations
pub type Result<T> = std::result::Result<T, FluxionError>;
