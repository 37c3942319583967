// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::{Deserialize, Serialize};

/// Plugin-wide settings.
///
/// Missing fields take their defaults, so a partial JSON document is valid:
///
/// ```
/// use fluxion_bind::BindConfig;
///
/// let config = BindConfig::from_json(r#"{ "method_stream_suffix": "Stream" }"#).unwrap();
/// assert_eq!(config.method_stream_suffix, "Stream");
/// assert!(config.prime_synchronous_values);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Appended to a method name to form its stream key when observable
    /// methods are declared as a list.
    pub method_stream_suffix: String,
    /// Write a stream's synchronously available first value during
    /// installation instead of on the next tick.
    pub prime_synchronous_values: bool,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            method_stream_suffix: "$".to_string(),
            prime_synchronous_values: true,
        }
    }
}

impl BindConfig {
    /// Parse settings from JSON.
    ///
    /// # Errors
    ///
    /// Returns the parser error for malformed input or mistyped fields.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Stream key for the observable method `method`.
    #[must_use]
    pub fn method_stream_key(&self, method: &str) -> String {
        format!("{method}{}", self.method_stream_suffix)
    }
}
