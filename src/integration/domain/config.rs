//! Plugin configuration resolved by the host application.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Errors returned while reading plugin configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration root is not a JSON object.
    #[error("source configuration must be a JSON object")]
    NotAnObject,

    /// A required key is absent.
    #[error("missing configuration key: {0}")]
    MissingKey(String),

    /// A key holds a value of the wrong type.
    #[error("configuration key '{key}' must be a {expected}")]
    InvalidType {
        /// Offending key.
        key: String,
        /// Expected JSON type.
        expected: &'static str,
    },

    /// The configuration does not match the plugin's settings shape.
    #[error("invalid source configuration: {0}")]
    Invalid(String),
}

/// Configuration owned by a plugin instance.
///
/// Holds credentials, endpoint URLs, and source-specific settings. Secrets
/// are resolved by the host before the plugin is constructed. `Debug` output
/// lists keys only.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SourceConfig(Map<String, Value>);

impl SourceConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotAnObject`] unless the value is an object.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for malformed JSON or
    /// [`ConfigError::NotAnObject`] for a non-object root.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_str(text).map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Self::from_value(value)
    }

    /// Sets a configuration value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns a raw configuration value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns whether a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns an optional string value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidType`] when the key is present but not a
    /// string.
    pub fn get_str(&self, key: &str) -> Result<Option<&str>, ConfigError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(_) => Err(ConfigError::InvalidType {
                key: key.to_owned(),
                expected: "string",
            }),
        }
    }

    /// Returns a required string value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] when absent or
    /// [`ConfigError::InvalidType`] when not a string.
    pub fn require_str(&self, key: &str) -> Result<&str, ConfigError> {
        self.get_str(key)?
            .ok_or_else(|| ConfigError::MissingKey(key.to_owned()))
    }

    /// Deserializes the whole configuration into a plugin settings type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the shape does not match.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// Iterates configuration keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("keys", &self.0.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
