//! Opaque polling checkpoints.

use serde::{Deserialize, Serialize};

/// Opaque marker describing where the previous poll stopped.
///
/// The value is produced and interpreted only by the plugin that issued it
/// (a timestamp, a sequence number, a cursor). Hosts store it verbatim and
/// hand it back on the next poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncState(serde_json::Value);

impl SyncState {
    /// Wraps an arbitrary JSON value.
    #[must_use]
    pub const fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Wraps a string token.
    #[must_use]
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(serde_json::Value::String(token.into()))
    }

    /// Returns the token when the state holds a string.
    #[must_use]
    pub fn as_token(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Returns the wrapped value.
    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Consumes the state and returns the wrapped value.
    #[must_use]
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }
}
