//! Identifier and validated scalar types for the integration domain.

use super::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum length for a source name.
const MAX_SOURCE_NAME_LENGTH: usize = 100;

/// Unique identifier the aggregator assigns to a standardized task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new random task identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a task identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier the aggregator assigns to a project label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Creates a new random project identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a project identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Native identifier of a task inside its source system (e.g. `JIRA-123`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceTaskId(String);

impl SourceTaskId {
    /// Creates a validated source task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptySourceTaskId`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(DomainError::EmptySourceTaskId);
        }
        Ok(Self(raw))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SourceTaskId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SourceTaskId> for String {
    fn from(value: SourceTaskId) -> Self {
        value.0
    }
}

impl AsRef<str> for SourceTaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SourceTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated identifier of a source plugin (e.g. `jira`, `github`).
///
/// Only `[a-z0-9_]` is accepted; names are never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceName(String);

impl SourceName {
    /// Creates a validated source name.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptySourceName`] when the value is blank,
    /// [`DomainError::SourceNameTooLong`] when it exceeds 100 characters, or
    /// [`DomainError::InvalidSourceName`] when it contains characters outside
    /// `[a-z0-9_]`, including uppercase letters and surrounding whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let raw = value.into();

        if raw.trim().is_empty() {
            return Err(DomainError::EmptySourceName);
        }

        if raw.len() > MAX_SOURCE_NAME_LENGTH {
            return Err(DomainError::SourceNameTooLong(raw));
        }

        let is_valid = raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !is_valid {
            return Err(DomainError::InvalidSourceName(raw));
        }

        Ok(Self(raw))
    }

    /// Returns the source name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SourceName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SourceName> for String {
    fn from(value: SourceName) -> Self {
        value.0
    }
}

impl AsRef<str> for SourceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
