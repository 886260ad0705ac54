//! Error types for integration domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing integration domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The project label is empty after trimming.
    #[error("project label must not be empty")]
    EmptyProjectLabel,

    /// The source task identifier is empty after trimming.
    #[error("source task identifier must not be empty")]
    EmptySourceTaskId,

    /// The source name is empty after trimming.
    #[error("source name must not be empty")]
    EmptySourceName,

    /// The source name contains characters outside `[a-z0-9_]`.
    #[error(
        "source name '{0}' contains invalid characters (only lowercase alphanumeric and underscores allowed)"
    )]
    InvalidSourceName(String),

    /// The source name exceeds the 100-character limit.
    #[error("source name exceeds 100 character limit: {0}")]
    SourceNameTooLong(String),

    /// A webhook signature header could not be decoded.
    #[error("malformed webhook signature: {0}")]
    MalformedSignature(String),
}

/// Error returned while parsing a task status string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing a standardized task field name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task field: {0}")]
pub struct ParseTaskFieldError(pub String);

/// Error returned while parsing a change event kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown change event type: {0}")]
pub struct ParseChangeEventKindError(pub String);
