//! Normalized change events produced from webhook deliveries.

use super::{ParseChangeEventKindError, SourceTaskId, TaskChanges};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of change reported by a source system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeEventKind {
    /// A task was created in the source.
    Created,
    /// An existing task was modified.
    Updated,
    /// A task was removed from the source.
    Deleted,
}

impl ChangeEventKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

impl TryFrom<&str> for ChangeEventKind {
    type Error = ParseChangeEventKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "deleted" => Ok(Self::Deleted),
            _ => Err(ParseChangeEventKindError(value.to_owned())),
        }
    }
}

impl fmt::Display for ChangeEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standardized change notification returned by webhook parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "event_type")]
    kind: ChangeEventKind,
    source_task_id: SourceTaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    changes: Option<TaskChanges>,
}

impl ChangeEvent {
    /// Creates a change event for the given task.
    #[must_use]
    pub const fn new(kind: ChangeEventKind, source_task_id: SourceTaskId) -> Self {
        Self {
            kind,
            source_task_id,
            timestamp: None,
            changes: None,
        }
    }

    /// Sets the time the event occurred in the source.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Attaches the changed fields reported with an update.
    #[must_use]
    pub fn with_changes(mut self, changes: TaskChanges) -> Self {
        self.changes = Some(changes);
        self
    }

    /// Returns the event kind.
    #[must_use]
    pub const fn kind(&self) -> ChangeEventKind {
        self.kind
    }

    /// Returns the affected source task identifier.
    #[must_use]
    pub const fn source_task_id(&self) -> &SourceTaskId {
        &self.source_task_id
    }

    /// Returns when the event occurred, if reported.
    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Returns the changed fields, if reported.
    #[must_use]
    pub const fn changes(&self) -> Option<&TaskChanges> {
        self.changes.as_ref()
    }
}
