//! Standardized task status.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Standardized status of a task within the aggregator.
///
/// Plugins map every source-specific status onto one of these two members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work on the task is outstanding.
    #[default]
    NotDone,
    /// The task has been completed.
    Done,
}

impl TaskStatus {
    /// Every status member.
    pub const ALL: [Self; 2] = [Self::NotDone, Self::Done];

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotDone => "not_done",
            Self::Done => "done",
        }
    }

    /// Maps a source-side completion flag onto a status.
    #[must_use]
    pub const fn from_completed(completed: bool) -> Self {
        if completed { Self::Done } else { Self::NotDone }
    }

    /// Returns whether the status is [`TaskStatus::Done`].
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "not_done" => Ok(Self::NotDone),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
