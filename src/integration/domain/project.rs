//! Project labels managed by the aggregator.

use super::{DomainError, ProjectId};
use serde::{Deserialize, Serialize};

/// User-defined project label within the aggregator.
///
/// Projects are owned by the host application; plugins only link tasks to
/// them through [`ProjectId`]. Values are immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ProjectFields")]
pub struct Project {
    id: ProjectId,
    label: String,
}

impl Project {
    /// Creates a project label.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyProjectLabel`] if the label is blank.
    pub fn new(id: ProjectId, label: impl Into<String>) -> Result<Self, DomainError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(DomainError::EmptyProjectLabel);
        }
        Ok(Self { id, label })
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Unvalidated wire shape of a [`Project`].
#[derive(Deserialize)]
struct ProjectFields {
    id: ProjectId,
    label: String,
}

impl TryFrom<ProjectFields> for Project {
    type Error = DomainError;

    fn try_from(fields: ProjectFields) -> Result<Self, Self::Error> {
        Self::new(fields.id, fields.label)
    }
}
