//! Canonical task record exchanged between plugins and the aggregator.

use super::{DomainError, ProjectId, SourceName, SourceTaskId, TaskChanges, TaskId, TaskStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task in the aggregator's standardized format.
///
/// Plugins map source-specific data into this shape in response to fetch,
/// poll, or webhook events. Values are never mutated in place: an update
/// produces a new instance through [`StandardTask::apply_changes`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StandardTaskFields")]
pub struct StandardTask {
    id: TaskId,
    project_id: ProjectId,
    source_id: SourceTaskId,
    source_name: SourceName,
    name: String,
    description: Option<String>,
    due_date: Option<NaiveDate>,
    status: TaskStatus,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    raw_data: Option<serde_json::Value>,
    url: Option<String>,
}

impl StandardTask {
    /// Creates a task with the required fields.
    ///
    /// Optional fields start empty and the status defaults to
    /// [`TaskStatus::NotDone`].
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTaskName`] if the name is empty after
    /// trimming.
    pub fn new(
        id: TaskId,
        project_id: ProjectId,
        source_id: SourceTaskId,
        source_name: SourceName,
        name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            project_id,
            source_id,
            source_name,
            name: validated_name(&name.into())?,
            description: None,
            due_date: None,
            status: TaskStatus::default(),
            created_at: None,
            updated_at: None,
            raw_data: None,
            url: None,
        })
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the task due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the task status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the creation timestamp reported by the source.
    #[must_use]
    pub const fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the latest modification timestamp reported by the source.
    #[must_use]
    pub const fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Attaches the original source payload.
    #[must_use]
    pub fn with_raw_data(mut self, raw_data: serde_json::Value) -> Self {
        self.raw_data = Some(raw_data);
        self
    }

    /// Sets the direct URL of the task in the source system.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Returns a new task with the requested changes applied.
    ///
    /// Timestamps and raw data are carried over unchanged; callers stamp
    /// `updated_at` once the source has accepted the update.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTaskName`] if the change set renames the
    /// task to an empty name.
    pub fn apply_changes(&self, changes: &TaskChanges) -> Result<Self, DomainError> {
        let mut updated = self.clone();
        if let Some(name) = changes.name() {
            updated.name = validated_name(name)?;
        }
        if let Some(description) = changes.description() {
            updated.description = description.map(str::to_owned);
        }
        if let Some(due_date) = changes.due_date() {
            updated.due_date = due_date;
        }
        if let Some(status) = changes.status() {
            updated.status = status;
        }
        if let Some(url) = changes.url() {
            updated.url = url.map(str::to_owned);
        }
        Ok(updated)
    }

    /// Returns the aggregator task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the native identifier in the source system.
    #[must_use]
    pub const fn source_id(&self) -> &SourceTaskId {
        &self.source_id
    }

    /// Returns the name of the plugin that produced the task.
    #[must_use]
    pub const fn source_name(&self) -> &SourceName {
        &self.source_name
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the standardized status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Returns the original source payload.
    #[must_use]
    pub const fn raw_data(&self) -> Option<&serde_json::Value> {
        self.raw_data.as_ref()
    }

    /// Returns the direct URL of the task in the source system.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

// `raw_data` is omitted: source payloads are large and may carry secrets.
impl fmt::Debug for StandardTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardTask")
            .field("id", &self.id)
            .field("project_id", &self.project_id)
            .field("source_id", &self.source_id)
            .field("source_name", &self.source_name)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("due_date", &self.due_date)
            .field("status", &self.status)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

fn validated_name(raw: &str) -> Result<String, DomainError> {
    if raw.trim().is_empty() {
        return Err(DomainError::EmptyTaskName);
    }
    Ok(raw.to_owned())
}

/// Unvalidated wire shape of a [`StandardTask`].
#[derive(Deserialize)]
struct StandardTaskFields {
    id: TaskId,
    project_id: ProjectId,
    source_id: SourceTaskId,
    source_name: SourceName,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    due_date: Option<NaiveDate>,
    #[serde(default)]
    status: TaskStatus,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    raw_data: Option<serde_json::Value>,
    #[serde(default)]
    url: Option<String>,
}

impl TryFrom<StandardTaskFields> for StandardTask {
    type Error = DomainError;

    fn try_from(fields: StandardTaskFields) -> Result<Self, Self::Error> {
        Ok(Self {
            id: fields.id,
            project_id: fields.project_id,
            source_id: fields.source_id,
            source_name: fields.source_name,
            name: validated_name(&fields.name)?,
            description: fields.description,
            due_date: fields.due_date,
            status: fields.status,
            created_at: fields.created_at,
            updated_at: fields.updated_at,
            raw_data: fields.raw_data,
            url: fields.url,
        })
    }
}
