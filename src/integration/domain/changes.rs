//! Standardized field changes applied to tasks.

use super::{ParseTaskFieldError, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Standardized task field names that plugins may update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskField {
    /// The task name.
    Name,
    /// The free-form description.
    Description,
    /// The optional due date.
    DueDate,
    /// The standardized status.
    Status,
    /// The direct link into the source system.
    Url,
}

impl TaskField {
    /// Returns the canonical field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::DueDate => "due_date",
            Self::Status => "status",
            Self::Url => "url",
        }
    }
}

impl TryFrom<&str> for TaskField {
    type Error = ParseTaskFieldError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            "due_date" => Ok(Self::DueDate),
            "status" => Ok(Self::Status),
            "url" => Ok(Self::Url),
            _ => Err(ParseTaskFieldError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of standardized field changes requested for a task.
///
/// Only present fields are applied. Clearable fields use a nested `Option`:
/// `Some(None)` clears the value, `None` leaves it untouched. The JSON form is
/// an object keyed by [`TaskField`] names where `null` clears a field;
/// `null` for `name` or `status`, which cannot be cleared, is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskChanges {
    #[serde(
        deserialize_with = "non_null",
        skip_serializing_if = "Option::is_none"
    )]
    name: Option<String>,
    #[serde(
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    description: Option<Option<String>>,
    #[serde(
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    due_date: Option<Option<NaiveDate>>,
    #[serde(
        deserialize_with = "non_null",
        skip_serializing_if = "Option::is_none"
    )]
    status: Option<TaskStatus>,
    #[serde(
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    url: Option<Option<String>>,
}

/// Marks a key that appeared in the input, even when its value is `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Requires a value for a key that appeared in the input.
fn non_null<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl TaskChanges {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a new task name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Requests a new description, or clears it with `None`.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Requests a new due date, or clears it with `None`.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Requests a new status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Requests a new source URL, or clears it with `None`.
    #[must_use]
    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = Some(url);
        self
    }

    /// Returns the requested name, if present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the requested description change, if present.
    #[must_use]
    pub fn description(&self) -> Option<Option<&str>> {
        self.description.as_ref().map(Option::as_deref)
    }

    /// Returns the requested due date change, if present.
    #[must_use]
    pub const fn due_date(&self) -> Option<Option<NaiveDate>> {
        self.due_date
    }

    /// Returns the requested status, if present.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the requested URL change, if present.
    #[must_use]
    pub fn url(&self) -> Option<Option<&str>> {
        self.url.as_ref().map(Option::as_deref)
    }

    /// Lists the fields present in this change set, in canonical order.
    #[must_use]
    pub fn changed_fields(&self) -> Vec<TaskField> {
        [
            (TaskField::Name, self.name.is_some()),
            (TaskField::Description, self.description.is_some()),
            (TaskField::DueDate, self.due_date.is_some()),
            (TaskField::Status, self.status.is_some()),
            (TaskField::Url, self.url.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, present)| present.then_some(field))
        .collect()
    }

    /// Returns whether no field changes are requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }
}
