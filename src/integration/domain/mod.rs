//! Domain model for task-source integrations.
//!
//! The integration domain holds the standardized vocabulary exchanged between
//! source plugins and the host aggregator: task records, project labels,
//! status values, change sets, change events, and polling checkpoints. All
//! transport concerns stay outside the domain boundary.

mod capabilities;
mod changes;
mod config;
mod error;
mod event;
mod ids;
mod project;
mod status;
mod sync;
mod task;
mod webhook;

pub use capabilities::{Capability, SourceCapabilities};
pub use changes::{TaskChanges, TaskField};
pub use config::{ConfigError, SourceConfig};
pub use error::{DomainError, ParseChangeEventKindError, ParseTaskFieldError, ParseTaskStatusError};
pub use event::{ChangeEvent, ChangeEventKind};
pub use ids::{ProjectId, SourceName, SourceTaskId, TaskId};
pub use project::Project;
pub use status::TaskStatus;
pub use sync::SyncState;
pub use task::StandardTask;
pub use webhook::{SIGNATURE_PREFIX, WebhookHeaders, WebhookRequest, WebhookSignature};
