//! Contract implemented by every task-source plugin.

use crate::integration::domain::{
    Capability, ChangeEvent, ConfigError, DomainError, SourceCapabilities, SourceConfig,
    SourceName, SourceTaskId, StandardTask, SyncState, TaskChanges, WebhookRequest,
};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task-source operations.
pub type IntegrationResult<T> = Result<T, IntegrationError>;

/// Stream of tasks discovered by a poll.
pub type TaskChangeStream<'a> = BoxStream<'a, IntegrationResult<StandardTask>>;

/// Contract between the aggregator and a source plugin (Jira, GitHub, ...).
///
/// Plugins map their source system onto [`StandardTask`]. `get_task` and
/// `update_task` are required. Polling and webhook parsing are optional and
/// report [`IntegrationError::Unsupported`] unless overridden.
///
/// Operations that may reach the network are `async` so a host can drive many
/// plugins concurrently. The contract holds no state beyond the configuration
/// supplied at construction.
///
/// A plugin that omits a required operation is rejected at compile time:
///
/// ```compile_fail
/// use async_trait::async_trait;
/// use wondoner_interfaces::integration::{
///     domain::{SourceConfig, SourceName, SourceTaskId, StandardTask},
///     ports::{IntegrationResult, TaskSourceIntegration},
/// };
///
/// struct Incomplete {
///     config: SourceConfig,
///     source_name: SourceName,
/// }
///
/// #[async_trait]
/// impl TaskSourceIntegration for Incomplete {
///     fn from_config(config: SourceConfig) -> IntegrationResult<Self> {
///         Ok(Self { config, source_name: SourceName::new("incomplete")? })
///     }
///
///     fn config(&self) -> &SourceConfig {
///         &self.config
///     }
///
///     fn source_name(&self) -> &SourceName {
///         &self.source_name
///     }
///
///     async fn get_task(&self, _id: &SourceTaskId) -> IntegrationResult<Option<StandardTask>> {
///         Ok(None)
///     }
/// }
/// ```
#[async_trait]
pub trait TaskSourceIntegration: Send + Sync {
    /// Builds a plugin instance from host-resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::Config`] when required settings are
    /// missing or malformed.
    fn from_config(config: SourceConfig) -> IntegrationResult<Self>
    where
        Self: Sized;

    /// Returns the configuration the plugin was built with.
    fn config(&self) -> &SourceConfig;

    /// Returns the plugin identifier (e.g. `jira`, `github`).
    fn source_name(&self) -> &SourceName;

    /// Declares which optional change-detection methods are implemented.
    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::none()
    }

    /// Fetches the current state of a task by its native identifier.
    ///
    /// Returns `None` when the task cannot be found or is not accessible with
    /// the configured credentials.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::Transport`] when the source cannot be
    /// reached or answers with an unexpected failure.
    async fn get_task(&self, source_task_id: &SourceTaskId)
    -> IntegrationResult<Option<StandardTask>>;

    /// Applies standardized changes to a task and returns its full state after
    /// the source accepted the update.
    ///
    /// Only fields present in `changes` are touched.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::NotFound`] for unknown tasks and
    /// [`IntegrationError::UpdateRejected`] when the source refuses the change.
    async fn update_task(
        &self,
        source_task_id: &SourceTaskId,
        changes: &TaskChanges,
    ) -> IntegrationResult<StandardTask>;

    /// Streams tasks created or updated since `last_sync_state`.
    ///
    /// `None` requests an initial sync. The sync state is opaque to the host;
    /// pagination is handled inside the plugin.
    ///
    /// # Errors
    ///
    /// The default implementation returns [`IntegrationError::Unsupported`].
    async fn poll_changes<'a>(
        &'a self,
        last_sync_state: Option<&'a SyncState>,
    ) -> IntegrationResult<TaskChangeStream<'a>> {
        let _ = last_sync_state;
        Err(IntegrationError::unsupported(
            self.source_name(),
            Capability::Polling,
        ))
    }

    /// Parses a webhook delivery into a standardized change event.
    ///
    /// Returns `None` when the payload is unrecognized, irrelevant, or fails
    /// signature validation.
    ///
    /// # Errors
    ///
    /// The default implementation returns [`IntegrationError::Unsupported`].
    fn parse_webhook_payload(
        &self,
        request: &WebhookRequest,
    ) -> IntegrationResult<Option<ChangeEvent>> {
        let _ = request;
        Err(IntegrationError::unsupported(
            self.source_name(),
            Capability::Webhooks,
        ))
    }
}

/// Errors returned by task-source plugins.
#[derive(Debug, Clone, Error)]
pub enum IntegrationError {
    /// The task does not exist in the source system.
    #[error("task not found: {0}")]
    NotFound(SourceTaskId),

    /// The source system refused an update.
    #[error("update of task {source_task_id} rejected: {reason}")]
    UpdateRejected {
        /// Task the update targeted.
        source_task_id: SourceTaskId,
        /// Reason reported by the source or plugin.
        reason: String,
    },

    /// The plugin does not implement an optional capability.
    #[error("{source_name} does not support {capability}")]
    Unsupported {
        /// Plugin that was asked.
        source_name: SourceName,
        /// Capability that was requested.
        capability: Capability,
    },

    /// Plugin configuration is missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A source value could not be mapped into the standardized model.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Poll checkpoint or webhook payload could not be interpreted.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The source system could not be reached or failed unexpectedly.
    #[error("source transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl IntegrationError {
    /// Reports an unimplemented optional capability.
    #[must_use]
    pub fn unsupported(source_name: &SourceName, capability: Capability) -> Self {
        Self::Unsupported {
            source_name: source_name.clone(),
            capability,
        }
    }

    /// Reports an update refused by the source.
    #[must_use]
    pub fn update_rejected(source_task_id: &SourceTaskId, reason: impl Into<String>) -> Self {
        Self::UpdateRejected {
            source_task_id: source_task_id.clone(),
            reason: reason.into(),
        }
    }

    /// Wraps a transport-specific error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
