//! In-memory task source for host development and contract tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use mockable::{Clock, DefaultClock};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

use crate::integration::{
    domain::{
        ChangeEvent, SourceCapabilities, SourceConfig, SourceName, SourceTaskId, StandardTask,
        SyncState, TaskChanges, WebhookRequest, WebhookSignature,
    },
    ports::{IntegrationError, IntegrationResult, TaskChangeStream, TaskSourceIntegration},
};

/// Source name used when the configuration does not provide one.
pub const DEFAULT_SOURCE_NAME: &str = "memory";

/// Header carrying the `sha256=<hex>` body signature.
pub const SIGNATURE_HEADER: &str = "x-wondoner-signature";

/// Settings read from [`SourceConfig`].
#[derive(Debug, Default, Deserialize)]
struct InMemorySettings {
    #[serde(default)]
    source_name: Option<String>,
    #[serde(default)]
    webhook_secret: Option<String>,
}

/// Thread-safe task source backed by process memory.
///
/// Supports every optional capability: polling returns tasks whose
/// `updated_at` is at or after an RFC 3339 timestamp held in the sync state,
/// and webhook deliveries are verified with the configured `webhook_secret`
/// before parsing.
///
/// Checkpoints are inclusive, so a task stamped at the checkpoint instant may
/// be delivered twice but never skipped.
#[derive(Clone)]
pub struct InMemoryTaskSource {
    config: SourceConfig,
    source_name: SourceName,
    signature: Option<WebhookSignature>,
    clock: Arc<dyn Clock + Send + Sync>,
    tasks: Arc<RwLock<HashMap<SourceTaskId, StandardTask>>>,
}

impl InMemoryTaskSource {
    /// Replaces the clock used to stamp updates and sync states.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    /// Stores a task, returning any previous task with the same source ID.
    ///
    /// Missing `created_at` and `updated_at` are stamped from the clock so the
    /// task shows up in the next incremental poll.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::InvalidPayload`] when the task was produced
    /// by a different source.
    pub fn insert(&self, task: StandardTask) -> IntegrationResult<Option<StandardTask>> {
        if task.source_name() != &self.source_name {
            return Err(IntegrationError::InvalidPayload(format!(
                "task {} belongs to source {}, not {}",
                task.source_id(),
                task.source_name(),
                self.source_name
            )));
        }
        let mut tasks = self.write()?;
        let now = self.clock.utc();
        let created_at = task.created_at().unwrap_or(now);
        let updated_at = task.updated_at().unwrap_or(now);
        let stamped = task.with_created_at(created_at).with_updated_at(updated_at);
        Ok(tasks.insert(stamped.source_id().clone(), stamped))
    }

    /// Removes a task by its source identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::Transport`] when the store lock is
    /// poisoned.
    pub fn remove(&self, source_task_id: &SourceTaskId) -> IntegrationResult<Option<StandardTask>> {
        let mut tasks = self.write()?;
        Ok(tasks.remove(source_task_id))
    }

    /// Returns the number of stored tasks.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::Transport`] when the store lock is
    /// poisoned.
    pub fn len(&self) -> IntegrationResult<usize> {
        Ok(self.read()?.len())
    }

    /// Returns whether the store is empty.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::Transport`] when the store lock is
    /// poisoned.
    pub fn is_empty(&self) -> IntegrationResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Returns a sync state marking the current clock time.
    ///
    /// Take it *before* the poll it precedes; a marker taken after polling
    /// skips changes made in between. Prefer [`Self::poll_changes_since`],
    /// which returns the marker with the stream.
    #[must_use]
    pub fn sync_state_now(&self) -> SyncState {
        checkpoint_state(self.clock.utc())
    }

    /// Polls for changes and returns the sync state for the next poll.
    ///
    /// The returned state is read under the same lock as the snapshot, so any
    /// later update is stamped at or after it.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::InvalidPayload`] when `last_sync_state` is
    /// not an RFC 3339 string, or [`IntegrationError::Transport`] when the
    /// store lock is poisoned.
    pub fn poll_changes_since(
        &self,
        last_sync_state: Option<&SyncState>,
    ) -> IntegrationResult<(TaskChangeStream<'static>, SyncState)> {
        let since = last_sync_state.map(parse_checkpoint).transpose()?;
        let tasks = self.read()?;
        let next = checkpoint_state(self.clock.utc());
        let mut changed: Vec<StandardTask> = tasks
            .values()
            .filter(|task| match since {
                None => true,
                Some(checkpoint) => task
                    .updated_at()
                    .is_some_and(|updated_at| updated_at >= checkpoint),
            })
            .cloned()
            .collect();
        drop(tasks);
        changed.sort_by(|left, right| {
            left.updated_at()
                .cmp(&right.updated_at())
                .then_with(|| left.source_id().cmp(right.source_id()))
        });

        debug!(
            source = %self.source_name,
            initial = since.is_none(),
            count = changed.len(),
            "polled changes"
        );
        Ok((futures::stream::iter(changed.into_iter().map(Ok)).boxed(), next))
    }

    fn read(&self) -> IntegrationResult<RwLockReadGuard<'_, HashMap<SourceTaskId, StandardTask>>> {
        self.tasks.read().map_err(|err| {
            IntegrationError::transport(std::io::Error::other(err.to_string()))
        })
    }

    fn write(
        &self,
    ) -> IntegrationResult<RwLockWriteGuard<'_, HashMap<SourceTaskId, StandardTask>>> {
        self.tasks.write().map_err(|err| {
            IntegrationError::transport(std::io::Error::other(err.to_string()))
        })
    }

    fn verify_signature(&self, request: &WebhookRequest) -> bool {
        let Some(signature) = &self.signature else {
            return true;
        };
        let Some(header) = request.headers().get(SIGNATURE_HEADER) else {
            warn!(source = %self.source_name, "webhook delivery missing signature header");
            return false;
        };
        match signature.verify(request.body(), header) {
            Ok(true) => true,
            Ok(false) => {
                warn!(source = %self.source_name, "webhook signature mismatch");
                false
            }
            Err(err) => {
                warn!(source = %self.source_name, error = %err, "webhook signature unreadable");
                false
            }
        }
    }
}

impl fmt::Debug for InMemoryTaskSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTaskSource")
            .field("source_name", &self.source_name)
            .field("config", &self.config)
            .field("verifies_signatures", &self.signature.is_some())
            .finish_non_exhaustive()
    }
}

fn checkpoint_state(at: DateTime<Utc>) -> SyncState {
    SyncState::from_token(at.to_rfc3339())
}

/// Parses the RFC 3339 checkpoint carried by a sync state.
fn parse_checkpoint(state: &SyncState) -> IntegrationResult<DateTime<Utc>> {
    let token = state.as_token().ok_or_else(|| {
        IntegrationError::InvalidPayload("sync state must be an RFC 3339 string".to_owned())
    })?;
    DateTime::parse_from_rfc3339(token)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|err| IntegrationError::InvalidPayload(format!("invalid sync state: {err}")))
}

#[async_trait]
impl TaskSourceIntegration for InMemoryTaskSource {
    fn from_config(config: SourceConfig) -> IntegrationResult<Self> {
        let settings: InMemorySettings = config.deserialize_into()?;
        let source_name = SourceName::new(
            settings
                .source_name
                .unwrap_or_else(|| DEFAULT_SOURCE_NAME.to_owned()),
        )?;
        let signature = settings.webhook_secret.map(WebhookSignature::new);

        Ok(Self {
            config,
            source_name,
            signature,
            clock: Arc::new(DefaultClock),
            tasks: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn source_name(&self) -> &SourceName {
        &self.source_name
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::none().with_polling().with_webhooks()
    }

    async fn get_task(
        &self,
        source_task_id: &SourceTaskId,
    ) -> IntegrationResult<Option<StandardTask>> {
        let task = self.read()?.get(source_task_id).cloned();
        debug!(
            source = %self.source_name,
            source_task_id = %source_task_id,
            found = task.is_some(),
            "fetched task"
        );
        Ok(task)
    }

    async fn update_task(
        &self,
        source_task_id: &SourceTaskId,
        changes: &TaskChanges,
    ) -> IntegrationResult<StandardTask> {
        if changes.is_empty() {
            return Err(IntegrationError::update_rejected(
                source_task_id,
                "no changes requested",
            ));
        }

        let mut tasks = self.write()?;
        let current = tasks
            .get(source_task_id)
            .ok_or_else(|| IntegrationError::NotFound(source_task_id.clone()))?;
        let updated = current
            .apply_changes(changes)
            .map_err(|err| IntegrationError::update_rejected(source_task_id, err.to_string()))?
            .with_updated_at(self.clock.utc());

        tasks.insert(source_task_id.clone(), updated.clone());
        debug!(
            source = %self.source_name,
            source_task_id = %source_task_id,
            fields = ?changes.changed_fields(),
            "updated task"
        );
        Ok(updated)
    }

    async fn poll_changes<'a>(
        &'a self,
        last_sync_state: Option<&'a SyncState>,
    ) -> IntegrationResult<TaskChangeStream<'a>> {
        let (changes, _next) = self.poll_changes_since(last_sync_state)?;
        Ok(changes)
    }

    fn parse_webhook_payload(
        &self,
        request: &WebhookRequest,
    ) -> IntegrationResult<Option<ChangeEvent>> {
        if !self.verify_signature(request) {
            return Ok(None);
        }

        match serde_json::from_value::<ChangeEvent>(request.payload().clone()) {
            Ok(event) => {
                debug!(
                    source = %self.source_name,
                    source_task_id = %event.source_task_id(),
                    kind = %event.kind(),
                    "parsed webhook event"
                );
                Ok(Some(event))
            }
            Err(err) => {
                warn!(source = %self.source_name, error = %err, "ignoring unrecognized webhook payload");
                Ok(None)
            }
        }
    }
}
