//! Integration tests for a plugin implemented outside the crate.
//!
//! `TodoApiSource` maps a fake REST backend onto the standardized model the
//! way a real connector would: native payloads become `StandardTask`s,
//! transport failures become `IntegrationError::Transport`, and refusals from
//! the backend become `IntegrationError::UpdateRejected`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::TryStreamExt;
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::{Value, json};
use wondoner_interfaces::integration::{
    domain::{
        Capability, ProjectId, SourceCapabilities, SourceConfig, SourceName, SourceTaskId,
        StandardTask, SyncState, TaskChanges, TaskId, TaskStatus,
    },
    ports::{IntegrationError, IntegrationResult, TaskChangeStream, TaskSourceIntegration},
    services::IntegrationRegistry,
};

#[derive(Debug, Deserialize)]
struct TodoApiSettings {
    base_url: String,
    api_token: String,
    project_id: ProjectId,
}

/// Responses served by the fake backend.
#[derive(Debug, Default)]
struct FakeBackend {
    items: HashMap<String, Value>,
    offline: bool,
    read_only: bool,
}

struct TodoApiSource {
    config: SourceConfig,
    settings: TodoApiSettings,
    source_name: SourceName,
    backend: Arc<Mutex<FakeBackend>>,
}

impl TodoApiSource {
    fn backend(&self) -> IntegrationResult<std::sync::MutexGuard<'_, FakeBackend>> {
        self.backend
            .lock()
            .map_err(|err| IntegrationError::transport(std::io::Error::other(err.to_string())))
    }

    fn map_item(&self, item: &Value) -> IntegrationResult<StandardTask> {
        let id = item["id"]
            .as_str()
            .ok_or_else(|| IntegrationError::InvalidPayload("item without id".to_owned()))?;
        let content = item["content"].as_str().unwrap_or_default();
        let completed = item["checked"].as_bool().unwrap_or(false);

        let task = StandardTask::new(
            TaskId::new(),
            self.settings.project_id,
            SourceTaskId::new(id)?,
            self.source_name.clone(),
            content,
        )?
        .with_status(TaskStatus::from_completed(completed))
        .with_url(format!("{}/tasks/{id}", self.settings.base_url))
        .with_raw_data(item.clone());
        Ok(task)
    }
}

#[async_trait]
impl TaskSourceIntegration for TodoApiSource {
    fn from_config(config: SourceConfig) -> IntegrationResult<Self> {
        let settings: TodoApiSettings = config.deserialize_into()?;
        Ok(Self {
            config,
            settings,
            source_name: SourceName::new("todo_api")?,
            backend: Arc::new(Mutex::new(FakeBackend::default())),
        })
    }

    fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn source_name(&self) -> &SourceName {
        &self.source_name
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::none().with_polling()
    }

    async fn get_task(
        &self,
        source_task_id: &SourceTaskId,
    ) -> IntegrationResult<Option<StandardTask>> {
        let backend = self.backend()?;
        if backend.offline {
            return Err(IntegrationError::transport(std::io::Error::other(
                "connection refused",
            )));
        }
        let item = backend.items.get(source_task_id.as_str()).cloned();
        drop(backend);
        item.map(|raw| self.map_item(&raw)).transpose()
    }

    async fn update_task(
        &self,
        source_task_id: &SourceTaskId,
        changes: &TaskChanges,
    ) -> IntegrationResult<StandardTask> {
        let mut backend = self.backend()?;
        if backend.read_only {
            return Err(IntegrationError::update_rejected(
                source_task_id,
                "403 Forbidden",
            ));
        }
        let item = backend
            .items
            .get_mut(source_task_id.as_str())
            .ok_or_else(|| IntegrationError::NotFound(source_task_id.clone()))?;
        if let Some(name) = changes.name() {
            item["content"] = json!(name);
        }
        if let Some(status) = changes.status() {
            item["checked"] = json!(status.is_done());
        }
        let snapshot = item.clone();
        drop(backend);
        self.map_item(&snapshot)
    }

    async fn poll_changes<'a>(
        &'a self,
        last_sync_state: Option<&'a SyncState>,
    ) -> IntegrationResult<TaskChangeStream<'a>> {
        let cursor = last_sync_state
            .and_then(SyncState::as_token)
            .unwrap_or_default()
            .to_owned();
        let backend = self.backend()?;
        let mut ids: Vec<&String> = backend
            .items
            .keys()
            .filter(|id| id.as_str() > cursor.as_str())
            .collect();
        ids.sort();
        let tasks: Vec<IntegrationResult<StandardTask>> = ids
            .into_iter()
            .filter_map(|id| backend.items.get(id))
            .map(|item| self.map_item(item))
            .collect();
        Ok(Box::pin(futures::stream::iter(tasks)))
    }
}

fn settings() -> SourceConfig {
    SourceConfig::new()
        .with("base_url", "https://todo.example.com")
        .with("api_token", "tok_123")
        .with("project_id", ProjectId::new().to_string())
}

fn id(raw: &str) -> SourceTaskId {
    SourceTaskId::new(raw).expect("valid source task id")
}

#[fixture]
fn plugin() -> TodoApiSource {
    let plugin = TodoApiSource::from_config(settings()).expect("plugin should build");
    {
        let mut backend = plugin.backend.lock().expect("backend lock");
        backend.items.insert(
            "101".to_owned(),
            json!({ "id": "101", "content": "Renew passport", "checked": false }),
        );
        backend.items.insert(
            "102".to_owned(),
            json!({ "id": "102", "content": "Book dentist", "checked": true }),
        );
    }
    plugin
}

#[rstest]
fn construction_requires_complete_settings() {
    let result = TodoApiSource::from_config(SourceConfig::new().with("api_token", "tok"));
    assert!(matches!(result, Err(IntegrationError::Config(_))));
}

#[rstest]
fn plugin_reads_settings_from_config(plugin: TodoApiSource) {
    assert_eq!(plugin.settings.api_token, "tok_123");
    assert_eq!(
        plugin.config().require_str("base_url"),
        Ok("https://todo.example.com")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_task_maps_native_payload(plugin: TodoApiSource) {
    let task = plugin
        .get_task(&id("102"))
        .await
        .expect("lookup should succeed")
        .expect("task should exist");

    assert_eq!(task.name(), "Book dentist");
    assert_eq!(task.status(), TaskStatus::Done);
    assert_eq!(task.source_name().as_str(), "todo_api");
    assert_eq!(task.url(), Some("https://todo.example.com/tasks/102"));
    assert_eq!(task.raw_data().and_then(|raw| raw["checked"].as_bool()), Some(true));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transport_failures_do_not_leak_backend_types(plugin: TodoApiSource) {
    plugin.backend.lock().expect("backend lock").offline = true;

    let result = plugin.get_task(&id("101")).await;
    let Err(err) = result else {
        panic!("offline backend should fail");
    };
    assert!(matches!(err, IntegrationError::Transport(_)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_task_returns_state_after_update(plugin: TodoApiSource) {
    let updated = plugin
        .update_task(
            &id("101"),
            &TaskChanges::new()
                .with_name("Renew passport online")
                .with_status(TaskStatus::Done),
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.name(), "Renew passport online");
    assert_eq!(updated.status(), TaskStatus::Done);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backend_refusals_surface_as_rejections(plugin: TodoApiSource) {
    plugin.backend.lock().expect("backend lock").read_only = true;

    let result = plugin
        .update_task(&id("101"), &TaskChanges::new().with_status(TaskStatus::Done))
        .await;
    let Err(err) = result else {
        panic!("read-only backend should reject updates");
    };
    assert_eq!(
        err.to_string(),
        "update of task 101 rejected: 403 Forbidden"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn poll_changes_resumes_after_cursor(plugin: TodoApiSource) {
    let cursor = SyncState::from_token("101");
    let polled: Vec<StandardTask> = plugin
        .poll_changes(Some(&cursor))
        .await
        .expect("poll should start")
        .try_collect()
        .await
        .expect("poll should complete");

    assert_eq!(polled.len(), 1);
    assert_eq!(polled.first().map(StandardTask::name), Some("Book dentist"));
}

#[rstest]
fn webhooks_remain_unsupported(plugin: TodoApiSource) {
    assert!(!plugin.capabilities().supports(Capability::Webhooks));
    let request = wondoner_interfaces::integration::domain::WebhookRequest::new(
        json!({}),
        Vec::new(),
        wondoner_interfaces::integration::domain::WebhookHeaders::new(),
    );
    assert!(matches!(
        plugin.parse_webhook_payload(&request),
        Err(IntegrationError::Unsupported {
            capability: Capability::Webhooks,
            ..
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registry_dispatches_to_external_plugins(plugin: TodoApiSource) {
    let mut registry = IntegrationRegistry::new();
    registry
        .register(Arc::new(plugin))
        .expect("register plugin");

    let name = SourceName::new("todo_api").expect("valid source name");
    let fetched = registry
        .get_task(&name, &id("101"))
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched.map(|task| task.status()), Some(TaskStatus::NotDone));
}
