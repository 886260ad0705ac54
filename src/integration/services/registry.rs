//! Host-side registry of loaded source plugins.
//!
//! Provides [`IntegrationRegistry`], which maps source names to plugin
//! instances and routes task operations to the plugin that owns a task.

use crate::integration::{
    domain::{SourceName, SourceTaskId, StandardTask, TaskChanges},
    ports::{IntegrationError, TaskSourceIntegration},
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors returned by registry operations.
#[derive(Debug, Clone, Error)]
pub enum IntegrationRegistryError {
    /// A plugin with the same source name is already registered.
    #[error("source already registered: {0}")]
    DuplicateSource(SourceName),

    /// No plugin is registered under the source name.
    #[error("unknown source: {0}")]
    UnknownSource(SourceName),

    /// The plugin reported a failure.
    #[error(transparent)]
    Integration(#[from] IntegrationError),
}

/// Result type for registry operations.
pub type IntegrationRegistryResult<T> = Result<T, IntegrationRegistryError>;

/// Lookup table of plugin instances keyed by source name.
#[derive(Clone, Default)]
pub struct IntegrationRegistry {
    sources: BTreeMap<SourceName, Arc<dyn TaskSourceIntegration>>,
}

impl IntegrationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin under its own source name.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRegistryError::DuplicateSource`] when the name is
    /// already taken.
    pub fn register(
        &mut self,
        source: Arc<dyn TaskSourceIntegration>,
    ) -> IntegrationRegistryResult<()> {
        let name = source.source_name().clone();
        if self.sources.contains_key(&name) {
            return Err(IntegrationRegistryError::DuplicateSource(name));
        }
        debug!(source = %name, "registered task source");
        self.sources.insert(name, source);
        Ok(())
    }

    /// Removes a plugin, returning it when present.
    pub fn unregister(&mut self, name: &SourceName) -> Option<Arc<dyn TaskSourceIntegration>> {
        self.sources.remove(name)
    }

    /// Returns the plugin registered under `name`.
    #[must_use]
    pub fn get(&self, name: &SourceName) -> Option<Arc<dyn TaskSourceIntegration>> {
        self.sources.get(name).cloned()
    }

    /// Returns whether a plugin is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &SourceName) -> bool {
        self.sources.contains_key(name)
    }

    /// Returns registered source names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<SourceName> {
        self.sources.keys().cloned().collect()
    }

    /// Returns the number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns whether no plugins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Fetches a task from the named source.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRegistryError::UnknownSource`] for unregistered
    /// names or [`IntegrationRegistryError::Integration`] when the plugin
    /// fails.
    pub async fn get_task(
        &self,
        name: &SourceName,
        source_task_id: &SourceTaskId,
    ) -> IntegrationRegistryResult<Option<StandardTask>> {
        let source = self.require(name)?;
        Ok(source.get_task(source_task_id).await?)
    }

    /// Applies changes to a task in the named source.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRegistryError::UnknownSource`] for unregistered
    /// names or [`IntegrationRegistryError::Integration`] when the plugin
    /// rejects the update.
    pub async fn update_task(
        &self,
        name: &SourceName,
        source_task_id: &SourceTaskId,
        changes: &TaskChanges,
    ) -> IntegrationRegistryResult<StandardTask> {
        let source = self.require(name)?;
        Ok(source.update_task(source_task_id, changes).await?)
    }

    fn require(&self, name: &SourceName) -> IntegrationRegistryResult<&Arc<dyn TaskSourceIntegration>> {
        self.sources
            .get(name)
            .ok_or_else(|| IntegrationRegistryError::UnknownSource(name.clone()))
    }
}

impl fmt::Debug for IntegrationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationRegistry")
            .field("sources", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}
