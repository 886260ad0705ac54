//! Shared world state for task-source contract BDD scenarios.

use wondoner_interfaces::integration::{
    adapters::memory::InMemoryTaskSource,
    domain::{ChangeEvent, StandardTask},
    ports::IntegrationResult,
};
use rstest::fixture;

/// Scenario world for task-source behaviour tests.
#[derive(Default)]
pub struct TaskSourceWorld {
    pub source: Option<InMemoryTaskSource>,
    pub last_task: Option<StandardTask>,
    pub last_update: Option<IntegrationResult<StandardTask>>,
    pub last_event: Option<Option<ChangeEvent>>,
}

impl TaskSourceWorld {
    /// Returns the configured source or a scenario error.
    pub fn source(&self) -> Result<&InMemoryTaskSource, eyre::Report> {
        self.source
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing source in scenario world"))
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskSourceWorld {
    TaskSourceWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
