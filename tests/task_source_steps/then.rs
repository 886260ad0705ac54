//! Then steps for task-source contract BDD scenarios.

use super::world::TaskSourceWorld;
use rstest_bdd_macros::then;
use wondoner_interfaces::integration::{
    domain::{ChangeEventKind, TaskStatus},
    ports::IntegrationError,
};

#[then(r#"the fetched task is titled "{title}""#)]
fn fetched_task_titled(world: &TaskSourceWorld, title: String) -> Result<(), eyre::Report> {
    let task = world
        .last_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no task was fetched"))?;
    if task.name() != title {
        return Err(eyre::eyre!("expected title {title}, found {}", task.name()));
    }
    Ok(())
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskSourceWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world
        .last_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            task.status()
        ));
    }
    Ok(())
}

#[then("the update fails with a not found error")]
fn update_fails_not_found(world: &TaskSourceWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_update
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing update result"))?;
    if !matches!(result, Err(IntegrationError::NotFound(_))) {
        return Err(eyre::eyre!("expected NotFound error, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the webhook yields a "{kind}" event for task "{source_task_id}""#)]
fn webhook_yields_event(
    world: &TaskSourceWorld,
    kind: String,
    source_task_id: String,
) -> Result<(), eyre::Report> {
    let expected_kind = ChangeEventKind::try_from(kind.as_str())
        .map_err(|err| eyre::eyre!("invalid expected event kind in scenario: {err}"))?;
    let event = world
        .last_event
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no webhook was delivered"))?
        .as_ref()
        .ok_or_else(|| eyre::eyre!("webhook was ignored"))?;
    if event.kind() != expected_kind || event.source_task_id().as_str() != source_task_id {
        return Err(eyre::eyre!("unexpected event {event:?}"));
    }
    Ok(())
}

#[then("the webhook is ignored")]
fn webhook_is_ignored(world: &TaskSourceWorld) -> Result<(), eyre::Report> {
    match world.last_event.as_ref() {
        Some(None) => Ok(()),
        Some(Some(event)) => Err(eyre::eyre!("expected webhook to be ignored, got {event:?}")),
        None => Err(eyre::eyre!("no webhook was delivered")),
    }
}
