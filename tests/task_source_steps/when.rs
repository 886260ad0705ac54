//! When steps for task-source contract BDD scenarios.

use super::world::{TaskSourceWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use serde_json::json;
use wondoner_interfaces::integration::{
    adapters::memory::SIGNATURE_HEADER,
    domain::{
        SourceTaskId, TaskChanges, TaskStatus, WebhookHeaders, WebhookRequest, WebhookSignature,
    },
    ports::TaskSourceIntegration,
};

#[when(r#"the host fetches task "{source_task_id}""#)]
fn host_fetches_task(
    world: &mut TaskSourceWorld,
    source_task_id: String,
) -> Result<(), eyre::Report> {
    let id = SourceTaskId::new(source_task_id).wrap_err("source task id")?;
    let fetched = run_async(world.source()?.get_task(&id)).wrap_err("fetch task")?;
    world.last_task = fetched;
    Ok(())
}

#[when(r#"the host marks task "{source_task_id}" as done"#)]
fn host_marks_task_done(
    world: &mut TaskSourceWorld,
    source_task_id: String,
) -> Result<(), eyre::Report> {
    let id = SourceTaskId::new(source_task_id).wrap_err("source task id")?;
    let changes = TaskChanges::new().with_status(TaskStatus::Done);
    let result = run_async(world.source()?.update_task(&id, &changes));
    if let Ok(ref updated) = result {
        world.last_task = Some(updated.clone());
    }
    world.last_update = Some(result);
    Ok(())
}

#[when(r#"a "{kind}" webhook for task "{source_task_id}" arrives signed with "{secret}""#)]
fn webhook_arrives(
    world: &mut TaskSourceWorld,
    kind: String,
    source_task_id: String,
    secret: String,
) -> Result<(), eyre::Report> {
    let body = serde_json::to_vec(&json!({
        "event_type": kind,
        "source_task_id": source_task_id,
    }))
    .wrap_err("encode webhook body")?;
    let signature = WebhookSignature::new(secret).sign(&body);
    let headers: WebhookHeaders = [(SIGNATURE_HEADER, signature)].into_iter().collect();
    let request = WebhookRequest::from_body(body, headers).wrap_err("build webhook request")?;

    let event = world
        .source()?
        .parse_webhook_payload(&request)
        .wrap_err("parse webhook payload")?;
    world.last_event = Some(event);
    Ok(())
}
