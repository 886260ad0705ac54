//! Given steps for task-source contract BDD scenarios.

use super::world::TaskSourceWorld;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use wondoner_interfaces::integration::{
    adapters::memory::InMemoryTaskSource,
    domain::{ProjectId, SourceConfig, SourceTaskId, StandardTask, TaskId},
    ports::TaskSourceIntegration,
};

#[given(r#"an in-memory source named "{name}""#)]
fn in_memory_source(world: &mut TaskSourceWorld, name: String) -> Result<(), eyre::Report> {
    let source = InMemoryTaskSource::from_config(SourceConfig::new().with("source_name", name))
        .wrap_err("build in-memory source")?;
    world.source = Some(source);
    Ok(())
}

#[given(r#"a signing in-memory source named "{name}" with secret "{secret}""#)]
fn signing_source(
    world: &mut TaskSourceWorld,
    name: String,
    secret: String,
) -> Result<(), eyre::Report> {
    let config = SourceConfig::new()
        .with("source_name", name)
        .with("webhook_secret", secret);
    let source =
        InMemoryTaskSource::from_config(config).wrap_err("build signing in-memory source")?;
    world.source = Some(source);
    Ok(())
}

#[given(r#"the source holds task "{source_task_id}" titled "{title}""#)]
fn source_holds_task(
    world: &mut TaskSourceWorld,
    source_task_id: String,
    title: String,
) -> Result<(), eyre::Report> {
    let source = world.source()?;
    let task = StandardTask::new(
        TaskId::new(),
        ProjectId::new(),
        SourceTaskId::new(source_task_id).wrap_err("source task id")?,
        source.source_name().clone(),
        title,
    )
    .wrap_err("build standard task")?;
    source.insert(task).wrap_err("store task")?;
    Ok(())
}
