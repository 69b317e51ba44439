//! `lopdns --action run-tasks` - run the copy tasks of the config file.

use anyhow::bail;
use lopdns::{CopyTask, MutationSpec, TaskPlan};
use tracing::{error, info};

use super::Context;
use crate::error::CommandError;
use crate::mutator::{Change, Mutator};
use crate::output;

/// Run every task, or those of `--zone`, in order. A failing task is logged
/// and the others still run.
pub async fn run_tasks(ctx: &Context, zones: &[String]) -> Result<(), CommandError> {
    let tasks: Vec<&CopyTask> = ctx
        .settings
        .tasks
        .iter()
        .filter(|t| ctx.settings.zone.as_ref().map_or(true, |z| *z == t.zone))
        .collect();
    if tasks.is_empty() {
        return Err(CommandError::InvalidArguments(format!(
            "no task works on zone {}",
            ctx.settings.zone.as_deref().unwrap_or_default()
        )));
    }

    let mut changes = Vec::with_capacity(tasks.len());
    let mut failed = 0;
    for task in &tasks {
        match run_task(ctx, zones, task).await {
            Ok(change) => changes.push(change),
            Err(e) => {
                failed += 1;
                error!(task = %task, "{e:#}");
            }
        }
    }

    output::print_changes(&changes, ctx.settings.output_format)?;
    if failed > 0 {
        return Err(CommandError::TasksFailed {
            failed,
            total: tasks.len(),
        });
    }
    Ok(())
}

async fn run_task(ctx: &Context, zones: &[String], task: &CopyTask) -> anyhow::Result<Change> {
    if !zones.contains(&task.zone) {
        bail!("zone not found: {}", task.zone);
    }

    let records = ctx.client.records().list(&task.zone).await?;
    let mutator = Mutator::new(&ctx.client, ctx.settings.dry_run || task.dry_run);

    match task.plan(&records)? {
        TaskPlan::UpToDate { target } => {
            info!(task = %task, content = %target.content, "target already carries the source data");
            Ok(mutator.skip(&task.zone, &target))
        }
        TaskPlan::Update {
            target,
            new_content,
        } => {
            let spec = MutationSpec {
                new_content: Some(new_content),
                ..MutationSpec::default()
            };
            Ok(mutator.apply_update(&task.zone, &target, &spec).await?)
        }
    }
}
