//! Record actions: get, create, update, create-or-update and delete.

use lopdns::{LopDnsClient, Matcher, Record};
use tracing::{info, warn};

use super::Context;
use crate::error::CommandError;
use crate::mutator::{Change, ChangeKind, Mutator};
use crate::output::{self, ZoneRecords};

/// `get-records`: list every record of the target zones, zone by zone
pub async fn get_records(ctx: &Context, zones: &[String]) -> Result<(), CommandError> {
    let mut listing = Vec::with_capacity(zones.len());
    for zone in zones {
        let records = ctx.client.records().list(zone).await?;
        listing.push(ZoneRecords {
            zone: zone.clone(),
            records,
        });
    }

    output::print_records(&listing, ctx.settings.output_format)?;
    Ok(())
}

/// `create-record`: create a record whether or not a similar one exists
pub async fn create_record(ctx: &Context) -> Result<(), CommandError> {
    let change = create(ctx, &mutator(ctx)).await?;
    output::print_changes(&[change], ctx.settings.output_format)?;
    Ok(())
}

/// `update-record` and `createorupdate-record`.
///
/// Matches are walked in order. Records that already hold the requested
/// content are skipped and the walk goes on; it stops after the first real
/// update unless all-records mode is on. Without a match, either fails or,
/// with `create_missing`, creates the record instead. `update-record` also
/// fails when every match was skipped.
pub async fn update_records(ctx: &Context, create_missing: bool) -> Result<(), CommandError> {
    let selection = &ctx.settings.selection;
    let spec = &ctx.settings.mutation;
    let records = ctx.client.records().list(&selection.zone).await?;
    let matcher = Matcher::new(selection)?;
    let matches = matcher.filter(&records);
    let mutator = mutator(ctx);

    if matches.is_empty() {
        if !create_missing {
            return Err(no_records_updated(ctx));
        }

        info!(zone = %selection.zone, name = %selection.name, "no matching record, creating it");
        let change = create(ctx, &mutator).await?;
        output::print_changes(&[change], ctx.settings.output_format)?;
        return Ok(());
    }

    let mut changes = Vec::with_capacity(matches.len());
    let mut updated = 0;
    for record in matches {
        match mutator.apply_update(&selection.zone, record, spec).await {
            Ok(change) => {
                let skipped = change.action == ChangeKind::Skipped;
                changes.push(change);
                if skipped {
                    continue;
                }
                updated += 1;
                if !selection.match_all {
                    break;
                }
            }
            Err(source) => {
                report_partial(ctx, &changes);
                return Err(CommandError::UpdateFailed {
                    zone: selection.zone.clone(),
                    name: record.name.clone(),
                    record_type: record.record_type.clone(),
                    source,
                });
            }
        }
    }

    output::print_changes(&changes, ctx.settings.output_format)?;
    if updated == 0 && !create_missing {
        return Err(no_records_updated(ctx));
    }
    Ok(())
}

/// `delete-record`: delete the first match, or every match in all-records mode
pub async fn delete_records(ctx: &Context) -> Result<(), CommandError> {
    let selection = &ctx.settings.selection;
    let records = ctx.client.records().list(&selection.zone).await?;
    let matcher = Matcher::new(selection)?;
    let selected: Vec<&Record> = matcher.select(&records);

    if selected.is_empty() {
        return Err(CommandError::NoRecordsDeleted {
            zone: selection.zone.clone(),
            name: selection.name.clone(),
            record_type: selection.record_type.clone(),
        });
    }

    let mutator = mutator(ctx);
    let mut changes = Vec::with_capacity(selected.len());
    for record in selected {
        match mutator.apply_delete(&selection.zone, record).await {
            Ok(change) => changes.push(change),
            Err(source) => {
                report_partial(ctx, &changes);
                return Err(CommandError::DeleteFailed {
                    zone: selection.zone.clone(),
                    name: record.name.clone(),
                    record_type: record.record_type.clone(),
                    source,
                });
            }
        }
    }

    output::print_changes(&changes, ctx.settings.output_format)?;
    Ok(())
}

fn no_records_updated(ctx: &Context) -> CommandError {
    let selection = &ctx.settings.selection;
    CommandError::NoRecordsUpdated {
        zone: selection.zone.clone(),
        name: selection.name.clone(),
        record_type: selection.record_type.clone(),
    }
}

fn mutator(ctx: &Context) -> Mutator<'_, LopDnsClient> {
    Mutator::new(&ctx.client, ctx.settings.dry_run)
}

async fn create(ctx: &Context, mutator: &Mutator<'_, LopDnsClient>) -> Result<Change, CommandError> {
    let zone = &ctx.settings.selection.zone;
    let spec = ctx.settings.new_record();

    mutator
        .apply_create(zone, &spec)
        .await
        .map_err(|source| CommandError::CreateFailed {
            zone: zone.clone(),
            name: spec.name.clone(),
            record_type: spec.record_type.clone(),
            source,
        })
}

/// Show what was already changed before a later record failed
fn report_partial(ctx: &Context, changes: &[Change]) {
    if changes.is_empty() {
        return;
    }
    if let Err(e) = output::print_changes(changes, ctx.settings.output_format) {
        warn!(error = %e, "could not print completed changes");
    }
}
