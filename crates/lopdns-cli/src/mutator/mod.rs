//! Applying record changes, for real or as a dry run.
//!
//! In dry-run mode the new state is computed from the request alone and no
//! create, update or delete call is made. Reads still go to the API.

use lopdns::{MutationSpec, NewRecordSpec, Record, RecordStore, Result};
use serde::Serialize;
use tracing::info;

/// What happened to one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
    /// The record already had the requested content
    Skipped,
}

/// Report for one record touched by a mutating action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub zone: String,
    pub action: ChangeKind,
    pub dry_run: bool,
    /// State before the change; `None` for creations
    pub before: Option<Record>,
    /// State after the change; `None` for deletions
    pub after: Option<Record>,
}

/// Sends record changes to a [`RecordStore`] unless running dry
pub struct Mutator<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    dry_run: bool,
}

impl<'a, S: RecordStore + ?Sized> Mutator<'a, S> {
    pub const fn new(store: &'a S, dry_run: bool) -> Self {
        Self { store, dry_run }
    }

    /// Apply `spec` to `record`.
    ///
    /// The API is asked to match the record on its current name, type and
    /// content. A spec that would leave the content as it is gets skipped
    /// without a request.
    pub async fn apply_update(
        &self,
        zone: &str,
        record: &Record,
        spec: &MutationSpec,
    ) -> Result<Change> {
        if spec.is_noop_for(record) {
            info!(zone, name = %record.name, record_type = %record.record_type, content = %record.content,
                "record content is already up to date");
            return Ok(self.skip(zone, record));
        }

        let after = if self.dry_run {
            let after = spec.apply_to(record);
            info!(zone, old = %record, new = %after, "[dry run] record would be updated");
            after
        } else {
            let after = self.store.update_record(zone, &spec.to_update(record)).await?;
            info!(zone, old = %record, new = %after, "record updated");
            after
        };

        Ok(self.change(zone, ChangeKind::Updated, Some(record.clone()), Some(after)))
    }

    /// Report `record` as left alone
    pub fn skip(&self, zone: &str, record: &Record) -> Change {
        self.change(zone, ChangeKind::Skipped, Some(record.clone()), Some(record.clone()))
    }

    /// Create a record
    pub async fn apply_create(&self, zone: &str, spec: &NewRecordSpec) -> Result<Change> {
        let new = spec.to_new_record();

        let created = if self.dry_run {
            let created = Record::from(new);
            info!(zone, record = %created, "[dry run] record would be created");
            created
        } else {
            let created = self.store.create_record(zone, &new).await?;
            info!(zone, record = %created, "record created");
            created
        };

        Ok(self.change(zone, ChangeKind::Created, None, Some(created)))
    }

    /// Delete a record
    pub async fn apply_delete(&self, zone: &str, record: &Record) -> Result<Change> {
        if self.dry_run {
            info!(zone, record = %record, "[dry run] record would be deleted");
        } else {
            self.store.delete_record(zone, &record.key()).await?;
            info!(zone, record = %record, "record deleted");
        }

        Ok(self.change(zone, ChangeKind::Deleted, Some(record.clone()), None))
    }

    fn change(
        &self,
        zone: &str,
        action: ChangeKind,
        before: Option<Record>,
        after: Option<Record>,
    ) -> Change {
        Change {
            zone: zone.to_string(),
            action,
            dry_run: self.dry_run,
            before,
            after,
        }
    }
}
