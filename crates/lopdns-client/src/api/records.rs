//! Record endpoints.
//!
//! Records have no ids: updates and deletes name the record by its current
//! name, type and content.

use crate::LopDnsClient;
use lopdns_core::{NewRecord, Record, RecordKey, RecordUpdate, Result};
use tracing::debug;

/// Record endpoints
pub struct RecordsApi<'a> {
    client: &'a LopDnsClient,
}

impl<'a> RecordsApi<'a> {
    pub(crate) const fn new(client: &'a LopDnsClient) -> Self {
        Self { client }
    }

    /// List every record in `zone`
    pub async fn list(&self, zone: &str) -> Result<Vec<Record>> {
        let records: Vec<Record> = self
            .client
            .get_array(&records_path(zone), "records")
            .await?;
        debug!(zone, count = records.len(), "retrieved records");
        Ok(records)
    }

    /// Create a record and return it as stored by the server
    pub async fn create(&self, zone: &str, record: &NewRecord) -> Result<Record> {
        self.client.post(&records_path(zone), record).await
    }

    /// Update the record selected by `update`'s old values
    pub async fn update(&self, zone: &str, update: &RecordUpdate) -> Result<Record> {
        self.client.put(&records_path(zone), update).await
    }

    /// Delete the record matching `key`
    pub async fn delete(&self, zone: &str, key: &RecordKey) -> Result<()> {
        self.client.delete(&records_path(zone), key).await?;
        debug!(zone, name = %key.name, record_type = %key.record_type, "record deleted");
        Ok(())
    }
}

fn records_path(zone: &str) -> String {
    format!("/records/{zone}")
}
