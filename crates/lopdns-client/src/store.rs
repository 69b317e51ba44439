//! The record operations mutating code depends on.

use crate::LopDnsClient;
use async_trait::async_trait;
use lopdns_core::{NewRecord, Record, RecordKey, RecordUpdate, Result};

/// Record CRUD against some backend; [`LopDnsClient`] is the real one
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List every record in `zone`
    async fn list_records(&self, zone: &str) -> Result<Vec<Record>>;

    /// Create a record, returning the stored state
    async fn create_record(&self, zone: &str, record: &NewRecord) -> Result<Record>;

    /// Update the record selected by the old values in `update`
    async fn update_record(&self, zone: &str, update: &RecordUpdate) -> Result<Record>;

    /// Delete the record matching `key`
    async fn delete_record(&self, zone: &str, key: &RecordKey) -> Result<()>;
}

#[async_trait]
impl RecordStore for LopDnsClient {
    async fn list_records(&self, zone: &str) -> Result<Vec<Record>> {
        self.records().list(zone).await
    }

    async fn create_record(&self, zone: &str, record: &NewRecord) -> Result<Record> {
        self.records().create(zone, record).await
    }

    async fn update_record(&self, zone: &str, update: &RecordUpdate) -> Result<Record> {
        self.records().update(zone, update).await
    }

    async fn delete_record(&self, zone: &str, key: &RecordKey) -> Result<()> {
        self.records().delete(zone, key).await
    }
}
