//! Zone endpoints.

use crate::LopDnsClient;
use lopdns_core::Result;
use tracing::debug;

/// Zone endpoints
pub struct ZonesApi<'a> {
    client: &'a LopDnsClient,
}

impl<'a> ZonesApi<'a> {
    pub(crate) const fn new(client: &'a LopDnsClient) -> Self {
        Self { client }
    }

    /// List the names of the zones the client id manages.
    ///
    /// The API answers with a bare array of names; any other shape is an
    /// error.
    pub async fn list(&self) -> Result<Vec<String>> {
        let zones: Vec<String> = self.client.get_array("/zones", "zone names").await?;
        debug!(count = zones.len(), "retrieved zones");
        Ok(zones)
    }

    /// Returns true if `zone` is among the managed zones
    pub async fn contains(&self, zone: &str) -> Result<bool> {
        Ok(self.list().await?.iter().any(|z| z == zone))
    }
}
