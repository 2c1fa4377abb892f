//! Behavioral analysis cache endpoints.

use crate::CatalogClient;
use dropscan_core::{BehavioralRecord, ContentHash, Result};

/// Row filter for the behavioral analysis table
const TABLE_PATH: &str = "/rest/v1/behavioral_analysis";

/// Behavioral analysis cache endpoints.
///
/// The table caches one sandbox verdict per content hash. Rows are written
/// once and read forever; there is no update path and no expiry.
pub struct BehavioralApi<'a> {
    client: &'a CatalogClient,
}

impl<'a> BehavioralApi<'a> {
    pub(crate) fn new(client: &'a CatalogClient) -> Self {
        Self { client }
    }

    /// Look up the cached verdict for a content hash.
    ///
    /// Returns `None` when the hash has never been analyzed.
    pub async fn find_by_hash(&self, hash: &ContentHash) -> Result<Option<BehavioralRecord>> {
        let filter = format!("eq.{hash}");
        let rows: Vec<BehavioralRecord> = self
            .client
            .get(
                TABLE_PATH,
                &[
                    ("file_hash", filter.as_str()),
                    ("select", "file_hash,is_malicious,analysis_details"),
                    ("limit", "1"),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Persist a fresh verdict for a content hash
    pub async fn insert(&self, record: &BehavioralRecord) -> Result<()> {
        self.client.insert(TABLE_PATH, record).await
    }
}
