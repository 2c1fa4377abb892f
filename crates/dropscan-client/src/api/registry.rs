//! Known-malware registry endpoints.

use chrono::{DateTime, Utc};

use crate::CatalogClient;
use dropscan_core::{ContentHash, RegistryEntry, Result};

const TABLE_PATH: &str = "/rest/v1/malware_hashes";

/// Known-malware registry endpoints.
///
/// The table is keyed by content hash. First detection inserts a full
/// entry; repeat detections only refresh `last_seen`, leaving the original
/// severity and description intact.
pub struct RegistryApi<'a> {
    client: &'a CatalogClient,
}

impl<'a> RegistryApi<'a> {
    pub(crate) fn new(client: &'a CatalogClient) -> Self {
        Self { client }
    }

    /// Insert a new registry entry.
    ///
    /// A hash that is already registered surfaces as
    /// [`ScanError::UniqueViolation`](dropscan_core::ScanError::UniqueViolation);
    /// callers fall back to [`touch_last_seen`](Self::touch_last_seen).
    pub async fn insert(&self, entry: &RegistryEntry) -> Result<()> {
        self.client.insert(TABLE_PATH, entry).await
    }

    /// Refresh only the `last_seen` timestamp of an existing entry
    pub async fn touch_last_seen(&self, hash: &ContentHash, when: DateTime<Utc>) -> Result<()> {
        let filter = format!("eq.{hash}");
        self.client
            .patch(
                TABLE_PATH,
                &[("hash", filter.as_str())],
                &serde_json::json!({ "last_seen": when }),
            )
            .await
    }
}
