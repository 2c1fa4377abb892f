//! Content-addressed object storage with retry.

use std::time::Duration;

use dropscan_client::CatalogClient;
use dropscan_core::{ContentHash, FileInput, StorageLocation, DEFAULT_CONTENT_TYPE};
use tracing::{debug, error, warn};

/// Retry schedule for object uploads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadRetry {
    /// Total attempts, including the first; must be at least 1
    pub attempts: u32,

    /// Pause between consecutive attempts. There is no pause before the
    /// first attempt or after the last.
    pub delay: Duration,
}

impl UploadRetry {
    #[must_use]
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

impl Default for UploadRetry {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Stores scanned file content in the catalog bucket.
///
/// Objects are keyed `{hash}/{file_name}`, so identical content lands on
/// the same path and is stored once. Storage is best-effort: every failure
/// path logs and still returns the canonical location, since a missing
/// object must never block the scan that produced it.
#[derive(Clone)]
pub struct ContentStore {
    catalog: CatalogClient,
    retry: UploadRetry,
}

impl ContentStore {
    #[must_use]
    pub fn new(catalog: CatalogClient) -> Self {
        Self {
            catalog,
            retry: UploadRetry::default(),
        }
    }

    /// Replace the default retry schedule
    #[must_use]
    pub const fn with_retry(mut self, retry: UploadRetry) -> Self {
        self.retry = retry;
        self
    }

    /// Store a file's content under its hash.
    ///
    /// The upload is skipped when any object already exists under the hash
    /// prefix. Failed uploads are retried on the configured schedule; once
    /// attempts are exhausted the failure is logged and the location
    /// returned anyway.
    pub async fn store(&self, input: &FileInput, hash: &ContentHash) -> StorageLocation {
        let location = StorageLocation::new(hash, input.name());

        match self.catalog.storage().list(hash.as_str()).await {
            Ok(entries) if !entries.is_empty() => {
                debug!(path = %location, "content already stored");
                return location;
            }
            Ok(_) => {}
            Err(error) => {
                warn!(hash = %hash, error = %error, "storage listing failed, skipping upload");
                return location;
            }
        }

        let content_type = if input.content_type().is_empty() {
            DEFAULT_CONTENT_TYPE
        } else {
            input.content_type()
        };

        for attempt in 1..=self.retry.attempts {
            match self
                .catalog
                .storage()
                .upload(&location.path, input.bytes(), content_type)
                .await
            {
                Ok(()) => {
                    debug!(path = %location, attempt, "content stored");
                    return location;
                }
                Err(error) => {
                    warn!(path = %location, attempt, error = %error, "upload attempt failed");
                    if attempt < self.retry.attempts {
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
            }
        }

        error!(
            path = %location,
            attempts = self.retry.attempts,
            "content upload failed on all attempts"
        );
        location
    }
}
