//! Content bucket endpoints.

use reqwest::header;
use reqwest::Method;
use url::Url;

use crate::CatalogClient;
use dropscan_core::{ObjectEntry, Result, ScanError};

/// Listing page size; one content prefix never holds more than a handful
/// of objects
const LIST_LIMIT: u32 = 100;

/// Cache lifetime the store attaches to uploaded objects
const OBJECT_CACHE_CONTROL: &str = "max-age=3600";

/// Content bucket endpoints.
///
/// Objects are content-addressed under `{hash}/{file_name}`, so listing a
/// hash prefix answers "is this content already stored". Uploads never
/// overwrite: the hash makes identical content land on the same path.
pub struct StorageApi<'a> {
    client: &'a CatalogClient,
}

impl<'a> StorageApi<'a> {
    pub(crate) fn new(client: &'a CatalogClient) -> Self {
        Self { client }
    }

    /// List objects under a prefix in the scanned-files bucket
    pub async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>> {
        let path = format!("/storage/v1/object/list/{}", self.client.bucket());
        self.client
            .post(
                &path,
                &serde_json::json!({ "prefix": prefix, "limit": LIST_LIMIT }),
            )
            .await
    }

    /// Upload raw bytes to an object path within the bucket.
    ///
    /// The path is `{hash}/{file_name}`; segments are percent-encoded on
    /// the wire. Uploads never upsert, so a path that already exists is an
    /// error and the caller is expected to have checked with
    /// [`list`](Self::list) first.
    pub async fn upload(&self, object_path: &str, bytes: &[u8], content_type: &str) -> Result<()> {
        let url = self.object_url(object_path)?;

        let response = self
            .client
            .send(
                self.client
                    .request(Method::POST, url.as_str())
                    .header(header::CONTENT_TYPE, content_type)
                    .header(header::CACHE_CONTROL, OBJECT_CACHE_CONTROL)
                    .header("x-upsert", "false")
                    .body(bytes.to_vec()),
            )
            .await?;

        self.client.handle_empty_response(response).await
    }

    /// Build the full object URL, percent-encoding each path segment
    fn object_url(&self, object_path: &str) -> Result<Url> {
        let mut url = Url::parse(self.client.base_url())
            .map_err(|e| ScanError::InvalidUrl(e.to_string()))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ScanError::InvalidUrl("base URL cannot be a base".to_string()))?;
            segments.extend(["storage", "v1", "object", self.client.bucket()]);
            segments.extend(object_path.split('/'));
        }

        Ok(url)
    }
}
