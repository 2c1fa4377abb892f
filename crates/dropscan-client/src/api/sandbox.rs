//! Sandbox analysis endpoints.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::debug;

use crate::CatalogClient;
use dropscan_core::{ContentHash, FileInput, Result, SandboxReport, ScanError, DEFAULT_CONTENT_TYPE};

/// Function endpoint performing the sandbox detonation
const SANDBOX_PATH: &str = "/functions/v1/malware-check";

/// Sandbox analysis endpoints.
///
/// Submission is a multipart POST: a `file` part with the raw bytes and a
/// `hash` text part carrying the precomputed digest, so the service can key
/// its own records without re-hashing.
pub struct SandboxApi<'a> {
    client: &'a CatalogClient,
}

impl<'a> SandboxApi<'a> {
    pub(crate) fn new(client: &'a CatalogClient) -> Self {
        Self { client }
    }

    /// Submit a file for detonation and return the raw report.
    ///
    /// The report may describe a run that has not completed; interpreting
    /// it is the caller's concern.
    pub async fn detonate(&self, input: &FileInput, hash: &ContentHash) -> Result<SandboxReport> {
        debug!(file = %input.name(), hash = %hash, "submitting file for sandbox analysis");

        let content_type = if input.content_type().is_empty() {
            DEFAULT_CONTENT_TYPE
        } else {
            input.content_type()
        };
        let part = Part::bytes(input.bytes().to_vec())
            .file_name(input.name().to_string())
            .mime_str(content_type)
            .map_err(|e| ScanError::Sandbox(format!("invalid content type: {e}")))?;
        let form = Form::new()
            .part("file", part)
            .text("hash", hash.to_string());

        let url = self.client.build_url(SANDBOX_PATH, &[]);
        let response = self
            .client
            .send(self.client.request(Method::POST, &url).multipart(form))
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Sandbox(format!(
                "request failed with status {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScanError::Http(e.to_string()))?;
        serde_json::from_str(&body).map_err(ScanError::Json)
    }
}
