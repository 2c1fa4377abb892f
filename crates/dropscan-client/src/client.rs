//! Main catalog store client implementation.

use crate::api::*;
use dropscan_core::{Result, ScanError};
use reqwest::header;
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default bucket holding scanned file content
const DEFAULT_BUCKET: &str = "scanned-files";

/// Postgres SQLSTATE for a unique constraint violation
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Client for the catalog store backing the scanning pipeline.
///
/// One client serves the relational tables, the content bucket, and the
/// sandbox function endpoint; all three live behind the same base URL and
/// access key. Cloning is cheap.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    api_key: String,
    base_url: String,
    bucket: String,
}

impl CatalogClient {
    /// Create a new client with default settings
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        CatalogClientBuilder::new(base_url, api_key).build()
    }

    /// Create a client from `DROPSCAN_STORE_URL` / `DROPSCAN_STORE_KEY`
    pub fn from_env() -> Result<Self> {
        Ok(crate::config::CatalogConfig::from_env()?.client())
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> CatalogClientBuilder {
        CatalogClientBuilder::new(base_url, api_key)
    }

    /// Access the behavioral analysis cache table
    #[must_use]
    pub fn behavioral(&self) -> BehavioralApi<'_> {
        BehavioralApi::new(self)
    }

    /// Access the known-malware registry table
    #[must_use]
    pub fn registry(&self) -> RegistryApi<'_> {
        RegistryApi::new(self)
    }

    /// Access the scanned-file content bucket
    #[must_use]
    pub fn storage(&self) -> StorageApi<'_> {
        StorageApi::new(self)
    }

    /// Access the sandbox analysis endpoint
    #[must_use]
    pub fn sandbox(&self) -> SandboxApi<'_> {
        SandboxApi::new(self)
    }

    /// Access the store health probe
    #[must_use]
    pub fn health(&self) -> HealthApi<'_> {
        HealthApi::new(self)
    }

    /// Base URL the client was configured with
    pub(crate) fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Bucket holding scanned file content
    pub(crate) fn bucket(&self) -> &str {
        &self.inner.bucket
    }

    /// Start a request with the store auth headers applied
    pub(crate) fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.inner
            .http
            .request(method, url)
            .header(header::ACCEPT, "application/json")
            .header("apikey", &self.inner.api_key)
            .bearer_auth(&self.inner.api_key)
    }

    /// Send a request, mapping transport failures
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        request
            .send()
            .await
            .map_err(|e| ScanError::Http(e.to_string()))
    }

    /// Perform a GET request returning JSON
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.build_url(path, params);
        debug!(url = %url, "GET request");

        let response = self.send(self.request(Method::GET, &url)).await?;
        self.handle_response(response).await
    }

    /// Perform a POST request with a JSON body, returning JSON
    pub(crate) async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path, &[]);
        debug!(url = %url, "POST request");

        let response = self.send(self.request(Method::POST, &url).json(body)).await?;
        self.handle_response(response).await
    }

    /// Insert a row, asking the store not to echo it back
    pub(crate) async fn insert<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.build_url(path, &[]);
        debug!(url = %url, "POST insert");

        let response = self
            .send(
                self.request(Method::POST, &url)
                    .header("Prefer", "return=minimal")
                    .json(body),
            )
            .await?;
        self.handle_empty_response(response).await
    }

    /// Update rows matching the filter params with a partial JSON body
    pub(crate) async fn patch<B: serde::Serialize>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        body: &B,
    ) -> Result<()> {
        let url = self.build_url(path, params);
        debug!(url = %url, "PATCH request");

        let response = self
            .send(
                self.request(Method::PATCH, &url)
                    .header("Prefer", "return=minimal")
                    .json(body),
            )
            .await?;
        self.handle_empty_response(response).await
    }

    /// HEAD a table with an exact-count preference, parsing the row count
    /// out of the `Content-Range` response header
    pub(crate) async fn head_count(&self, path: &str, params: &[(&str, &str)]) -> Result<u64> {
        let url = self.build_url(path, params);
        debug!(url = %url, "HEAD count request");

        let response = self
            .send(
                self.request(Method::HEAD, &url)
                    .header("Prefer", "count=exact"),
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            return self.handle_error(status.as_u16(), response).await;
        }

        response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(content_range_total)
            .ok_or_else(|| {
                ScanError::Http("missing or malformed Content-Range header".to_string())
            })
    }

    /// Build a URL with query parameters
    pub(crate) fn build_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}", self.inner.base_url, path);

        let mut separator = '?';
        for (key, value) in params {
            url.push(separator);
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            separator = '&';
        }

        url
    }

    /// Handle an API response that returns JSON
    pub(crate) async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| ScanError::Http(e.to_string()))?;
            serde_json::from_str(&body).map_err(ScanError::Json)
        } else {
            self.handle_error(status.as_u16(), response).await
        }
    }

    /// Handle an API response that returns no body
    pub(crate) async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            self.handle_error(status.as_u16(), response).await
        }
    }

    /// Convert an error response to a [`ScanError`].
    ///
    /// The store reports errors as JSON in two shapes: PostgREST bodies
    /// carry `code`/`message` (with `code` a Postgres SQLSTATE), storage
    /// bodies carry `statusCode`/`error`/`message`. A duplicate-key insert
    /// surfaces as SQLSTATE 23505 and gets its own variant because callers
    /// handle it as an expected condition.
    pub(crate) async fn handle_error<T>(
        &self,
        status: u16,
        response: reqwest::Response,
    ) -> Result<T> {
        let body = response.text().await.unwrap_or_default();

        let parsed = serde_json::from_str::<serde_json::Value>(&body).ok();
        let code = parsed
            .as_ref()
            .and_then(|v| v.get("code").or_else(|| v.get("statusCode")))
            .and_then(|c| {
                c.as_str()
                    .map(String::from)
                    .or_else(|| c.as_u64().map(|n| n.to_string()))
            });
        let message = parsed
            .as_ref()
            .and_then(|v| v.get("message").or_else(|| v.get("error")))
            .and_then(|m| m.as_str().map(String::from))
            .unwrap_or(body);

        if code.as_deref() == Some(PG_UNIQUE_VIOLATION) {
            return Err(ScanError::UniqueViolation(message));
        }

        match status {
            401 | 403 => {
                warn!("catalog store rejected the access key");
                Err(ScanError::Unauthorized)
            }
            _ => Err(ScanError::Store {
                code: code.unwrap_or_else(|| status.to_string()),
                message,
            }),
        }
    }
}

/// Parse the total row count out of a `Content-Range` value like
/// `0-24/25` or `*/25`
fn content_range_total(value: &str) -> Option<u64> {
    value.split('/').nth(1)?.parse().ok()
}

/// Builder for configuring a [`CatalogClient`]
pub struct CatalogClientBuilder {
    base_url: String,
    api_key: String,
    timeout: Duration,
    user_agent: String,
    bucket: String,
}

impl CatalogClientBuilder {
    /// Create a new builder for the given store URL and access key
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("dropscan/{}", env!("CARGO_PKG_VERSION")),
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set the bucket holding scanned file content
    #[must_use]
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Build the client
    #[must_use]
    pub fn build(self) -> CatalogClient {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .expect("Failed to build HTTP client");

        CatalogClient {
            inner: Arc::new(ClientInner {
                http,
                api_key: self.api_key,
                base_url: self.base_url.trim_end_matches('/').to_string(),
                bucket: self.bucket,
            }),
        }
    }
}

// URL encoding helper
mod urlencoding {
    pub fn encode(s: &str) -> String {
        url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
    }
}
