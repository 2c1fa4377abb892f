//! Store health probe.

use crate::CatalogClient;
use dropscan_core::{Result, StoreHealth};

const SCAN_RESULTS_PATH: &str = "/rest/v1/scan_results";

/// Store health probe.
///
/// Counts the rows of the scan results table without fetching any. The
/// embedding application calls this once at startup to verify connectivity
/// and credentials before accepting files; nothing in this crate runs it
/// implicitly.
pub struct HealthApi<'a> {
    client: &'a CatalogClient,
}

impl<'a> HealthApi<'a> {
    pub(crate) fn new(client: &'a CatalogClient) -> Self {
        Self { client }
    }

    /// Verify the store is reachable and the access key works
    pub async fn check(&self) -> Result<StoreHealth> {
        let count = self
            .client
            .head_count(SCAN_RESULTS_PATH, &[("select", "*")])
            .await?;
        Ok(StoreHealth {
            scan_result_count: count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropscan_core::ScanError;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_check_parses_row_count() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/rest/v1/scan_results"))
            .and(header("prefer", "count=exact"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-range", "0-24/617"))
            .expect(1)
            .mount(&server)
            .await;

        let client = CatalogClient::new(server.uri(), "key");
        let health = client.health().check().await.unwrap();
        assert_eq!(health.scan_result_count, 617);
    }

    #[tokio::test]
    async fn test_check_handles_empty_table() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/rest/v1/scan_results"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-range", "*/0"))
            .mount(&server)
            .await;

        let client = CatalogClient::new(server.uri(), "key");
        let health = client.health().check().await.unwrap();
        assert_eq!(health.scan_result_count, 0);
    }

    #[tokio::test]
    async fn test_check_fails_on_bad_key() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/rest/v1/scan_results"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = CatalogClient::new(server.uri(), "bad-key");
        let err = client.health().check().await.unwrap_err();
        assert!(matches!(err, ScanError::Unauthorized));
    }
}
