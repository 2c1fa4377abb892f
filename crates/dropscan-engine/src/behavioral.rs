//! Behavioral analysis with verdict caching.

use dropscan_client::CatalogClient;
use dropscan_core::{BehavioralRecord, ContentHash, FileInput, SandboxVerdict};
use tracing::{debug, warn};

use crate::{hasher, policy};

/// Resolves the behavioral verdict for a file.
///
/// Verdicts are cached by content hash in the catalog store, so a file
/// whose hash has been analyzed before is never detonated again. Fresh
/// verdicts are persisted best-effort, and every remote failure falls
/// back to the benign verdict from [`policy`] so the rest of the
/// pipeline keeps running.
#[derive(Clone)]
pub struct BehavioralAnalyzer {
    catalog: CatalogClient,
}

impl BehavioralAnalyzer {
    #[must_use]
    pub fn new(catalog: CatalogClient) -> Self {
        Self { catalog }
    }

    /// Behavioral verdict for a file, hashing its content first
    pub async fn analyze(&self, input: &FileInput) -> bool {
        let hash = hasher::content_digest(input.bytes());
        self.analyze_hashed(&hash, input).await
    }

    /// Behavioral verdict for a file whose hash is already known.
    ///
    /// The hash must be the digest of `input`'s content; passing an
    /// unrelated hash would poison the cache for that hash.
    pub async fn analyze_hashed(&self, hash: &ContentHash, input: &FileInput) -> bool {
        match self.catalog.behavioral().find_by_hash(hash).await {
            Ok(Some(record)) => {
                debug!(
                    hash = %hash,
                    malicious = record.is_malicious,
                    "behavioral verdict served from cache"
                );
                return record.is_malicious;
            }
            Ok(None) => {}
            Err(error) => {
                warn!(hash = %hash, error = %error, "behavioral cache lookup failed");
                return policy::fallback_verdict();
            }
        }

        let verdict = match self.catalog.sandbox().detonate(input, hash).await {
            Ok(report) => SandboxVerdict::from_report(&report),
            Err(error) => {
                warn!(hash = %hash, error = %error, "sandbox detonation failed");
                SandboxVerdict::failure(&error.to_string())
            }
        };

        let record = BehavioralRecord {
            file_hash: hash.clone(),
            is_malicious: verdict.malicious,
            analysis_details: verdict.details.clone(),
        };
        if let Err(error) = self.catalog.behavioral().insert(&record).await {
            warn!(hash = %hash, error = %error, "failed to persist behavioral verdict");
        }

        verdict.malicious
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CACHE_PATH: &str = "/rest/v1/behavioral_analysis";
    const SANDBOX_PATH: &str = "/functions/v1/malware-check";

    fn sample() -> FileInput {
        FileInput::new("evil.bat", "text/x-bat", b"goto :loop".to_vec())
    }

    fn analyzer(server: &MockServer) -> BehavioralAnalyzer {
        BehavioralAnalyzer::new(CatalogClient::new(server.uri(), "key"))
    }

    fn malicious_report() -> serde_json::Value {
        serde_json::json!({
            "hybridAnalysis": {
                "state": "SUCCESS",
                "verdict": "malicious",
                "threat_score": 92
            }
        })
    }

    #[tokio::test]
    async fn test_cached_verdict_skips_sandbox() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CACHE_PATH))
            .and(query_param("file_hash", "eq.ab12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "file_hash": "ab12",
                "is_malicious": true,
                "analysis_details": { "verdict": "malicious", "threatScore": 92 }
            }])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SANDBOX_PATH))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(CACHE_PATH))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let malicious = analyzer(&server)
            .analyze_hashed(&ContentHash::new("ab12"), &sample())
            .await;
        assert!(malicious);
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_benign() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CACHE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("unavailable"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SANDBOX_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(malicious_report()))
            .expect(0)
            .mount(&server)
            .await;

        let malicious = analyzer(&server)
            .analyze_hashed(&ContentHash::new("ab12"), &sample())
            .await;
        assert!(!malicious);
    }

    #[tokio::test]
    async fn test_cache_miss_detonates_and_persists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CACHE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SANDBOX_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(malicious_report()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(CACHE_PATH))
            .and(body_partial_json(serde_json::json!({
                "file_hash": "ab12",
                "is_malicious": true,
                "analysis_details": { "verdict": "malicious", "threatScore": 92 }
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let malicious = analyzer(&server)
            .analyze_hashed(&ContentHash::new("ab12"), &sample())
            .await;
        assert!(malicious);
    }

    #[tokio::test]
    async fn test_detonation_failure_persists_error_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CACHE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SANDBOX_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(CACHE_PATH))
            .and(body_partial_json(serde_json::json!({
                "is_malicious": false,
                "analysis_details": { "verdict": "error" }
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let malicious = analyzer(&server)
            .analyze_hashed(&ContentHash::new("ab12"), &sample())
            .await;
        assert!(!malicious);
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_verdict() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CACHE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SANDBOX_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(malicious_report()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(CACHE_PATH))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let malicious = analyzer(&server)
            .analyze_hashed(&ContentHash::new("ab12"), &sample())
            .await;
        assert!(malicious);
    }

    #[tokio::test]
    async fn test_analyze_hashes_content() {
        // SHA-256 of "hello world".
        const HASH: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CACHE_PATH))
            .and(query_param("file_hash", format!("eq.{HASH}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "file_hash": HASH,
                "is_malicious": true,
                "analysis_details": {}
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let input = FileInput::new("hello.txt", "text/plain", b"hello world".to_vec());
        assert!(analyzer(&server).analyze(&input).await);
    }
}
