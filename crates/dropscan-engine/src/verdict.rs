//! Severity classification and detection recording.
//!
//! Signals from the three analysis stages are folded into a single
//! [`Severity`], and detections are written to the malware registry with
//! a human-readable description of which stages fired.

use chrono::Utc;
use dropscan_client::CatalogClient;
use dropscan_core::{ContentHash, DetectionSignals, RegistryEntry, Severity};
use tracing::{debug, warn};

/// Heuristic score at or above which a file is critical on its own
pub const CRITICAL_SCORE: u32 = 8;

/// Heuristic score at or above which a file is high severity
pub const HIGH_SCORE: u32 = 6;

/// Heuristic score at or above which a file is medium severity
pub const MEDIUM_SCORE: u32 = 4;

/// Fold the stage signals into a severity.
///
/// Agreement between the static and behavioral stages outranks any
/// heuristic score; either stage alone is high severity. The heuristic
/// score fills in the remaining rungs.
#[must_use]
pub const fn classify(signals: &DetectionSignals) -> Severity {
    if signals.heuristic_score >= CRITICAL_SCORE
        || (signals.static_suspicious && signals.behavioral_malicious)
    {
        Severity::Critical
    } else if signals.heuristic_score >= HIGH_SCORE
        || signals.static_suspicious
        || signals.behavioral_malicious
    {
        Severity::High
    } else if signals.heuristic_score >= MEDIUM_SCORE {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Human-readable summary of which stages flagged the file
#[must_use]
pub fn detection_description(signals: &DetectionSignals) -> String {
    let mut lines = vec![
        "Detected as malicious through multiple analysis methods:".to_string(),
        format!("- Heuristic Score: {}/10", signals.heuristic_score),
    ];
    if signals.static_suspicious {
        lines.push("- Static Analysis: Suspicious patterns detected".to_string());
    }
    if signals.behavioral_malicious {
        lines.push("- Behavioral Analysis: Malicious behavior detected".to_string());
    }
    lines.join("\n")
}

/// Write a detection to the malware registry.
///
/// A hash that is already cataloged only gets its `last_seen` timestamp
/// refreshed; the stored severity and description are left as first
/// recorded. Persistence failures are logged and swallowed so a store
/// outage never fails a scan.
pub async fn record_detection(
    catalog: &CatalogClient,
    hash: &ContentHash,
    file_name: &str,
    signals: &DetectionSignals,
) {
    let entry = RegistryEntry {
        hash: hash.clone(),
        name: file_name.to_string(),
        severity: classify(signals),
        description: detection_description(signals),
        last_seen: Utc::now(),
    };

    match catalog.registry().insert(&entry).await {
        Ok(()) => {
            debug!(hash = %hash, severity = %entry.severity, "detection recorded");
        }
        Err(error) if error.is_unique_violation() => {
            debug!(hash = %hash, "hash already cataloged, refreshing last_seen");
            if let Err(error) = catalog.registry().touch_last_seen(hash, Utc::now()).await {
                warn!(hash = %hash, error = %error, "failed to refresh last_seen");
            }
        }
        Err(error) => {
            warn!(hash = %hash, error = %error, "failed to record detection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const REGISTRY_PATH: &str = "/rest/v1/malware_hashes";

    fn signals(score: u32, static_suspicious: bool, behavioral: bool) -> DetectionSignals {
        DetectionSignals {
            heuristic_score: score,
            static_suspicious,
            behavioral_malicious: behavioral,
        }
    }

    #[test]
    fn test_high_score_alone_is_critical() {
        assert_eq!(classify(&signals(8, false, false)), Severity::Critical);
    }

    #[test]
    fn test_stage_agreement_is_critical() {
        assert_eq!(classify(&signals(0, true, true)), Severity::Critical);
    }

    #[test]
    fn test_single_stage_is_high() {
        assert_eq!(classify(&signals(0, true, false)), Severity::High);
        assert_eq!(classify(&signals(0, false, true)), Severity::High);
        assert_eq!(classify(&signals(6, false, false)), Severity::High);
    }

    #[test]
    fn test_mid_score_is_medium() {
        assert_eq!(classify(&signals(4, false, false)), Severity::Medium);
        assert_eq!(classify(&signals(5, false, false)), Severity::Medium);
    }

    #[test]
    fn test_quiet_signals_are_low() {
        assert_eq!(classify(&signals(0, false, false)), Severity::Low);
        assert_eq!(classify(&signals(3, false, false)), Severity::Low);
    }

    #[test]
    fn test_description_lists_firing_stages() {
        let text = detection_description(&signals(7, true, true));
        assert_eq!(
            text,
            "Detected as malicious through multiple analysis methods:\n\
             - Heuristic Score: 7/10\n\
             - Static Analysis: Suspicious patterns detected\n\
             - Behavioral Analysis: Malicious behavior detected"
        );
    }

    #[test]
    fn test_description_omits_quiet_stages() {
        let text = detection_description(&signals(4, false, false));
        assert_eq!(
            text,
            "Detected as malicious through multiple analysis methods:\n- Heuristic Score: 4/10"
        );
        assert!(!text.contains("Static Analysis"));
        assert!(!text.contains("Behavioral Analysis"));
    }

    #[tokio::test]
    async fn test_record_detection_inserts_entry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(REGISTRY_PATH))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path(REGISTRY_PATH))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let catalog = CatalogClient::new(server.uri(), "key");
        record_detection(&catalog, &ContentHash::new("ab12"), "evil.bat", &signals(8, true, true))
            .await;
    }

    /// Matches a PATCH body that carries `last_seen` and nothing else.
    struct LastSeenOnly;

    impl wiremock::Match for LastSeenOnly {
        fn matches(&self, request: &wiremock::Request) -> bool {
            serde_json::from_slice::<serde_json::Value>(&request.body)
                .ok()
                .and_then(|v| v.as_object().cloned())
                .is_some_and(|obj| obj.len() == 1 && obj.contains_key("last_seen"))
        }
    }

    #[tokio::test]
    async fn test_repeat_detection_only_refreshes_last_seen() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(REGISTRY_PATH))
            .respond_with(ResponseTemplate::new(201))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(REGISTRY_PATH))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "code": "23505",
                "message": "duplicate key value violates unique constraint"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path(REGISTRY_PATH))
            .and(query_param("hash", "eq.ab12"))
            .and(LastSeenOnly)
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = CatalogClient::new(server.uri(), "key");
        let hash = ContentHash::new("ab12");
        record_detection(&catalog, &hash, "evil.bat", &signals(8, true, true)).await;
        // Weaker signals on a later sighting must not rewrite the entry.
        record_detection(&catalog, &hash, "evil.bat", &signals(4, false, false)).await;
    }

    #[tokio::test]
    async fn test_store_outage_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(REGISTRY_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "code": "PGRST000",
                "message": "could not connect"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path(REGISTRY_PATH))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let catalog = CatalogClient::new(server.uri(), "key");
        record_detection(&catalog, &ContentHash::new("ab12"), "evil.bat", &signals(8, true, true))
            .await;
    }
}
