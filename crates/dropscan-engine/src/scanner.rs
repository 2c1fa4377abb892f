//! High-level scan orchestration.

use dropscan_client::CatalogClient;
use dropscan_core::{
    DetectionSignals, FileInput, Result, ScanReport, StorageLocation, StoreHealth,
};
use futures_util::future;
use tracing::{debug, info};

use crate::behavioral::BehavioralAnalyzer;
use crate::content::{ContentStore, UploadRetry};
use crate::{hasher, heuristics, static_rules, verdict};

/// Runs the full verdict pipeline over files.
///
/// A scan hashes the content, gathers the heuristic, static and behavioral
/// signals, classifies them into a severity and records detections in the
/// malware registry. Scanning itself is infallible: remote stages degrade
/// to benign verdicts on failure, so a scan always yields a report.
#[derive(Clone)]
pub struct FileScanner {
    catalog: CatalogClient,
    behavioral: BehavioralAnalyzer,
    content: ContentStore,
}

impl FileScanner {
    #[must_use]
    pub fn new(catalog: CatalogClient) -> Self {
        Self {
            behavioral: BehavioralAnalyzer::new(catalog.clone()),
            content: ContentStore::new(catalog.clone()),
            catalog,
        }
    }

    /// Replace the default upload retry schedule
    #[must_use]
    pub fn with_upload_retry(mut self, retry: UploadRetry) -> Self {
        self.content = self.content.with_retry(retry);
        self
    }

    /// Scan a single file through all three analysis stages
    pub async fn scan(&self, input: &FileInput) -> ScanReport {
        let hash = hasher::content_digest(input.bytes());
        debug!(file = input.name(), hash = %hash, size = input.size(), "scanning file");

        let signals = DetectionSignals {
            heuristic_score: heuristics::score(input),
            static_suspicious: static_rules::is_suspicious(input),
            behavioral_malicious: self.behavioral.analyze_hashed(&hash, input).await,
        };

        let report = ScanReport {
            file_name: input.name().to_string(),
            severity: verdict::classify(&signals),
            hash,
            signals,
        };

        if report.is_detection() {
            verdict::record_detection(&self.catalog, &report.hash, input.name(), &report.signals)
                .await;
        }

        info!(
            file = report.file_name,
            hash = %report.hash,
            severity = %report.severity,
            detection = report.is_detection(),
            "scan complete"
        );
        report
    }

    /// Scan several files concurrently, preserving input order
    pub async fn scan_many(&self, inputs: &[FileInput]) -> Vec<ScanReport> {
        future::join_all(inputs.iter().map(|input| self.scan(input))).await
    }

    /// Store a file's content in the catalog bucket under its hash
    pub async fn store(&self, input: &FileInput) -> StorageLocation {
        let hash = hasher::content_digest(input.bytes());
        self.content.store(input, &hash).await
    }

    /// Probe the catalog store for reachability and credentials
    pub async fn health_check(&self) -> Result<StoreHealth> {
        self.catalog.health().check().await
    }
}
