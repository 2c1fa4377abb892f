use serde::{Deserialize, Serialize};

use crate::types::ContentHash;

/// Severity tier assigned to a detected file
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Weak heuristic signal only
    Low,
    /// Moderate heuristic score
    Medium,
    /// Strong heuristic score or a single confirmed analysis method
    High,
    /// Very strong heuristic score or multiple confirmed analysis methods
    Critical,
}

impl Severity {
    /// Lowercase name as stored in the malware registry
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three independent detection signals produced by a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionSignals {
    /// Additive heuristic score (unbounded, 0 = clean)
    pub heuristic_score: u32,

    /// Static pattern matcher flagged the file
    pub static_suspicious: bool,

    /// Sandbox analysis reported malicious behavior
    pub behavioral_malicious: bool,
}

/// Completed scan of a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// File name as declared by the uploader
    pub file_name: String,

    /// SHA-256 content hash
    pub hash: ContentHash,

    /// Raw detection signals
    pub signals: DetectionSignals,

    /// Severity derived from the signals
    pub severity: Severity,
}

impl ScanReport {
    /// Returns true if the scan fired a detection worth recording.
    ///
    /// Any confirmed analysis method yields at least [`Severity::High`],
    /// so severity alone decides.
    #[must_use]
    pub fn is_detection(&self) -> bool {
        self.severity >= Severity::Medium
    }
}
