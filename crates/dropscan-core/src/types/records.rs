use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AnalysisDetails, ContentHash, Severity};

/// Cached sandbox verdict, keyed by content hash.
///
/// Written once after the first sandbox submission for a given hash and
/// never updated; later scans of identical content read it back instead of
/// re-detonating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehavioralRecord {
    /// SHA-256 content hash (unique key)
    pub file_hash: ContentHash,

    /// Interpreted verdict at analysis time
    pub is_malicious: bool,

    /// Analysis details persisted for later inspection
    pub analysis_details: AnalysisDetails,
}

/// Known-malware registry row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// SHA-256 content hash (unique key)
    pub hash: ContentHash,

    /// File name the content was first seen under
    pub name: String,

    /// Severity tier at detection time
    pub severity: Severity,

    /// Which analysis methods fired, as human-readable text
    pub description: String,

    /// When the content was last scanned
    pub last_seen: DateTime<Utc>,
}

/// Object listing row from the content bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// Object name within the listed prefix
    pub name: String,

    /// Store-assigned object id
    #[serde(default)]
    pub id: Option<String>,

    /// Creation timestamp, as reported by the store
    #[serde(default)]
    pub created_at: Option<String>,

    /// Last update timestamp, as reported by the store
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Content-addressed location of a stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLocation {
    /// Object path within the bucket: `{hash}/{file_name}`
    pub path: String,
}

impl StorageLocation {
    /// Build the canonical location for a file
    #[must_use]
    pub fn new(hash: &ContentHash, file_name: &str) -> Self {
        Self {
            path: format!("{hash}/{file_name}"),
        }
    }
}

impl std::fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Result of the catalog store startup probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHealth {
    /// Rows visible in the scan results table
    pub scan_result_count: u64,
}
