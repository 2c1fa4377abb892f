use serde::{Deserialize, Serialize};

/// Lowercase hex SHA-256 digest of file content.
///
/// The hash is the identity of a file throughout the pipeline: it keys the
/// behavioral cache and the malware registry, and prefixes the storage path
/// of uploaded content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Wrap an already-computed lowercase hex digest
    #[must_use]
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Hex digest as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ContentHash {
    fn from(hex: String) -> Self {
        Self(hex)
    }
}

impl From<&str> for ContentHash {
    fn from(hex: &str) -> Self {
        Self(hex.to_string())
    }
}
