use serde::{Deserialize, Serialize};

/// Content type assumed when the uploader declared none
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// An uploaded file awaiting a verdict.
///
/// Carries the declared name and MIME type alongside the raw bytes. The
/// name and declared type come from the uploader and are untrusted input;
/// only the bytes themselves are authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInput {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl FileInput {
    /// Create a file input from a name, declared MIME type, and raw bytes
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Replace the declared MIME type
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// File name as declared by the uploader
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// MIME type as declared by the uploader
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Raw file bytes
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// File size in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Lowercase extension: the substring after the last `.` in the name.
    ///
    /// Empty when the name contains no dot.
    #[must_use]
    pub fn extension(&self) -> String {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default()
    }

    /// File content decoded as UTF-8 text, lossily
    #[must_use]
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}
