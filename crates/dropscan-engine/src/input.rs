//! Loading scan inputs from disk.

use std::path::Path;

use dropscan_core::{FileInput, Result, ScanError, DEFAULT_CONTENT_TYPE};

/// Read a file from disk into a [`FileInput`].
///
/// The declared content type defaults to `application/octet-stream`; use
/// [`FileInput::with_content_type`] when the uploader supplied one.
///
/// # Errors
///
/// Returns [`ScanError::FileRead`] if the file cannot be read.
pub async fn read_file(path: impl AsRef<Path>) -> Result<FileInput> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ScanError::file_read(path, e))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(FileInput::new(name, DEFAULT_CONTENT_TYPE, bytes))
}
