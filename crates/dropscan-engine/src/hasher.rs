//! Streaming SHA-256 hashing via `ring::digest`.

use ring::digest::{Context, SHA256};
use std::path::Path;
use tokio::io::AsyncReadExt;

use dropscan_core::{ContentHash, Result, ScanError};

/// Buffer size for streaming file reads (64 KiB).
const BUF_SIZE: usize = 64 * 1024;

/// Compute the SHA-256 content hash of in-memory bytes.
///
/// Returns the lowercase hex digest that identifies the content across the
/// behavioral cache, the malware registry, and the content bucket.
#[must_use]
pub fn content_digest(bytes: &[u8]) -> ContentHash {
    let digest = ring::digest::digest(&SHA256, bytes);
    ContentHash::new(hex::encode(digest.as_ref()))
}

/// Compute the SHA-256 content hash of a file on disk, streaming to avoid
/// loading it all into memory.
///
/// # Errors
///
/// Returns [`ScanError::FileRead`] if the file cannot be opened or read.
pub async fn digest_file(path: impl AsRef<Path>) -> Result<ContentHash> {
    let path = path.as_ref();
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| ScanError::file_read(path, e))?;

    let mut context = Context::new(&SHA256);
    let mut buf = vec![0u8; BUF_SIZE];

    loop {
        let n = file
            .read(&mut buf)
            .await
            .map_err(|e| ScanError::file_read(path, e))?;
        if n == 0 {
            break;
        }
        context.update(&buf[..n]);
    }

    Ok(ContentHash::new(hex::encode(context.finish().as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_content_digest() {
        let hash = content_digest(b"hello world");
        assert_eq!(
            hash.as_str(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_content_digest_empty() {
        let hash = content_digest(b"");
        assert_eq!(
            hash.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[tokio::test]
    async fn test_digest_file_matches_bytes() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "hello world").unwrap();
        tmp.flush().unwrap();

        let hash = digest_file(tmp.path()).await.unwrap();
        assert_eq!(hash, content_digest(b"hello world"));
    }

    #[tokio::test]
    async fn test_digest_file_missing_is_file_read_error() {
        let err = digest_file("/nonexistent/sample.bin").await.unwrap_err();
        assert!(matches!(err, ScanError::FileRead { .. }));
        assert!(err.to_string().contains("/nonexistent/sample.bin"));
    }
}
