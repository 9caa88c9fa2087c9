//! Reading the resume from disk.

use std::path::Path;

use async_trait::async_trait;
use resumerefresh_core::RefreshError;
use tracing::debug;

/// Reads whole files.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Returns every byte of the file at `path`.
    async fn read_all(&self, path: &Path) -> Result<Vec<u8>, RefreshError>;
}

/// Reads from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl LocalFiles {
    /// Creates a new local file source.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSource for LocalFiles {
    async fn read_all(&self, path: &Path) -> Result<Vec<u8>, RefreshError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            RefreshError::config(format!("cannot read resume file {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "Read file");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_configuration_error() {
        let err = LocalFiles::new()
            .read_all(Path::new("/definitely/not/here/resume.pdf"))
            .await
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("resume.pdf"));
    }

    #[tokio::test]
    async fn test_reads_bytes() {
        let path = std::env::temp_dir().join(format!("resumerefresh-files-{}.pdf", std::process::id()));
        tokio::fs::write(&path, b"%PDF-1.7").await.unwrap();

        let bytes = LocalFiles::new().read_all(&path).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.7");

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
