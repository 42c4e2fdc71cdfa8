use crate::traits::{check_upload_preconditions, StorageError, StorageResult, Uploader};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem uploader implementation
///
/// Stores objects under a base directory and serves them from a base URL.
/// Intended for development and tests; the contract matches `S3Uploader`.
#[derive(Clone)]
pub struct LocalUploader {
    base_path: PathBuf,
    base_url: String,
}

impl LocalUploader {
    /// Create a new LocalUploader instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for stored objects
    /// * `base_url` - Base URL for serving objects (e.g., "http://localhost:3000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalUploader {
            base_path,
            base_url,
        })
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Uploader for LocalUploader {
    async fn upload(&self, path: &str, data: Bytes) -> StorageResult<String> {
        check_upload_preconditions(path, &data)?;

        let target = self.base_path.join(path);
        let size = data.len();

        self.ensure_parent_dir(&target).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&target).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", target.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", target.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", target.display(), e))
        })?;

        let url = self.generate_url(path);

        tracing::info!(
            path = %target.display(),
            key = %path,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_upload_round_trip() {
        let dir = tempdir().unwrap();
        let uploader =
            LocalUploader::new(dir.path(), "http://localhost:3000/media".to_string())
                .await
                .unwrap();

        let location = uploader
            .upload("abc_300x300.png", Bytes::from_static(b"variant bytes"))
            .await
            .unwrap();

        assert_eq!(location, "http://localhost:3000/media/abc_300x300.png");
        let stored = std::fs::read(dir.path().join("abc_300x300.png")).unwrap();
        assert_eq!(stored, b"variant bytes");
    }

    #[tokio::test]
    async fn test_upload_rejects_traversal() {
        let dir = tempdir().unwrap();
        let uploader =
            LocalUploader::new(dir.path(), "http://localhost:3000/media".to_string())
                .await
                .unwrap();

        let result = uploader
            .upload("../../etc/passwd", Bytes::from_static(b"x"))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));

        let result = uploader.upload("/etc/passwd", Bytes::from_static(b"x")).await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_payload() {
        let dir = tempdir().unwrap();
        let uploader =
            LocalUploader::new(dir.path(), "http://localhost:3000/media".to_string())
                .await
                .unwrap();

        let result = uploader.upload("a.png", Bytes::new()).await;
        assert!(matches!(result, Err(StorageError::EmptyPayload)));
    }

    #[tokio::test]
    async fn test_concurrent_uploads_do_not_interfere() {
        let dir = tempdir().unwrap();
        let uploader = std::sync::Arc::new(
            LocalUploader::new(dir.path(), "http://localhost:3000/media".to_string())
                .await
                .unwrap(),
        );

        let mut handles = Vec::new();
        for i in 0..4 {
            let uploader = uploader.clone();
            handles.push(tokio::spawn(async move {
                uploader
                    .upload(
                        &format!("file{}.png", i),
                        Bytes::from(format!("payload {}", i).into_bytes()),
                    )
                    .await
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 4);
    }
}
