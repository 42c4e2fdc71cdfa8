#[cfg(feature = "storage-local")]
use crate::LocalUploader;
#[cfg(feature = "storage-s3")]
use crate::S3Uploader;
use crate::{StorageError, StorageResult, Uploader};
use std::sync::Arc;
use vario_core::{Config, StorageBackend};

/// Create an uploader backend based on configuration
pub async fn create_uploader(config: &Config) -> StorageResult<Arc<dyn Uploader>> {
    match config.storage.backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .storage
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.storage.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let access_key_id = config.storage.aws_access_key_id.clone().ok_or_else(|| {
                StorageError::ConfigError("AWS_ACCESS_KEY_ID not configured".to_string())
            })?;
            let secret_access_key =
                config.storage.aws_secret_access_key.clone().ok_or_else(|| {
                    StorageError::ConfigError("AWS_SECRET_ACCESS_KEY not configured".to_string())
                })?;
            let endpoint = config.storage.s3_endpoint.clone();

            let uploader =
                S3Uploader::new(bucket, region, endpoint, access_key_id, secret_access_key)?;
            Ok(Arc::new(uploader))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.storage.local_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.storage.local_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let uploader = LocalUploader::new(base_path, base_url).await?;
            Ok(Arc::new(uploader))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
