//! Uploader abstraction trait
//!
//! This module defines the `Uploader` trait that all remote store
//! backends must implement, and the error type shared by them.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
///
/// Precondition violations (`InvalidPath`, `EmptyPayload`) are caller
/// bugs and are logged as such; the remaining variants describe faults of
/// the store itself. The orchestrator treats all of them as an upload
/// failure for the affected target.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid destination path: {0}")]
    InvalidPath(String),

    #[error("Empty payload")]
    EmptyPayload,

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// True when the failure is a violated precondition rather than a
    /// fault of the remote store. Kept distinct in logs for diagnosis.
    pub fn is_precondition(&self) -> bool {
        matches!(self, StorageError::InvalidPath(_) | StorageError::EmptyPayload)
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Remote uploader capability
///
/// Backends store a byte payload under a destination path and return the
/// publicly reachable location of the stored object. Implementations must
/// be stateless and safely invokable from concurrent tasks.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload `data` under `path` and return the resulting location URL.
    ///
    /// Fails fast with `InvalidPath`/`EmptyPayload` on violated
    /// preconditions, and with `UploadFailed`/`BackendError` on store
    /// faults.
    async fn upload(&self, path: &str, data: Bytes) -> StorageResult<String>;
}

/// Shared precondition checks for all backends.
pub(crate) fn check_upload_preconditions(path: &str, data: &Bytes) -> StorageResult<()> {
    if path.is_empty() {
        tracing::error!("upload precondition violated: empty destination path");
        return Err(StorageError::InvalidPath("empty path".to_string()));
    }
    if path.contains("..") || path.starts_with('/') {
        tracing::error!(path = %path, "upload precondition violated: unsafe destination path");
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    if data.is_empty() {
        tracing::error!(path = %path, "upload precondition violated: empty payload");
        return Err(StorageError::EmptyPayload);
    }
    Ok(())
}
