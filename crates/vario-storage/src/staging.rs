//! Transient staging for inbound uploads.
//!
//! A staged artifact is written by exactly one writer (the request
//! pipeline) and later read by any number of concurrent fan-out tasks
//! without further mutation, so no locking is involved. The sink enforces
//! the configured byte ceiling while writing: the write that would cross
//! the cap fails before the overflowing chunk is persisted.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use vario_core::AppError;

/// Staging operation errors
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("capacity exceeded: {written} bytes written, limit {max}")]
    CapacityExceeded { written: u64, max: u64 },

    #[error("invalid staged name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StagingError> for AppError {
    fn from(err: StagingError) -> Self {
        match err {
            StagingError::CapacityExceeded { written, max } => {
                AppError::CapacityExceeded { written, max }
            }
            StagingError::InvalidName(name) => {
                AppError::Internal(format!("invalid staged name: {}", name))
            }
            StagingError::Io(e) => AppError::Internal(format!("staging IO error: {}", e)),
        }
    }
}

/// Transient storage for in-flight uploads.
#[derive(Clone)]
pub struct StagingStore {
    base_path: PathBuf,
}

impl StagingStore {
    /// Create the staging directory if it does not exist.
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, StagingError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await?;
        Ok(StagingStore { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Names are server-generated hex identifiers; reject anything that
    /// could escape the staging directory regardless.
    fn name_to_path(&self, name: &str) -> Result<PathBuf, StagingError> {
        if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(StagingError::InvalidName(name.to_string()));
        }
        Ok(self.base_path.join(name))
    }

    /// Open a sink for a new staged artifact, bounded at `max_bytes`.
    pub async fn begin(&self, name: &str, max_bytes: u64) -> Result<StagingSink, StagingError> {
        let path = self.name_to_path(name)?;
        let file = fs::File::create(&path).await?;
        Ok(StagingSink {
            file,
            path,
            written: 0,
            max_bytes,
        })
    }

    /// Read a staged artifact in full. Each fan-out task calls this for a
    /// fresh view of the frozen file.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, StagingError> {
        let path = self.name_to_path(name)?;
        Ok(fs::read(&path).await?)
    }

    /// Best-effort removal of a staged artifact. Failures are logged and
    /// never surfaced: deletion must not abort the response path, and
    /// deleting an already-absent artifact is not an error.
    pub async fn delete(&self, name: &str) {
        let path = match self.name_to_path(name) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "staged artifact delete skipped");
                return;
            }
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "staged artifact deleted");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to delete staged artifact"
                );
            }
        }
    }
}

/// Writable handle for one staged artifact.
///
/// Tracks cumulative bytes and refuses the write that would cross the
/// configured ceiling.
pub struct StagingSink {
    file: fs::File,
    path: PathBuf,
    written: u64,
    max_bytes: u64,
}

impl StagingSink {
    /// Append a chunk. Fails with `CapacityExceeded` when the cumulative
    /// byte count would exceed the ceiling; the chunk is not written.
    pub async fn write(&mut self, chunk: &[u8]) -> Result<(), StagingError> {
        let incoming = chunk.len() as u64;
        if self.written + incoming > self.max_bytes {
            return Err(StagingError::CapacityExceeded {
                written: self.written + incoming,
                max: self.max_bytes,
            });
        }

        self.file.write_all(chunk).await?;
        self.written += incoming;
        Ok(())
    }

    /// Flush and sync the staged file, returning the bytes written. After
    /// this the artifact is frozen and safe for concurrent readers.
    pub async fn finalize(mut self) -> Result<u64, StagingError> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        tracing::debug!(
            path = %self.path.display(),
            size_bytes = self.written,
            "staged artifact finalized"
        );
        Ok(self.written)
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }
}
