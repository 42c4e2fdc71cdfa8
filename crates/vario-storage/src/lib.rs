//! Vario storage library
//!
//! Remote uploader capability and transient staging for the vario
//! service. The `Uploader` trait is the seam the request pipeline depends
//! on; S3 and local-filesystem implementations are feature-gated the same
//! way so either can back a deployment without touching pipeline logic.
//!
//! # Destination paths
//!
//! Uploaders receive fully formed destination paths
//! (`{artifact_id}_{r}x{r}.{ext}`). Paths must not contain `..` or a
//! leading `/`; both backends reject them before touching the store.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod staging;
pub mod traits;

// Re-export commonly used types
pub use factory::create_uploader;
#[cfg(feature = "storage-local")]
pub use local::LocalUploader;
#[cfg(feature = "storage-s3")]
pub use s3::S3Uploader;
pub use staging::{StagingError, StagingSink, StagingStore};
pub use traits::{StorageError, StorageResult, Uploader};
pub use vario_core::StorageBackend;
