//! Vario core library
//!
//! Shared foundation for the vario variant-upload service: startup
//! configuration, the unified error type with HTTP metadata, and
//! staged-artifact naming.

pub mod config;
pub mod error;
pub mod naming;

// Re-export commonly used types
pub use config::{extension_for, human_bytes, Config, StorageBackend, StorageConfig};
pub use error::{AppError, LogLevel};
pub use naming::StagedArtifact;
