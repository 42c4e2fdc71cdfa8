//! Vario API Library
//!
//! This crate provides the HTTP surface of the service: the upload
//! pipeline handler, response middleware, and application setup.

// Module declarations
mod handlers;
mod middleware;

// Public modules
pub mod error;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::ErrorResponse;
pub use state::AppState;
