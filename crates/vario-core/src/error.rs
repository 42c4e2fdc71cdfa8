//! Error types module
//!
//! The request-level error taxonomy for the service. Per-layer errors
//! (staging, transform, upload) are converted into `AppError` at the
//! pipeline boundary so the HTTP layer has a single place to map an error
//! to a status code, machine-readable code, and log level.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Caller-attributable failure detected before any body byte is read.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The streamed body crossed the configured byte ceiling mid-ingestion.
    #[error("Upload exceeds maximum size: {written} bytes written, limit {max}")]
    CapacityExceeded { written: u64, max: u64 },

    /// One or more fan-out targets failed; every target was still attempted.
    #[error("Variant processing failed for {failed} of {total} targets")]
    VariantsFailed { failed: usize, total: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Static metadata per variant: (http_status, error_code, log_level).
/// Client messages stay per-variant for dynamic content.
fn static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::Validation(_) => (400, "INVALID_INPUT", LogLevel::Debug),
        // Server-class: the declared length lied (or was absent) and the
        // stream had to be cut off, so the caller cannot fix it by the
        // time the response is sent.
        AppError::CapacityExceeded { .. } => (500, "CAPACITY_EXCEEDED", LogLevel::Warn),
        AppError::VariantsFailed { .. } => (500, "VARIANT_UPLOAD_FAILED", LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", LogLevel::Error),
    }
}

impl AppError {
    /// HTTP status code to return
    pub fn http_status_code(&self) -> u16 {
        static_metadata(self).0
    }

    /// Machine-readable error code (e.g., "INVALID_INPUT")
    pub fn error_code(&self) -> &'static str {
        static_metadata(self).1
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        static_metadata(self).2
    }

    /// Client-facing message (internal errors are not detailed to clients)
    pub fn client_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::CapacityExceeded { .. } => "Resource size exceeds limit".to_string(),
            AppError::VariantsFailed { .. } => "Resource processing failed".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}
