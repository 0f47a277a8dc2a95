//! Error types module
//!
//! All request-level failures are unified under `AppError`. Each variant
//! describes its own HTTP presentation through `ErrorMetadata`, so the API
//! layer only has to render it.

use crate::format::UnsupportedFormat;

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

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether the internal message is withheld from clients in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::UnsupportedFormat(_) => "UnsupportedFormat",
            AppError::BadRequest(_) => "BadRequest",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Full message for logs.
    pub fn detailed_message(&self) -> String {
        match self {
            AppError::InternalWithSource { message, source } => {
                format!("{}: {:#}", message, source)
            }
            other => other.to_string(),
        }
    }
}

impl From<UnsupportedFormat> for AppError {
    fn from(err: UnsupportedFormat) -> Self {
        AppError::UnsupportedFormat(err.0)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, bool, LogLevel) {
    match err {
        AppError::UnsupportedFormat(_) => (400, false, LogLevel::Debug),
        AppError::BadRequest(_) => (400, false, LogLevel::Debug),
        AppError::NotFound(_) => (404, false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, false, LogLevel::Debug),
        AppError::Internal(_) => (500, true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, true, LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn client_message(&self) -> String {
        match self {
            // The browser client matches on this exact string.
            AppError::UnsupportedFormat(_) => "Unsupported format".to_string(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }
}
