//! Squeezit Core Library
//!
//! Domain types shared by the server, the client and the CLI: the supported
//! format set, transcode result models, the data URI codec, error types and
//! configuration.

pub mod config;
pub mod data_uri;
pub mod error;
pub mod format;
pub mod install;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use data_uri::{DataUri, DataUriError};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use format::{Format, UnsupportedFormat};
pub use install::InstallPlatform;
pub use models::{
    size_in_kb, CompressResponse, CompressedFile, FileOutcome, TranscodeFailure, TranscodeResult,
    UploadedImage,
};
