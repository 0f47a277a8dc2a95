//! Squeezit Services Layer
//!
//! Orchestration between the HTTP surface and the processing crate: batch
//! transcoding with per-file failure isolation, and packaging of results into
//! a downloadable archive.

pub mod transcode;

#[cfg(feature = "archive")]
pub mod archive;

#[cfg(feature = "archive")]
pub use archive::{create_zip_archive, ARCHIVE_FOLDER, ARCHIVE_NAME};
pub use transcode::TranscodeService;

#[cfg(feature = "codecs")]
pub use squeezit_processing::ImageTranscoder;
pub use squeezit_processing::{
    EncodeQuality, SourceValidator, TranscodeError, Transcoder, ValidationError,
};
