//! Squeezit Processing Library
//!
//! Image transcoding behind the `Transcoder` seam, the fixed quality table,
//! and validation of files against the selected source format.

pub mod quality;
pub mod transcoder;
pub mod validator;

#[cfg(feature = "codecs")]
pub mod codec;

pub use quality::EncodeQuality;
pub use transcoder::{TranscodeError, Transcoder};
pub use validator::{SourceValidator, ValidationError};

#[cfg(feature = "codecs")]
pub use codec::{sniff_format, ImageTranscoder};
