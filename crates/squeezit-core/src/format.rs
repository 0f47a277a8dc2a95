//! Supported image formats
//!
//! The same fixed set is used for the source selector (which files a client
//! accepts) and the target selector (what the server encodes to).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Format token rejected by [`Format::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported format: {0}")]
pub struct UnsupportedFormat(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Jpeg,
    Png,
    Webp,
    Avif,
    Gif,
    Tiff,
    Bmp,
    Heic,
}

impl Format {
    /// Every supported format, in selector order.
    pub const ALL: [Format; 8] = [
        Format::Jpeg,
        Format::Png,
        Format::Webp,
        Format::Avif,
        Format::Gif,
        Format::Tiff,
        Format::Bmp,
        Format::Heic,
    ];

    /// Wire token, as sent in the `format` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Jpeg => "jpeg",
            Format::Png => "png",
            Format::Webp => "webp",
            Format::Avif => "avif",
            Format::Gif => "gif",
            Format::Tiff => "tiff",
            Format::Bmp => "bmp",
            Format::Heic => "heic",
        }
    }

    /// MIME type tagged onto data URIs.
    pub fn mime_type(self) -> &'static str {
        match self {
            Format::Jpeg => "image/jpeg",
            Format::Png => "image/png",
            Format::Webp => "image/webp",
            Format::Avif => "image/avif",
            Format::Gif => "image/gif",
            Format::Tiff => "image/tiff",
            Format::Bmp => "image/bmp",
            Format::Heic => "image/heic",
        }
    }

    /// Extension used for generated filenames.
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    /// Extensions accepted when this format is the selected source.
    pub fn accepted_extensions(self) -> &'static [&'static str] {
        match self {
            Format::Jpeg => &["jpeg", "jpg"],
            Format::Tiff => &["tiff", "tif"],
            Format::Png => &["png"],
            Format::Webp => &["webp"],
            Format::Avif => &["avif"],
            Format::Gif => &["gif"],
            Format::Bmp => &["bmp"],
            Format::Heic => &["heic"],
        }
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let normalized = mime.split(';').next().unwrap_or(mime).trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.mime_type() == normalized)
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        let ext = extension.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.accepted_extensions().contains(&ext.as_str()))
    }
}

impl FromStr for Format {
    type Err = UnsupportedFormat;

    /// Tokens are matched exactly; `JPEG` or `jpg` are not format tokens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
