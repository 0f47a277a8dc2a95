//! Base64 data URI encoding and decoding
//!
//! Transcoded images travel back to the client as `data:<mime>;base64,<payload>`
//! strings instead of links to stored files.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

#[derive(Debug, thiserror::Error)]
pub enum DataUriError {
    #[error("Not a data URI")]
    MissingScheme,

    #[error("Data URI is not base64 encoded")]
    NotBase64,

    #[error("Invalid base64 payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),
}

/// A decoded data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl DataUri {
    /// Encode bytes as a base64 data URI tagged with `mime_type`.
    pub fn encode(mime_type: &str, data: &[u8]) -> String {
        format!("{SCHEME}{mime_type}{BASE64_MARKER}{}", STANDARD.encode(data))
    }

    pub fn parse(uri: &str) -> Result<Self, DataUriError> {
        let rest = uri.strip_prefix(SCHEME).ok_or(DataUriError::MissingScheme)?;
        let (mime_type, payload) = rest
            .split_once(BASE64_MARKER)
            .ok_or(DataUriError::NotBase64)?;
        let data = STANDARD.decode(payload.trim())?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data,
        })
    }
}
