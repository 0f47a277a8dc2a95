use squeezit_core::Format;

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("Empty file")]
    EmptyInput,

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode {format}: {message}")]
    Encode { format: Format, message: String },

    #[error("No encoder available for {0}")]
    UnsupportedEncoder(Format),
}

/// Decode a buffer and re-encode it to `target` at that format's fixed quality.
///
/// Implementations are CPU bound and synchronous; async callers are expected
/// to run them on the blocking pool.
pub trait Transcoder: Send + Sync {
    fn transcode(&self, input: &[u8], target: Format) -> Result<Vec<u8>, TranscodeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TranscodeError::UnsupportedEncoder(Format::Heic).to_string(),
            "No encoder available for heic"
        );
        let err = TranscodeError::Encode {
            format: Format::Avif,
            message: "too small".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to encode avif: too small");
    }
}
