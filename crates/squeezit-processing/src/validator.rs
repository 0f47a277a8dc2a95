use std::path::Path;

use squeezit_core::Format;

/// Reasons a file is refused for the selected source format
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: &'static [&'static str],
    },

    #[error("Invalid content type: {content_type} (expected: {expected})")]
    InvalidContentType {
        content_type: String,
        expected: &'static str,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,
}

/// Accepts only files of one source format.
///
/// Both the extension and the declared MIME type have to agree with the
/// source format, so a renamed file is refused as well.
#[derive(Debug, Clone, Copy)]
pub struct SourceValidator {
    source: Format,
}

impl SourceValidator {
    pub fn new(source: Format) -> Self {
        Self { source }
    }

    pub fn source(&self) -> Format {
        self.source
    }

    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        let allowed = self.source.accepted_extensions();
        if !allowed.contains(&extension.as_str()) {
            return Err(ValidationError::InvalidExtension { extension, allowed });
        }

        Ok(())
    }

    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        if Format::from_mime_type(content_type) != Some(self.source) {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                expected: self.source.mime_type(),
            });
        }

        Ok(())
    }

    /// Validate a file's name, declared type and size.
    pub fn validate_all(
        &self,
        filename: &str,
        content_type: &str,
        file_size: usize,
    ) -> Result<(), ValidationError> {
        if file_size == 0 {
            return Err(ValidationError::EmptyFile);
        }
        self.validate_extension(filename)?;
        self.validate_content_type(content_type)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_accepts_both_extensions() {
        let validator = SourceValidator::new(Format::Jpeg);
        assert!(validator.validate_all("a.jpg", "image/jpeg", 10).is_ok());
        assert!(validator.validate_all("B.JPEG", "image/jpeg", 10).is_ok());
        assert!(validator.validate_all("c.png", "image/jpeg", 10).is_err());
    }

    #[test]
    fn test_tiff_accepts_tif() {
        let validator = SourceValidator::new(Format::Tiff);
        assert!(validator.validate_all("scan.tif", "image/tiff", 1).is_ok());
    }

    #[test]
    fn test_mime_must_match_source() {
        let validator = SourceValidator::new(Format::Png);
        assert!(matches!(
            validator.validate_all("a.png", "image/webp", 10),
            Err(ValidationError::InvalidContentType { .. })
        ));
        assert!(validator
            .validate_content_type("image/png; charset=binary")
            .is_ok());
    }

    #[test]
    fn test_missing_extension_and_empty_file() {
        let validator = SourceValidator::new(Format::Gif);
        assert!(matches!(
            validator.validate_extension("noext"),
            Err(ValidationError::InvalidFilename(_))
        ));
        assert!(matches!(
            validator.validate_all("a.gif", "image/gif", 0),
            Err(ValidationError::EmptyFile)
        ));
    }
}
