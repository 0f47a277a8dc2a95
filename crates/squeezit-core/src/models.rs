//! Request and response models for the compress endpoint
//!
//! JSON field names follow the browser client (`originalSize`, not `original_size`).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::data_uri::{DataUri, DataUriError};
use crate::format::Format;

const KILOBYTE: usize = 1024;

/// Size in kilobytes, rounded to the nearest integer (halves round up).
pub fn size_in_kb(bytes: usize) -> u64 {
    ((bytes + KILOBYTE / 2) / KILOBYTE) as u64
}

/// One uploaded file part, buffered in memory for the duration of a request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedImage {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            file_name: None,
            content_type: None,
            data,
        }
    }
}

/// A successfully transcoded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeResult {
    /// `data:<mime>;base64,<payload>`
    pub url: String,
    /// Output size in KB
    pub size: u64,
    /// Input size in KB
    pub original_size: u64,
}

impl TranscodeResult {
    pub fn new(target: Format, output: &[u8], original_len: usize) -> Self {
        Self {
            url: DataUri::encode(target.mime_type(), output),
            size: size_in_kb(output.len()),
            original_size: size_in_kb(original_len),
        }
    }

    pub fn decode(&self) -> Result<DataUri, DataUriError> {
        DataUri::parse(&self.url)
    }

    /// Percentage saved relative to the original, negative when the output grew.
    /// `None` when the original rounds to 0 KB.
    pub fn savings_percent(&self) -> Option<i64> {
        if self.original_size == 0 {
            return None;
        }
        let original = self.original_size as f64;
        let saved = (original - self.size as f64) / original * 100.0;
        Some(saved.round() as i64)
    }
}

/// A file the transcoder could not process. The rest of the batch is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeFailure {
    pub error: String,
    pub original_size: u64,
}

/// Per-file entry of a compress response, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum FileOutcome {
    Converted(TranscodeResult),
    Failed(TranscodeFailure),
}

impl FileOutcome {
    pub fn as_result(&self) -> Option<&TranscodeResult> {
        match self {
            FileOutcome::Converted(result) => Some(result),
            FileOutcome::Failed(_) => None,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, FileOutcome::Converted(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompressResponse {
    pub files: Vec<FileOutcome>,
}

/// A result held by a client, with the synthetic filename used for downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedFile {
    pub filename: String,
    pub outcome: FileOutcome,
}

impl CompressedFile {
    /// Name the n-th (0-based) result of a batch: `squeezit-<n+1>.<ext>`.
    pub fn synthetic_filename(index: usize, target: Format) -> String {
        format!("squeezit-{}.{}", index + 1, target.extension())
    }

    /// Attach synthetic filenames to a response, preserving order.
    pub fn from_response(response: CompressResponse, target: Format) -> Vec<Self> {
        response
            .files
            .into_iter()
            .enumerate()
            .map(|(i, outcome)| CompressedFile {
                filename: Self::synthetic_filename(i, target),
                outcome,
            })
            .collect()
    }

    pub fn result(&self) -> Option<&TranscodeResult> {
        self.outcome.as_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_size_in_kb_rounding() {
        assert_eq!(size_in_kb(0), 0);
        assert_eq!(size_in_kb(511), 0);
        assert_eq!(size_in_kb(512), 1);
        assert_eq!(size_in_kb(1024), 1);
        assert_eq!(size_in_kb(1535), 1);
        assert_eq!(size_in_kb(1536), 2);
        assert_eq!(size_in_kb(10 * 1024 * 1024), 10240);
    }

    #[test]
    fn test_transcode_result_json_shape() {
        let result = TranscodeResult {
            url: "data:image/webp;base64,AAAA".to_string(),
            size: 12,
            original_size: 40,
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "url": "data:image/webp;base64,AAAA", "size": 12, "originalSize": 40 })
        );
    }

    #[test]
    fn test_outcome_untagged_deserialization() {
        let body = json!({
            "files": [
                { "url": "data:image/png;base64,", "size": 0, "originalSize": 3 },
                { "error": "decode failed", "originalSize": 1 }
            ]
        });
        let response: CompressResponse = serde_json::from_value(body).unwrap();
        assert!(response.files[0].is_converted());
        assert_eq!(
            response.files[1],
            FileOutcome::Failed(TranscodeFailure {
                error: "decode failed".to_string(),
                original_size: 1
            })
        );
    }

    #[test]
    fn test_savings_may_be_negative() {
        let grew = TranscodeResult {
            url: String::new(),
            size: 150,
            original_size: 100,
        };
        assert_eq!(grew.savings_percent(), Some(-50));

        let shrank = TranscodeResult {
            url: String::new(),
            size: 33,
            original_size: 100,
        };
        assert_eq!(shrank.savings_percent(), Some(67));

        let empty = TranscodeResult {
            url: String::new(),
            size: 0,
            original_size: 0,
        };
        assert_eq!(empty.savings_percent(), None);
    }

    #[test]
    fn test_new_result_encodes_target_mime() {
        let result = TranscodeResult::new(Format::Webp, &[0u8; 2048], 4096);
        assert!(result.url.starts_with("data:image/webp;base64,"));
        assert_eq!(result.size, 2);
        assert_eq!(result.original_size, 4);
        assert_eq!(result.decode().unwrap().data.len(), 2048);
    }

    #[test]
    fn test_synthetic_filenames_follow_submission_order() {
        let response = CompressResponse {
            files: vec![
                FileOutcome::Failed(TranscodeFailure {
                    error: "x".to_string(),
                    original_size: 0,
                }),
                FileOutcome::Converted(TranscodeResult {
                    url: String::new(),
                    size: 1,
                    original_size: 1,
                }),
            ],
        };
        let files = CompressedFile::from_response(response, Format::Avif);
        assert_eq!(files[0].filename, "squeezit-1.avif");
        assert_eq!(files[1].filename, "squeezit-2.avif");
        assert!(files[0].result().is_none());
        assert!(files[1].result().is_some());
    }
}
