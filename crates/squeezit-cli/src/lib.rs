use std::path::Path;

use anyhow::{Context, Result};
use squeezit_core::{CompressedFile, FileOutcome, Format, UploadedImage};

/// Initialize tracing for the CLI.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Read a file from disk as an upload. The declared type is inferred from
/// the extension, the way a browser would label it.
pub async fn load_image(path: &Path) -> Result<UploadedImage> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let content_type = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(Format::from_extension)
        .map(|f| f.mime_type().to_string());

    Ok(UploadedImage {
        file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
        content_type,
        data,
    })
}

/// One summary line per result.
pub fn describe(file: &CompressedFile) -> String {
    match &file.outcome {
        FileOutcome::Converted(result) => {
            let savings = result
                .savings_percent()
                .map(|p| format!(" ({}% saved)", p))
                .unwrap_or_default();
            format!(
                "{}: {} KB -> {} KB{}",
                file.filename, result.original_size, result.size, savings
            )
        }
        FileOutcome::Failed(failure) => format!("{}: failed: {}", file.filename, failure.error),
    }
}
