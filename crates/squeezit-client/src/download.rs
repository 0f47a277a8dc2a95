use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use squeezit_core::CompressedFile;
use squeezit_services::ARCHIVE_NAME;

/// Write one converted result to `dir` under its synthetic filename.
///
/// Failed entries have nothing to save and return `Ok(None)`.
pub async fn save_file(dir: &Path, file: &CompressedFile) -> Result<Option<PathBuf>> {
    let Some(result) = file.result() else {
        return Ok(None);
    };

    let payload = result
        .decode()
        .with_context(|| format!("Failed to decode result: {}", file.filename))?;
    let path = dir.join(&file.filename);
    tokio::fs::write(&path, &payload.data)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::debug!(path = %path.display(), bytes = payload.data.len(), "Saved file");
    Ok(Some(path))
}

/// Write a packaged archive to `dir` as `squeezit-images.zip`.
pub async fn save_archive(dir: &Path, archive: &[u8]) -> Result<PathBuf> {
    let path = dir.join(ARCHIVE_NAME);
    tokio::fs::write(&path, archive)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
