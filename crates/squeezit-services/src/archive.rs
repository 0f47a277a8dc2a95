use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use squeezit_core::CompressedFile;

/// Download name of the packaged archive
pub const ARCHIVE_NAME: &str = "squeezit-images.zip";

/// Folder every entry is placed under inside the archive
pub const ARCHIVE_FOLDER: &str = "squeezit-images";

/// Strip path components so an entry cannot escape the archive folder.
fn sanitize_archive_filename(filename: &str, fallback: &str) -> String {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or(fallback)
        .to_string()
}

/// Package every successful result into one ZIP archive.
///
/// Failed entries are skipped. Returns `None` when nothing was converted, in
/// which case no archive is offered at all.
pub fn create_zip_archive(files: &[CompressedFile]) -> Result<Option<Vec<u8>>> {
    use zip::write::{FileOptions, ZipWriter};
    use zip::CompressionMethod;

    let converted: Vec<_> = files
        .iter()
        .enumerate()
        .filter_map(|(i, file)| file.result().map(|result| (i, file, result)))
        .collect();

    if converted.is_empty() {
        return Ok(None);
    }

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        for (index, file, result) in converted {
            let payload = result
                .decode()
                .with_context(|| format!("Failed to decode result: {}", file.filename))?;

            let safe_filename =
                sanitize_archive_filename(&file.filename, &format!("unnamed-{}", index + 1));
            let entry = format!("{}/{}", ARCHIVE_FOLDER, safe_filename);

            zip.start_file(entry.as_str(), options)
                .with_context(|| format!("Failed to add file to ZIP: {}", entry))?;
            zip.write_all(&payload.data)
                .with_context(|| format!("Failed to write file data to ZIP: {}", entry))?;
        }

        zip.finish().context("Failed to finalize ZIP archive")?;
    }

    tracing::debug!(bytes = buffer.len(), "Created archive");

    Ok(Some(buffer))
}
