use std::sync::Arc;

use squeezit_core::{
    size_in_kb, FileOutcome, Format, TranscodeFailure, TranscodeResult, UploadedImage,
};
use squeezit_processing::Transcoder;

/// Runs a batch of uploads through a `Transcoder`.
///
/// Files are processed one at a time in submission order, each on the
/// blocking pool. A file that fails becomes a failure entry in its slot and
/// the rest of the batch carries on.
#[derive(Clone)]
pub struct TranscodeService {
    transcoder: Arc<dyn Transcoder>,
}

impl TranscodeService {
    pub fn new(transcoder: Arc<dyn Transcoder>) -> Self {
        Self { transcoder }
    }

    pub async fn transcode_batch(
        &self,
        images: Vec<UploadedImage>,
        target: Format,
    ) -> Vec<FileOutcome> {
        let total = images.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, image) in images.into_iter().enumerate() {
            let outcome = self.transcode_one(image, target).await;
            match &outcome {
                FileOutcome::Converted(result) => tracing::debug!(
                    index = index,
                    target = %target,
                    original_kb = result.original_size,
                    output_kb = result.size,
                    "Transcoded file"
                ),
                FileOutcome::Failed(failure) => tracing::warn!(
                    index = index,
                    target = %target,
                    error = %failure.error,
                    "Failed to transcode file"
                ),
            }
            outcomes.push(outcome);
        }

        tracing::info!(
            files = total,
            converted = outcomes.iter().filter(|o| o.is_converted()).count(),
            target = %target,
            "Batch transcoded"
        );

        outcomes
    }

    async fn transcode_one(&self, image: UploadedImage, target: Format) -> FileOutcome {
        let original_len = image.data.len();
        let transcoder = Arc::clone(&self.transcoder);

        let result =
            tokio::task::spawn_blocking(move || transcoder.transcode(&image.data, target)).await;

        let error = match result {
            Ok(Ok(output)) => {
                return FileOutcome::Converted(TranscodeResult::new(target, &output, original_len))
            }
            Ok(Err(e)) => e.to_string(),
            Err(join_err) => {
                tracing::error!(error = %join_err, "Transcode task panicked");
                "Transcoding task failed".to_string()
            }
        };

        FileOutcome::Failed(TranscodeFailure {
            error,
            original_size: size_in_kb(original_len),
        })
    }
}
