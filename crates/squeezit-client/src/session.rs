use anyhow::Result;
use squeezit_core::{CompressResponse, CompressedFile, Format, UploadedImage};
use squeezit_services::{create_zip_archive, SourceValidator};

use crate::api::CompressTransport;

/// Upload lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    Populated,
}

/// Client-side state of one upload session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub phase: Phase,
    pub source: Format,
    pub target: Format,
    pub files: Vec<CompressedFile>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            source: Format::Jpeg,
            target: Format::Webp,
            files: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    SelectSource(Format),
    SelectTarget(Format),
    UploadStarted,
    /// `target` is the format the request was sent with, which names the results.
    UploadSucceeded {
        response: CompressResponse,
        target: Format,
    },
    UploadFailed,
    ClearAll,
}

fn phase_for(files: &[CompressedFile]) -> Phase {
    if files.is_empty() {
        Phase::Idle
    } else {
        Phase::Populated
    }
}

impl SessionState {
    /// Apply one action. A successful upload replaces the previous results;
    /// a failed one leaves them as they were.
    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::SelectSource(source) => Self { source, ..self },
            Action::SelectTarget(target) => Self { target, ..self },
            Action::UploadStarted => Self {
                phase: Phase::Uploading,
                ..self
            },
            Action::UploadSucceeded { response, target } => {
                let files = CompressedFile::from_response(response, target);
                Self {
                    phase: phase_for(&files),
                    files,
                    ..self
                }
            }
            Action::UploadFailed => Self {
                phase: phase_for(&self.files),
                ..self
            },
            Action::ClearAll => Self {
                phase: Phase::Idle,
                files: Vec::new(),
                ..self
            },
        }
    }
}

/// Drives uploads through a transport and keeps the resulting state.
pub struct UploadSession<T> {
    transport: T,
    state: SessionState,
}

impl<T: CompressTransport> UploadSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(action);
    }

    /// Keep only the files whose name and declared type match the selected
    /// source format.
    pub fn accept(&self, images: Vec<UploadedImage>) -> Vec<UploadedImage> {
        let validator = SourceValidator::new(self.state.source);
        images
            .into_iter()
            .filter(|image| {
                let name = image.file_name.as_deref().unwrap_or_default();
                let content_type = image.content_type.as_deref().unwrap_or_default();
                match validator.validate_all(name, content_type, image.data.len()) {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::debug!(file = %name, error = %e, "Skipping file");
                        false
                    }
                }
            })
            .collect()
    }

    /// Upload every accepted file in one request.
    ///
    /// Returns `false` without contacting the server when no file matches
    /// the source format, and also when the request fails.
    pub async fn upload(&mut self, images: Vec<UploadedImage>) -> bool {
        let accepted = self.accept(images);
        if accepted.is_empty() {
            return false;
        }

        let target = self.state.target;
        self.dispatch(Action::UploadStarted);

        match self.transport.compress(&accepted, target).await {
            Ok(response) => {
                tracing::info!(files = response.files.len(), target = %target, "Upload finished");
                self.dispatch(Action::UploadSucceeded { response, target });
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Upload failed");
                self.dispatch(Action::UploadFailed);
                false
            }
        }
    }

    /// The bulk download is offered only for more than one result.
    pub fn can_download_all(&self) -> bool {
        self.state.files.len() > 1
    }

    /// Package the current results; `None` when there is nothing to package.
    pub fn archive(&self) -> Result<Option<Vec<u8>>> {
        create_zip_archive(&self.state.files)
    }
}
