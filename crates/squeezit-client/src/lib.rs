//! Upload client for the Squeezit compress endpoint.
//!
//! `ApiClient` talks HTTP; `UploadSession` holds the client-side state
//! (selected formats and the current result list) and drives uploads through
//! any `CompressTransport`; `download` writes results to disk.

pub mod api;
pub mod download;
pub mod session;

pub use api::{ApiClient, CompressTransport};
pub use session::{Action, Phase, SessionState, UploadSession};
