//! Squeezit API Library
//!
//! HTTP handlers, middleware and application setup for the compress endpoint
//! and the pages around it.

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
pub mod setup;
pub mod telemetry;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
