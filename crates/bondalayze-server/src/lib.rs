//! HTTP surface and process wiring for the Bondalayze backend.

pub mod api;
pub mod api_error;
pub mod bootstrap;
pub mod logging;

pub use api::{AppState, router};
pub use api_error::ApiError;
