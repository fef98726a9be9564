//! # tagwright-api
//!
//! HTTP surface of tagwright: browse, clean up and consolidate the tags,
//! correspondents and document types of a Paperless-ngx instance.
//!
//! The binary in `main.rs` loads [`Settings`], initialises logging and
//! serves [`build_router`]. Tests build the same router around a mock
//! remote.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{Settings, SettingsError};
pub use error::ApiError;
pub use routes::build_router;
pub use services::MergeOrchestrator;
pub use state::AppState;
