//! # tagwright-core
//!
//! Core types, traits, and abstractions for tagwright.
//!
//! This crate provides the metadata model shared by every other crate
//! (entities, documents, merge requests and outcomes, suggestion groups),
//! the error type, pagination, and the two capability traits the
//! consolidation engine is written against:
//!
//! - [`MetadataGateway`]: operations on one kind of remote metadata entity
//! - [`GroupSuggester`]: semantic group suggestions from a language model

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use pagination::{paginate, Page};
pub use traits::*;
