//! # tagwright-remote
//!
//! Typed access to a Paperless-ngx instance's REST API.
//!
//! [`PaperlessClient`] owns one authenticated HTTP client and is meant to live
//! for a single inbound request. [`RemoteGateway`] binds it to one
//! [`EntityKind`](tagwright_core::EntityKind) and implements
//! [`MetadataGateway`](tagwright_core::MetadataGateway), so the merge
//! orchestrator and handlers are written once for tags, correspondents and
//! document types.

pub mod bulk_delete;
pub mod client;
pub mod custom_fields;
pub mod gateway;
mod wire;

pub use client::{ConnectionInfo, PaperlessClient};
pub use custom_fields::CustomField;
pub use gateway::RemoteGateway;
