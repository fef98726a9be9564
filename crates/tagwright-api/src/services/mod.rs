//! Services orchestrating several gateway calls per request.

pub mod merge;

pub use merge::MergeOrchestrator;
