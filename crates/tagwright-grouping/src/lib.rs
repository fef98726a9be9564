//! # tagwright-grouping
//!
//! Pure, in-memory analysis over an already fetched snapshot of metadata
//! entities:
//!
//! - [`low_usage`]: entities that are delete/merge candidates
//! - [`prefix`]: clusters sharing a lexical name prefix
//! - [`semantic`]: clusters of near-duplicate names by string similarity
//! - [`hybrid`]: prefix clusters plus similarity clusters over the rest
//!
//! Nothing here performs I/O and nothing here fails: malformed input degrades
//! to empty results.

pub mod hybrid;
pub mod low_usage;
pub mod prefix;
pub mod semantic;

pub use hybrid::{group_hybrid, to_groups, HybridConfig};
pub use low_usage::{find_low_usage, ExcludePatterns, LowUsageCriteria};
pub use prefix::{group_by_prefix, prefix_key, tokenize};
pub use semantic::{group_by_similarity, name_similarity};
