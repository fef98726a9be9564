//! Low-usage candidate detection.

use regex::{Regex, RegexBuilder};
use tracing::warn;

use tagwright_core::MetadataEntity;

/// Case-insensitive name patterns excluded from low-usage results.
///
/// Patterns match anywhere in the name (`new` also excludes `brand new`).
#[derive(Debug, Clone, Default)]
pub struct ExcludePatterns {
    patterns: Vec<Regex>,
}

impl ExcludePatterns {
    /// Compile patterns. An invalid regex is matched as a literal substring
    /// instead of failing the whole filter.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .filter_map(|pattern| match build(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!(
                        subsystem = "grouping",
                        component = "low_usage",
                        pattern,
                        error = %e,
                        "Invalid exclude pattern, matching it literally"
                    );
                    build(&regex::escape(pattern)).ok()
                }
            })
            .collect();
        Self { patterns }
    }

    /// True when any pattern matches somewhere in `name`.
    pub fn is_match(&self, name: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(name))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn build(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Selection criteria for [`find_low_usage`].
#[derive(Debug, Clone, Default)]
pub struct LowUsageCriteria {
    /// Inclusive upper bound on `document_count`.
    pub max_docs: u64,
    pub exclude_patterns: ExcludePatterns,
    /// Drop entities the remote assigns automatically.
    pub exclude_auto: bool,
}

/// Entities with at most `max_docs` documents that match no exclude pattern
/// and, when `exclude_auto` is set, are not auto-matched.
///
/// Input order is preserved; callers sort.
pub fn find_low_usage(
    entities: &[MetadataEntity],
    criteria: &LowUsageCriteria,
) -> Vec<MetadataEntity> {
    entities
        .iter()
        .filter(|e| e.document_count <= criteria.max_docs)
        .filter(|e| !criteria.exclude_patterns.is_match(&e.name))
        .filter(|e| !(criteria.exclude_auto && e.is_auto()))
        .cloned()
        .collect()
}
