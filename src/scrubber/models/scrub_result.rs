//! Scrub result data models

use super::phi_category::PhiCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single accepted detection inside one scrub call
///
/// Offsets are byte offsets into the input. Matches never leave the detector:
/// they are not serialized, logged or stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Match {
    /// Index of the pattern in the snapshot that produced this match
    pub pattern_index: usize,
    pub category: PhiCategory,
    pub start: usize,
    pub end: usize,
    /// Set once the span has been substituted in the cleaned output
    pub replaced: bool,
}

/// Result of scrubbing a single value
///
/// `T` is the cleaned value: a `String` for text, a JSON value for structures.
/// The cleaned value never contains a raw substring that was matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrubResult<T = String> {
    /// Cleaned value, same shape as the input
    pub cleaned: T,
    /// Distinct categories matched, in order of first occurrence
    pub categories: Vec<PhiCategory>,
    /// Number of matches per category
    pub counts: BTreeMap<PhiCategory, usize>,
}

impl<T> ScrubResult<T> {
    /// A result with no detections
    pub fn clean(cleaned: T) -> Self {
        Self {
            cleaned,
            categories: Vec::new(),
            counts: BTreeMap::new(),
        }
    }

    /// Total number of matches across all categories
    pub fn total_matches(&self) -> usize {
        self.counts.values().sum()
    }

    /// Check if any PHI was detected
    pub fn has_detections(&self) -> bool {
        !self.counts.is_empty()
    }

    /// Number of matches for one category
    pub fn count(&self, category: &PhiCategory) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    /// Replace the cleaned value, keeping categories and counts
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ScrubResult<U> {
        ScrubResult {
            cleaned: f(self.cleaned),
            categories: self.categories,
            counts: self.counts,
        }
    }
}

/// Accumulates categories and counts across the leaves of one scrub call
#[derive(Debug, Default)]
pub(crate) struct CategoryTally {
    categories: Vec<PhiCategory>,
    counts: BTreeMap<PhiCategory, usize>,
}

impl CategoryTally {
    pub fn record(&mut self, category: &PhiCategory, n: usize) {
        if n == 0 {
            return;
        }
        if !self.counts.contains_key(category) {
            self.categories.push(category.clone());
        }
        *self.counts.entry(category.clone()).or_insert(0) += n;
    }

    pub fn absorb<T>(&mut self, result: &ScrubResult<T>) {
        for category in &result.categories {
            self.record(category, result.count(category));
        }
    }

    pub fn finish<T>(self, cleaned: T) -> ScrubResult<T> {
        ScrubResult {
            cleaned,
            categories: self.categories,
            counts: self.counts,
        }
    }
}
