//! PHI summary reporting
//!
//! Aggregates category counts across scrub calls for audit output. A summary
//! holds counts only; no matched text ever reaches it.

use crate::scrubber::models::{PhiCategory, ScrubResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated detection statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhiSummary {
    /// When the summary was created
    pub generated_at: DateTime<Utc>,

    /// Total scrub calls summarized
    pub total_calls: usize,

    /// Calls with at least one detection
    pub calls_with_phi: usize,

    /// Calls with no detections
    pub calls_without_phi: usize,

    /// Total detections across all calls
    pub total_matches: usize,

    /// Detections by category
    pub matches_by_category: BTreeMap<PhiCategory, usize>,

    /// Fingerprint of the registry snapshot in use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_fingerprint: Option<String>,
}

impl PhiSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            total_calls: 0,
            calls_with_phi: 0,
            calls_without_phi: 0,
            total_matches: 0,
            matches_by_category: BTreeMap::new(),
            registry_fingerprint: None,
        }
    }

    /// Summarize a set of scrub results
    pub fn summarize<'a, T: 'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ScrubResult<T>>,
    {
        let mut summary = Self::new();
        for result in results {
            summary.add_result(result);
        }
        summary
    }

    /// Count one scrub call
    pub fn add_result<T>(&mut self, result: &ScrubResult<T>) {
        self.total_calls += 1;

        if !result.has_detections() {
            self.calls_without_phi += 1;
            return;
        }

        self.calls_with_phi += 1;
        for (category, count) in &result.counts {
            self.total_matches += count;
            *self
                .matches_by_category
                .entry(category.clone())
                .or_insert(0) += count;
        }
    }

    /// Fold another summary into this one
    pub fn merge(&mut self, other: &PhiSummary) {
        self.total_calls += other.total_calls;
        self.calls_with_phi += other.calls_with_phi;
        self.calls_without_phi += other.calls_without_phi;
        self.total_matches += other.total_matches;
        for (category, count) in &other.matches_by_category {
            *self
                .matches_by_category
                .entry(category.clone())
                .or_insert(0) += count;
        }
        if self.registry_fingerprint.is_none() {
            self.registry_fingerprint = other.registry_fingerprint.clone();
        }
    }

    /// Record the registry fingerprint the counts were produced with
    pub fn set_fingerprint(&mut self, fingerprint: &str) {
        self.registry_fingerprint = Some(fingerprint.to_string());
    }

    /// Detections for one category
    pub fn count(&self, category: &PhiCategory) -> usize {
        self.matches_by_category.get(category).copied().unwrap_or(0)
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                      PHI SUMMARY REPORT                       \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Total Scrub Calls:      {}\n", self.total_calls));
        output.push_str(&format!("  Calls with PHI:         {}\n", self.calls_with_phi));
        output.push_str(&format!("  Calls without PHI:      {}\n", self.calls_without_phi));
        output.push_str(&format!("  Total PHI Matches:      {}\n", self.total_matches));
        if let Some(ref fingerprint) = self.registry_fingerprint {
            output.push_str(&format!("  Registry Fingerprint:   {}\n", &fingerprint[..fingerprint.len().min(16)]));
        }
        output.push('\n');

        if !self.matches_by_category.is_empty() {
            output.push_str("🔍 PHI MATCHES BY CATEGORY\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut categories: Vec<_> = self.matches_by_category.iter().collect();
            categories.sort_by(|a, b| b.1.cmp(a.1));

            for (category, count) in categories {
                output.push_str(&format!("  {:30} {:>5}\n", category.label(), count));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write report to file
    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.format_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

impl Default for PhiSummary {
    fn default() -> Self {
        Self::new()
    }
}
