//! Main scrubbing engine
//!
//! This module provides [`PhiScrubber`], the object constructed at startup from
//! configuration and shared (behind an `Arc`) by every caller that needs to
//! scrub text, structured values or log records.
//!
//! # Examples
//!
//! ```
//! use phi_guard::scrubber::{PhiScrubber, ScrubberConfig};
//!
//! let scrubber = PhiScrubber::new(&ScrubberConfig::default())?;
//! let result = scrubber.scrub("Patient John Doe, SSN: 123-45-6789");
//! assert_eq!(
//!     result.cleaned,
//!     "Patient [REDACTED-PATIENT_NAME], SSN: [REDACTED-SSN]"
//! );
//! # Ok::<(), phi_guard::domain::PhiGuardError>(())
//! ```

use super::config::ScrubberConfig;
use super::detector;
use super::keys::{KeyMatcher, SensitiveKeyRule};
use super::models::{PhiCategory, ScrubResult};
use super::registry::{library, PatternRegistry, PatternSource, PatternSpec};
use super::report::PhiSummary;
use super::walker::{parse_container, StructureWalker, DEFAULT_MAX_DEPTH};
use crate::domain::errors::ScrubError;
use crate::domain::{PhiGuardError, Result};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Medical context keywords used by [`PhiScrubber::has_phi`]
pub const CONTEXT_KEYWORDS: [&str; 24] = [
    "patient",
    "member",
    "client",
    "diagnosis",
    "medication",
    "prescription",
    "treatment",
    "medical",
    "health",
    "insurance",
    "claim",
    "provider",
    "doctor",
    "physician",
    "nurse",
    "hospital",
    "clinic",
    "appointment",
    "symptom",
    "condition",
    "disease",
    "allergy",
    "vaccine",
    "dose",
];

/// PHI scrubbing engine
///
/// # Thread Safety
///
/// All scrub operations take `&self` and read one registry snapshot per call,
/// so a scrubber can be shared across threads and tasks with `Arc`. Pattern
/// registration publishes a new snapshot; calls already in flight finish on
/// the snapshot they started with.
#[derive(Debug)]
pub struct PhiScrubber {
    registry: Arc<PatternRegistry>,
    keys: KeyMatcher,
    max_depth: usize,
    context_keyword_threshold: usize,
}

impl PhiScrubber {
    /// Create a scrubber from configuration
    ///
    /// Loads the built-in pattern library (or the configured library file),
    /// registers configured custom patterns and applies `disabled_patterns`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - The pattern library cannot be read or parsed
    /// - A pattern is invalid or a name collides
    /// - A disabled pattern name is unknown
    pub fn new(config: &ScrubberConfig) -> Result<Self> {
        config.validate().map_err(|e| {
            PhiGuardError::Configuration(format!("Invalid scrubber configuration: {e}"))
        })?;

        let registry = match config.pattern_library {
            Some(ref path) => {
                let specs = library::from_file(path)?;
                PatternRegistry::from_specs(&specs, PatternSource::Library)?
            }
            None => PatternRegistry::with_builtin_patterns()?,
        };

        for pattern in &config.custom_patterns {
            registry.register(&pattern.to_spec(), pattern.replace)?;
        }

        for name in &config.disabled_patterns {
            registry.set_enabled(name, false)?;
        }

        let snapshot = registry.snapshot();
        tracing::info!(
            patterns = snapshot.len(),
            enabled = snapshot.enabled().count(),
            fingerprint = %snapshot.fingerprint(),
            "PHI scrubber initialized"
        );

        let keys = if config.field_redaction {
            KeyMatcher::new(&config.sensitive_keys)
        } else {
            KeyMatcher::disabled()
        };

        Ok(Self {
            registry: Arc::new(registry),
            keys,
            max_depth: config.max_depth,
            context_keyword_threshold: config.context_keyword_threshold,
        })
    }

    /// Create a scrubber around an existing registry with default settings
    pub fn with_registry(registry: Arc<PatternRegistry>) -> Self {
        Self {
            registry,
            keys: KeyMatcher::new(&super::keys::default_rules()),
            max_depth: DEFAULT_MAX_DEPTH,
            context_keyword_threshold: 3,
        }
    }

    /// Set the maximum container nesting for structured values
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Replace the sensitive field-name rules; an empty list disables them
    pub fn with_sensitive_keys(mut self, rules: &[SensitiveKeyRule]) -> Self {
        self.keys = KeyMatcher::new(rules);
        self
    }

    /// Shared handle to the pattern registry
    pub fn registry(&self) -> &Arc<PatternRegistry> {
        &self.registry
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Scrub a string
    pub fn scrub(&self, text: &str) -> ScrubResult<String> {
        let snapshot = self.registry.snapshot();
        detector::scrub(&snapshot, text)
    }

    /// Scrub a string, returning only the cleaned text
    pub fn scrub_text(&self, text: &str) -> String {
        self.scrub(text).cleaned
    }

    /// Scrub a JSON value, preserving its shape
    pub fn scrub_value(&self, value: &Value) -> std::result::Result<Value, ScrubError> {
        self.scrub_value_detailed(value).map(|r| r.cleaned)
    }

    /// Scrub a JSON value, returning category counts alongside the copy
    pub fn scrub_value_detailed(
        &self,
        value: &Value,
    ) -> std::result::Result<ScrubResult<Value>, ScrubError> {
        let snapshot = self.registry.snapshot();
        StructureWalker::new(&snapshot, &self.keys, self.max_depth).scrub_value(value)
    }

    /// Scrub JSON text
    ///
    /// Arrays and objects are scrubbed structurally and re-serialized. Any other
    /// input, including malformed JSON and structures that nest too deeply, is
    /// scrubbed as plain text.
    pub fn scrub_json(&self, json: &str) -> String {
        let Some(value) = parse_container(json) else {
            return self.scrub_text(json);
        };

        match self.scrub_value(&value) {
            Ok(cleaned) => match serde_json::to_string(&cleaned) {
                Ok(text) => text,
                Err(_) => self.scrub_text(json),
            },
            Err(e) => {
                tracing::warn!(error_kind = e.kind(), "Structured scrub failed, scrubbing as text");
                self.scrub_text(json)
            }
        }
    }

    /// Check if text potentially contains PHI
    ///
    /// True when any enabled pattern matches, or when enough distinct medical
    /// context keywords appear as whole words.
    pub fn has_phi(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        if self.scrub(text).has_detections() {
            return true;
        }
        self.context_keyword_count(text) >= self.context_keyword_threshold
    }

    /// Number of distinct context keywords in `text`
    pub fn context_keyword_count(&self, text: &str) -> usize {
        let words: HashSet<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();

        CONTEXT_KEYWORDS
            .iter()
            .filter(|k| words.contains(**k))
            .count()
    }

    /// Per-category match counts for `text`
    pub fn phi_summary(&self, text: &str) -> BTreeMap<PhiCategory, usize> {
        self.scrub(text).counts
    }

    /// Scrub a batch of strings and summarize the detections
    pub fn scrub_batch_with_summary<I, S>(&self, texts: I) -> (Vec<String>, PhiSummary)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = PhiSummary::new();
        let mut cleaned = Vec::new();
        for text in texts {
            let result = self.scrub(text.as_ref());
            summary.add_result(&result);
            cleaned.push(result.cleaned);
        }
        summary.set_fingerprint(self.registry.snapshot().fingerprint());
        (cleaned, summary)
    }

    /// Register a custom pattern through the administrative path
    pub fn register_pattern(
        &self,
        name: &str,
        category: PhiCategory,
        matcher: &str,
        priority: i32,
        replace: bool,
    ) -> std::result::Result<(), ScrubError> {
        self.registry
            .register(&PatternSpec::new(name, category, matcher, priority), replace)
    }

    /// Enable or disable a pattern by name
    pub fn set_pattern_enabled(
        &self,
        name: &str,
        enabled: bool,
    ) -> std::result::Result<(), ScrubError> {
        self.registry.set_enabled(name, enabled)
    }
}
