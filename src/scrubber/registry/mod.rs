//! Pattern registry
//!
//! The registry owns the ordered set of detection rules. Readers take an
//! immutable [`RegistrySnapshot`] behind an `Arc`; writers build a complete new
//! snapshot and publish it with a pointer swap, so a scrub call never observes
//! a half-applied change.

pub mod library;
pub mod pattern;

pub use pattern::{Pattern, PatternSource, PatternSpec, Validator, PHI_GROUP};

use crate::domain::errors::ScrubError;
use crate::scrubber::models::PhiCategory;
use regex::{RegexSet, RegexSetBuilder, SetMatches};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Size limit for the combined prefilter program
const PREFILTER_SIZE_LIMIT: usize = 64 << 20;

/// Immutable, ordered view of the registry
#[derive(Debug)]
pub struct RegistrySnapshot {
    patterns: Vec<Arc<Pattern>>,
    prefilter: RegexSet,
    /// Snapshot index of each prefilter entry
    prefilter_map: Vec<usize>,
    version: u64,
    fingerprint: String,
}

impl RegistrySnapshot {
    fn build(mut patterns: Vec<Arc<Pattern>>, version: u64) -> Result<Self, ScrubError> {
        patterns.sort_by_key(|p| (p.priority(), p.seq));

        let mut sources = Vec::new();
        let mut prefilter_map = Vec::new();
        for (index, pattern) in patterns.iter().enumerate() {
            if pattern.is_enabled() {
                sources.push(pattern.matcher());
                prefilter_map.push(index);
            }
        }

        let prefilter = RegexSetBuilder::new(sources)
            .size_limit(PREFILTER_SIZE_LIMIT)
            .build()
            .map_err(|e| ScrubError::invalid_pattern("<prefilter>", e.to_string()))?;

        let mut hasher = Sha256::new();
        for pattern in &patterns {
            hasher.update(pattern.name().as_bytes());
            hasher.update(b"\x1f");
            hasher.update(pattern.category().label().as_bytes());
            hasher.update(b"\x1f");
            hasher.update(pattern.priority().to_string().as_bytes());
            hasher.update(b"\x1f");
            hasher.update(if pattern.is_enabled() { b"1" } else { b"0" });
            hasher.update(b"\x1f");
            hasher.update(pattern.matcher().as_bytes());
            hasher.update(b"\n");
        }
        let fingerprint = format!("{:x}", hasher.finalize());

        Ok(Self {
            patterns,
            prefilter,
            prefilter_map,
            version,
            fingerprint,
        })
    }

    fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            prefilter: RegexSet::empty(),
            prefilter_map: Vec::new(),
            version: 0,
            fingerprint: format!("{:x}", Sha256::new().finalize()),
        }
    }

    /// All patterns, ascending priority, disabled ones included
    pub fn patterns(&self) -> &[Arc<Pattern>] {
        &self.patterns
    }

    /// Enabled patterns, ascending priority
    pub fn enabled(&self) -> impl Iterator<Item = &Arc<Pattern>> {
        self.patterns.iter().filter(|p| p.is_enabled())
    }

    /// Look up a pattern by name
    pub fn get(&self, name: &str) -> Option<&Arc<Pattern>> {
        self.patterns.iter().find(|p| p.name() == name)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Monotonic version, bumped on every published change
    pub fn version(&self) -> u64 {
        self.version
    }

    /// SHA-256 over the rule set, hex encoded
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Cheap check whether any enabled pattern could match
    pub fn may_match(&self, text: &str) -> bool {
        self.prefilter.is_match(text)
    }

    /// Snapshot indices of enabled patterns, ascending priority
    pub(crate) fn enabled_indices(&self) -> &[usize] {
        &self.prefilter_map
    }

    /// Snapshot indices of enabled patterns whose matcher hits `text`,
    /// ascending priority
    pub(crate) fn candidate_patterns(&self, text: &str) -> Vec<usize> {
        let hits: SetMatches = self.prefilter.matches(text);
        hits.iter().map(|i| self.prefilter_map[i]).collect()
    }
}

/// Registry of PHI detection patterns
///
/// Shared across threads behind an `Arc`. Scrub calls only ever call
/// [`PatternRegistry::snapshot`], which is never blocked by pattern compilation.
#[derive(Debug)]
pub struct PatternRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
    writer: Mutex<()>,
    next_seq: AtomicU64,
}

impl PatternRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            current: RwLock::new(Arc::new(RegistrySnapshot::empty())),
            writer: Mutex::new(()),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Create a registry from pattern definitions of one source
    pub fn from_specs(specs: &[PatternSpec], source: PatternSource) -> Result<Self, ScrubError> {
        let registry = Self::empty();
        let mut patterns = Vec::with_capacity(specs.len());
        for spec in specs {
            if patterns.iter().any(|p: &Arc<Pattern>| p.name() == spec.name.trim()) {
                return Err(ScrubError::DuplicateName(spec.name.clone()));
            }
            let seq = registry.next_seq.fetch_add(1, Ordering::Relaxed);
            patterns.push(Arc::new(Pattern::compile(spec, source, seq)?));
        }

        let snapshot = RegistrySnapshot::build(patterns, 1)?;
        registry.publish(snapshot);
        Ok(registry)
    }

    /// Create a registry holding the embedded built-in library
    pub fn with_builtin_patterns() -> crate::domain::Result<Self> {
        let specs = library::builtin()?;
        Ok(Self::from_specs(&specs, PatternSource::BuiltIn)?)
    }

    /// Current immutable view
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Register a custom pattern
    ///
    /// Fails with `InvalidPattern` if the matcher does not compile or is unsafe,
    /// and with `DuplicateName` if an enabled custom pattern or a library
    /// pattern already uses the name and `replace` is false. A disabled custom
    /// pattern with the same name is replaced. On failure nothing changes.
    pub fn register(&self, spec: &PatternSpec, replace: bool) -> Result<(), ScrubError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.snapshot();

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let pattern = Pattern::compile(spec, PatternSource::Custom, seq)?;

        let mut patterns: Vec<Arc<Pattern>> = current.patterns().to_vec();
        if let Some(pos) = patterns.iter().position(|p| p.name() == pattern.name()) {
            let existing = &patterns[pos];
            let replaceable = existing.source() == PatternSource::Custom && !existing.is_enabled();
            if !replace && !replaceable {
                return Err(ScrubError::DuplicateName(pattern.name().to_string()));
            }
            patterns.remove(pos);
        }

        let name = pattern.name().to_string();
        let category = pattern.category().clone();
        let priority = pattern.priority();
        patterns.push(Arc::new(pattern));

        let snapshot = RegistrySnapshot::build(patterns, current.version() + 1)?;
        let version = snapshot.version();
        self.publish(snapshot);

        crate::log_pattern_registered!(name, category, priority, version);
        Ok(())
    }

    /// Register a custom pattern from its parts
    pub fn register_pattern(
        &self,
        name: &str,
        category: PhiCategory,
        matcher: &str,
        priority: i32,
        replace: bool,
    ) -> Result<(), ScrubError> {
        self.register(&PatternSpec::new(name, category, matcher, priority), replace)
    }

    /// Enable or disable a pattern by name
    pub fn set_enabled(&self, name: &str, enabled: bool) -> Result<(), ScrubError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.snapshot();

        let pos = current
            .patterns()
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| ScrubError::UnknownPattern(name.to_string()))?;

        if current.patterns()[pos].is_enabled() == enabled {
            return Ok(());
        }

        let mut patterns: Vec<Arc<Pattern>> = current.patterns().to_vec();
        patterns[pos] = Arc::new(patterns[pos].with_enabled(enabled));

        let snapshot = RegistrySnapshot::build(patterns, current.version() + 1)?;
        let version = snapshot.version();
        self.publish(snapshot);

        tracing::info!(pattern = %name, enabled, version, "Changed PHI pattern state");
        Ok(())
    }

    fn publish(&self, snapshot: RegistrySnapshot) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(snapshot);
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::empty()
    }
}
