//! Pattern library loading from TOML

use super::pattern::{PatternSpec, Validator};
use crate::domain::{PhiGuardError, Result};
use crate::scrubber::models::PhiCategory;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Embedded default pattern library
pub const BUILTIN_LIBRARY: &str = include_str!("../../../patterns/phi_patterns.toml");

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// PHI category label
    pub category: String,
    /// Regex source
    pub pattern: String,
    /// Lower runs first
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub validator: Option<Validator>,
}

fn default_enabled() -> bool {
    true
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: BTreeMap<String, PatternDefinition>,
}

/// Parse a pattern library from TOML content
///
/// Entries come back sorted by name; the registry orders them by priority.
pub fn from_toml(content: &str) -> Result<Vec<PatternSpec>> {
    let library: PatternLibrary = toml::from_str(content)
        .map_err(|e| PhiGuardError::Configuration(format!("Failed to parse pattern library: {e}")))?;

    library
        .patterns
        .into_iter()
        .map(|(name, def)| {
            let category: PhiCategory = def.category.parse().map_err(|e| {
                PhiGuardError::Configuration(format!(
                    "Invalid category in pattern '{name}': {e}"
                ))
            })?;

            let mut spec = PatternSpec::new(name, category, def.pattern, def.priority)
                .with_enabled(def.enabled);
            spec.validator = def.validator;
            Ok(spec)
        })
        .collect()
}

/// Read and parse a pattern library file
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Vec<PatternSpec>> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        PhiGuardError::Configuration(format!(
            "Failed to read pattern library {}: {e}",
            path.as_ref().display()
        ))
    })?;

    from_toml(&content)
}

/// Built-in pattern definitions
pub fn builtin() -> Result<Vec<PatternSpec>> {
    from_toml(BUILTIN_LIBRARY)
}
