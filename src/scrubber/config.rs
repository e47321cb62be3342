//! Scrubber configuration

use super::keys::{default_rules, SensitiveKeyRule};
use super::models::PhiCategory;
use super::registry::{PatternSpec, Validator};
use super::walker::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Scrubber configuration, the `[scrubber]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrubberConfig {
    /// Maximum container nesting for structured values
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Pattern library TOML replacing the built-in library
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,

    /// Redact whole values stored under sensitive field names
    #[serde(default = "default_true")]
    pub field_redaction: bool,

    /// Sensitive field-name rules, first match wins
    #[serde(default = "default_rules")]
    pub sensitive_keys: Vec<SensitiveKeyRule>,

    /// Distinct medical context keywords that flag text as PHI-bearing
    #[serde(default = "default_context_keyword_threshold")]
    pub context_keyword_threshold: usize,

    /// Patterns registered at startup
    #[serde(default)]
    pub custom_patterns: Vec<CustomPatternConfig>,

    /// Pattern names disabled at startup
    #[serde(default)]
    pub disabled_patterns: Vec<String>,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Default for ScrubberConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            pattern_library: None,
            field_redaction: true,
            sensitive_keys: default_rules(),
            context_keyword_threshold: default_context_keyword_threshold(),
            custom_patterns: Vec::new(),
            disabled_patterns: Vec::new(),
            audit: AuditConfig::default(),
        }
    }
}

impl ScrubberConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("scrubber.max_depth must be greater than 0".to_string());
        }

        if self.context_keyword_threshold == 0 {
            return Err("scrubber.context_keyword_threshold must be greater than 0".to_string());
        }

        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                return Err(format!("Pattern library file not found: {}", path.display()));
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                return Err(format!(
                    "Pattern library must be a TOML file: {}",
                    path.display()
                ));
            }
        }

        let mut names = HashSet::new();
        for pattern in &self.custom_patterns {
            pattern.validate()?;
            if !names.insert(pattern.name.as_str()) {
                return Err(format!(
                    "Duplicate custom pattern name: {}",
                    pattern.name
                ));
            }
        }

        for rule in &self.sensitive_keys {
            if rule.key.trim().is_empty() {
                return Err("scrubber.sensitive_keys entries must have a key".to_string());
            }
            rule.category.validate()?;
        }

        self.audit.validate()
    }
}

/// A pattern declared in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomPatternConfig {
    pub name: String,
    pub category: PhiCategory,
    pub pattern: String,
    #[serde(default = "default_custom_priority")]
    pub priority: i32,
    /// Replace a pattern with the same name
    #[serde(default)]
    pub replace: bool,
    #[serde(default)]
    pub validator: Option<Validator>,
}

impl CustomPatternConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("custom pattern name cannot be empty".to_string());
        }
        if self.pattern.is_empty() {
            return Err(format!("custom pattern '{}' has an empty pattern", self.name));
        }
        Ok(())
    }

    /// Registry definition for this pattern
    pub fn to_spec(&self) -> PatternSpec {
        let mut spec = PatternSpec::new(
            self.name.clone(),
            self.category.clone(),
            self.pattern.clone(),
            self.priority,
        );
        spec.validator = self.validator;
        spec
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_true")]
    pub json_format: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: true,
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err("scrubber.audit.log_path cannot be empty when audit is enabled".to_string());
        }
        Ok(())
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_true() -> bool {
    true
}

fn default_context_keyword_threshold() -> usize {
    3
}

fn default_custom_priority() -> i32 {
    100
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/phi_summary.log")
}
