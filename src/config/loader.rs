//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PhiGuardConfig;
use crate::domain::errors::PhiGuardError;
use crate::domain::result::Result;
use crate::scrubber::models::PhiCategory;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PhiGuardConfig
/// 4. Applies environment variable overrides (PHI_GUARD_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use phi_guard::config::loader::load_config;
///
/// let config = load_config("phi-guard.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PhiGuardConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PhiGuardError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PhiGuardError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from TOML text, with the same steps as [`load_config`]
pub fn load_config_from_str(contents: &str) -> Result<PhiGuardConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: PhiGuardConfig = toml::from_str(&contents)
        .map_err(|e| PhiGuardError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finish(&mut config)?;
    Ok(config)
}

/// Loads configuration from an optional file
///
/// Without a file the defaults are used; environment overrides and validation
/// still apply.
pub fn load_config_or_default(path: Option<&Path>) -> Result<PhiGuardConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = PhiGuardConfig::default();
            finish(&mut config)?;
            Ok(config)
        }
    }
}

fn finish(config: &mut PhiGuardConfig) -> Result<()> {
    apply_env_overrides(config)?;

    config.validate().map_err(|e| {
        PhiGuardError::Configuration(format!("Configuration validation failed: {e}"))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PhiGuardError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PhiGuardError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| PhiGuardError::Configuration(format!("Invalid {name} value: {value}")))
}

/// Applies environment variable overrides using PHI_GUARD_* prefix
///
/// Environment variables follow the pattern: PHI_GUARD_<SECTION>_<KEY>
/// For example: PHI_GUARD_SCRUBBER_MAX_DEPTH, PHI_GUARD_LOGGING_LOCAL_PATH
fn apply_env_overrides(config: &mut PhiGuardConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("PHI_GUARD_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Scrubber overrides
    if let Ok(val) = std::env::var("PHI_GUARD_SCRUBBER_MAX_DEPTH") {
        config.scrubber.max_depth = parse_env("PHI_GUARD_SCRUBBER_MAX_DEPTH", &val)?;
    }
    if let Ok(val) = std::env::var("PHI_GUARD_SCRUBBER_PATTERN_LIBRARY") {
        config.scrubber.pattern_library = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("PHI_GUARD_SCRUBBER_FIELD_REDACTION") {
        config.scrubber.field_redaction = parse_env("PHI_GUARD_SCRUBBER_FIELD_REDACTION", &val)?;
    }
    if let Ok(val) = std::env::var("PHI_GUARD_SCRUBBER_CONTEXT_KEYWORD_THRESHOLD") {
        config.scrubber.context_keyword_threshold =
            parse_env("PHI_GUARD_SCRUBBER_CONTEXT_KEYWORD_THRESHOLD", &val)?;
    }
    if let Ok(val) = std::env::var("PHI_GUARD_SCRUBBER_DISABLED_PATTERNS") {
        config.scrubber.disabled_patterns = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    // Audit overrides
    if let Ok(val) = std::env::var("PHI_GUARD_SCRUBBER_AUDIT_ENABLED") {
        config.scrubber.audit.enabled = parse_env("PHI_GUARD_SCRUBBER_AUDIT_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("PHI_GUARD_SCRUBBER_AUDIT_LOG_PATH") {
        config.scrubber.audit.log_path = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("PHI_GUARD_SCRUBBER_AUDIT_JSON_FORMAT") {
        config.scrubber.audit.json_format =
            parse_env("PHI_GUARD_SCRUBBER_AUDIT_JSON_FORMAT", &val)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("PHI_GUARD_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("PHI_GUARD_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("PHI_GUARD_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("PHI_GUARD_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
    if let Ok(val) = std::env::var("PHI_GUARD_LOGGING_JSON_CONSOLE") {
        config.logging.json_console = parse_env("PHI_GUARD_LOGGING_JSON_CONSOLE", &val)?;
    }

    // Custom categories in sensitive key rules are validated here so a bad
    // label surfaces as a configuration error rather than at first use
    for rule in &config.scrubber.sensitive_keys {
        if let PhiCategory::Custom(ref label) = rule.category {
            PhiCategory::custom(label).map_err(PhiGuardError::Configuration)?;
        }
    }

    Ok(())
}
