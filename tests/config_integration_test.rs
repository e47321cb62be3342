//! Integration tests for configuration loading and validation
//!
//! Every load applies PHI_GUARD_* overrides, so all tests that load a
//! configuration hold ENV_MUTEX.

use phi_guard::config::{load_config, load_config_from_str, load_config_or_default};
use phi_guard::domain::PhiGuardError;
use phi_guard::scrubber::{PhiCategory, PhiScrubber, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;

// Mutex to serialize tests that read or modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const OVERRIDES: [&str; 13] = [
    "PHI_GUARD_APPLICATION_LOG_LEVEL",
    "PHI_GUARD_SCRUBBER_MAX_DEPTH",
    "PHI_GUARD_SCRUBBER_PATTERN_LIBRARY",
    "PHI_GUARD_SCRUBBER_FIELD_REDACTION",
    "PHI_GUARD_SCRUBBER_CONTEXT_KEYWORD_THRESHOLD",
    "PHI_GUARD_SCRUBBER_DISABLED_PATTERNS",
    "PHI_GUARD_SCRUBBER_AUDIT_ENABLED",
    "PHI_GUARD_SCRUBBER_AUDIT_LOG_PATH",
    "PHI_GUARD_SCRUBBER_AUDIT_JSON_FORMAT",
    "PHI_GUARD_LOGGING_LOCAL_ENABLED",
    "PHI_GUARD_LOGGING_LOCAL_PATH",
    "PHI_GUARD_LOGGING_LOCAL_ROTATION",
    "PHI_GUARD_LOGGING_JSON_CONSOLE",
];

/// Lock the environment and clear every override variable
fn clean_env() -> MutexGuard<'static, ()> {
    let guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    for name in OVERRIDES {
        std::env::remove_var(name);
    }
    guard
}

fn write_temp(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _env = clean_env();
    let toml_content = r#"
[application]
log_level = "debug"

[scrubber]
max_depth = 16
field_redaction = true
context_keyword_threshold = 2
disabled_patterns = ["ssn_bare"]

[[scrubber.sensitive_keys]]
key = "guardian"
category = "PATIENT_NAME"

[[scrubber.sensitive_keys]]
key = "member_id"
category = "insurance_id"

[[scrubber.custom_patterns]]
name = "employee_id"
category = "EMPLOYEE_ID"
pattern = '\bEMP\d{6}\b'
priority = 5

[[scrubber.custom_patterns]]
name = "gift_card"
category = "GIFT_CARD"
pattern = '\b\d{16}\b'
validator = "luhn"

[scrubber.audit]
enabled = true
log_path = "/tmp/phi-guard/audit.log"
json_format = false

[logging]
local_enabled = true
local_path = "/tmp/phi-guard/logs"
local_rotation = "hourly"
json_console = true
"#;

    let file = write_temp(toml_content, ".toml");
    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");

    let scrubber = &config.scrubber;
    assert_eq!(scrubber.max_depth, 16);
    assert!(scrubber.field_redaction);
    assert_eq!(scrubber.context_keyword_threshold, 2);
    assert_eq!(scrubber.disabled_patterns, vec!["ssn_bare".to_string()]);

    assert_eq!(scrubber.sensitive_keys.len(), 2);
    assert_eq!(scrubber.sensitive_keys[0].key, "guardian");
    assert_eq!(scrubber.sensitive_keys[0].category, PhiCategory::PatientName);
    assert_eq!(
        scrubber.sensitive_keys[1].category,
        PhiCategory::Custom("INSURANCE_ID".to_string())
    );

    assert_eq!(scrubber.custom_patterns.len(), 2);
    assert_eq!(scrubber.custom_patterns[0].priority, 5);
    assert_eq!(scrubber.custom_patterns[1].priority, 100);
    assert_eq!(scrubber.custom_patterns[1].validator, Some(Validator::Luhn));
    assert!(!scrubber.custom_patterns[1].replace);

    assert!(scrubber.audit.enabled);
    assert_eq!(scrubber.audit.log_path, PathBuf::from("/tmp/phi-guard/audit.log"));
    assert!(!scrubber.audit.json_format);

    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_path, "/tmp/phi-guard/logs");
    assert_eq!(config.logging.local_rotation, "hourly");
    assert!(config.logging.json_console);
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _env = clean_env();
    let config = load_config_from_str("").expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.scrubber.max_depth, 64);
    assert!(config.scrubber.field_redaction);
    assert_eq!(config.scrubber.context_keyword_threshold, 3);
    assert!(config.scrubber.pattern_library.is_none());
    assert!(config.scrubber.custom_patterns.is_empty());
    assert!(config.scrubber.disabled_patterns.is_empty());
    assert!(!config.scrubber.sensitive_keys.is_empty());
    assert!(!config.scrubber.audit.enabled);
    assert!(config.scrubber.audit.json_format);
    assert!(!config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "daily");
}

#[test]
fn test_default_config_without_file() {
    let _env = clean_env();
    let config = load_config_or_default(None).expect("Failed to build default config");
    assert_eq!(config.application.log_level, "info");
    assert!(PhiScrubber::new(&config.scrubber).is_ok());
}

#[test]
fn test_missing_config_file() {
    let _env = clean_env();
    let result = load_config("/nonexistent/phi-guard.toml");
    assert!(matches!(result, Err(PhiGuardError::Configuration(_))));
}

#[test]
fn test_env_var_substitution() {
    let _env = clean_env();
    std::env::set_var("TEST_PHI_GUARD_AUDIT_DIR", "/var/log/phi");

    let toml_content = r#"
# audit path comes from the environment: ${NOT_SUBSTITUTED_IN_COMMENTS}
[scrubber.audit]
enabled = true
log_path = "${TEST_PHI_GUARD_AUDIT_DIR}/summary.log"
"#;
    let config = load_config_from_str(toml_content).expect("Failed to load config");
    assert_eq!(
        config.scrubber.audit.log_path,
        PathBuf::from("/var/log/phi/summary.log")
    );

    std::env::remove_var("TEST_PHI_GUARD_AUDIT_DIR");
}

#[test]
fn test_missing_substitution_variables_are_listed() {
    let _env = clean_env();
    std::env::remove_var("TEST_PHI_GUARD_MISSING_A");
    std::env::remove_var("TEST_PHI_GUARD_MISSING_B");

    let toml_content = r#"
[logging]
local_path = "${TEST_PHI_GUARD_MISSING_A}"

[scrubber.audit]
log_path = "${TEST_PHI_GUARD_MISSING_B}"
"#;
    let err = load_config_from_str(toml_content).unwrap_err().to_string();
    assert!(err.contains("TEST_PHI_GUARD_MISSING_A"));
    assert!(err.contains("TEST_PHI_GUARD_MISSING_B"));
}

#[test]
fn test_env_var_overrides() {
    let _env = clean_env();
    std::env::set_var("PHI_GUARD_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("PHI_GUARD_SCRUBBER_MAX_DEPTH", "8");
    std::env::set_var("PHI_GUARD_SCRUBBER_FIELD_REDACTION", "false");
    std::env::set_var("PHI_GUARD_SCRUBBER_DISABLED_PATTERNS", "ssn_bare, phone,");
    std::env::set_var("PHI_GUARD_SCRUBBER_AUDIT_ENABLED", "true");
    std::env::set_var("PHI_GUARD_LOGGING_LOCAL_ROTATION", "never");

    let toml_content = r#"
[application]
log_level = "info"

[scrubber]
max_depth = 32
"#;
    let result = load_config_from_str(toml_content);
    for name in OVERRIDES {
        std::env::remove_var(name);
    }
    let config = result.expect("Failed to load config");

    // Verify env var overrides took effect
    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.scrubber.max_depth, 8);
    assert!(!config.scrubber.field_redaction);
    assert_eq!(
        config.scrubber.disabled_patterns,
        vec!["ssn_bare".to_string(), "phone".to_string()]
    );
    assert!(config.scrubber.audit.enabled);
    assert_eq!(config.logging.local_rotation, "never");
}

#[test]
fn test_unparseable_override_is_rejected() {
    let _env = clean_env();
    std::env::set_var("PHI_GUARD_SCRUBBER_MAX_DEPTH", "deep");
    let result = load_config_from_str("");
    std::env::remove_var("PHI_GUARD_SCRUBBER_MAX_DEPTH");

    let err = result.unwrap_err().to_string();
    assert!(err.contains("PHI_GUARD_SCRUBBER_MAX_DEPTH"));
}

#[test]
fn test_invalid_config_validation() {
    let _env = clean_env();

    let cases = [
        "[application]\nlog_level = \"verbose\"",
        "[scrubber]\nmax_depth = 0",
        "[scrubber]\ncontext_keyword_threshold = 0",
        "[logging]\nlocal_rotation = \"weekly\"",
        "[[scrubber.custom_patterns]]\nname = \"\"\ncategory = \"X_ID\"\npattern = 'x\\d+'",
        "[[scrubber.custom_patterns]]\nname = \"a\"\ncategory = \"X_ID\"\npattern = 'x\\d+'\n\
         [[scrubber.custom_patterns]]\nname = \"a\"\ncategory = \"X_ID\"\npattern = 'y\\d+'",
        "[[scrubber.sensitive_keys]]\nkey = \"guardian\"\ncategory = \"has space\"",
        "[scrubber]\npattern_library = \"/nonexistent/patterns.toml\"",
        "[scrubber\nmax_depth = 3",
    ];

    for case in cases {
        let result = load_config_from_str(case);
        assert!(
            matches!(result, Err(PhiGuardError::Configuration(_))),
            "expected a configuration error for:\n{case}"
        );
    }
}

#[test]
fn test_pattern_library_file_replaces_builtins() {
    let _env = clean_env();
    let library = write_temp(
        r#"
[patterns.ssn]
category = "SSN"
pattern = '\b\d{3}-\d{2}-\d{4}\b'
priority = 10

[patterns.badge]
category = "BADGE"
pattern = '\bB-\d{6}\b'
priority = 20
"#,
        ".toml",
    );

    let toml_content = format!(
        "[scrubber]\npattern_library = \"{}\"\n",
        library.path().display()
    );
    let config = load_config_from_str(&toml_content).expect("Failed to load config");
    let scrubber = PhiScrubber::new(&config.scrubber).expect("Failed to build scrubber");

    let snapshot = scrubber.registry().snapshot();
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.get("email").is_none());

    assert_eq!(
        scrubber.scrub_text("SSN 123-45-6789, badge B-778812, mail jane@example.com"),
        "SSN [REDACTED-SSN], badge [REDACTED-BADGE], mail jane@example.com"
    );
}

#[test]
fn test_pattern_library_must_be_toml() {
    let _env = clean_env();
    let library = write_temp("[patterns]\n", ".txt");
    let toml_content = format!(
        "[scrubber]\npattern_library = \"{}\"\n",
        library.path().display()
    );
    assert!(load_config_from_str(&toml_content).is_err());
}

#[test]
fn test_loaded_config_builds_scrubber() {
    let _env = clean_env();
    let toml_content = r#"
[scrubber]
disabled_patterns = ["ssn_bare"]

[[scrubber.custom_patterns]]
name = "employee_id"
category = "EMPLOYEE_ID"
pattern = '\bEMP\d{6}\b'
priority = 5
"#;
    let config = load_config_from_str(toml_content).expect("Failed to load config");
    let scrubber = PhiScrubber::new(&config.scrubber).expect("Failed to build scrubber");

    let snapshot = scrubber.registry().snapshot();
    assert!(!snapshot.get("ssn_bare").unwrap().is_enabled());
    assert_eq!(
        scrubber.scrub_text("EMP123456 filed 123456789"),
        "[REDACTED-EMPLOYEE_ID] filed 123456789"
    );
}
