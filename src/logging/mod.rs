//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Plain or JSON console output on stderr
//! - Configurable log levels
//! - Local JSON file logging with rotation
//!
//! Log events describe patterns, categories and counts. Matched text is never
//! passed to these macros; application messages that may carry user data go
//! through [`SafeLogger`](crate::scrubber::SafeLogger) instead.
//!
//! # Example
//!
//! ```no_run
//! use phi_guard::logging::init_logging;
//! use phi_guard::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log a registry change for one pattern
///
/// # Example
///
/// ```no_run
/// use phi_guard::log_pattern_registered;
///
/// log_pattern_registered!("employee_id", "EMPLOYEE_ID", 5, 2u64);
/// ```
#[macro_export]
macro_rules! log_pattern_registered {
    ($name:expr, $category:expr, $priority:expr, $version:expr) => {
        tracing::info!(
            pattern = %$name,
            category = %$category,
            priority = $priority,
            version = $version,
            "Registered PHI pattern"
        );
    };
}

/// Log the outcome of a batch scrub
///
/// # Example
///
/// ```no_run
/// use phi_guard::log_scrub_summary;
/// use phi_guard::scrubber::PhiSummary;
/// use std::time::Duration;
///
/// let summary = PhiSummary::new();
/// log_scrub_summary!(&summary, Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_scrub_summary {
    ($summary:expr, $duration:expr) => {
        tracing::info!(
            total_calls = $summary.total_calls,
            calls_with_phi = $summary.calls_with_phi,
            total_matches = $summary.total_matches,
            duration_ms = $duration.as_millis() as u64,
            "Batch scrub completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use phi_guard::log_error_with_context;
/// use phi_guard::domain::PhiGuardError;
///
/// let error = PhiGuardError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
