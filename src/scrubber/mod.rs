//! PHI scrubbing
//!
//! This module provides the scrubbing engine: a pattern registry, a
//! detection/redaction pass over single strings, a recursive walker for JSON
//! values, a fail-closed logging wrapper and count-only summary reporting.
//!
//! # Example
//!
//! ```
//! use phi_guard::scrubber::{PhiScrubber, ScrubberConfig};
//! use serde_json::json;
//!
//! let scrubber = PhiScrubber::new(&ScrubberConfig::default())?;
//!
//! let cleaned = scrubber
//!     .scrub_value(&json!({"patient": {"name": "Jane Doe", "ssn": "123-45-6789"}}))?;
//! assert_eq!(
//!     cleaned,
//!     json!({"patient": {"name": "[REDACTED-PATIENT_NAME]", "ssn": "[REDACTED-SSN]"}})
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod audit;
pub mod config;
pub mod detector;
pub mod engine;
pub mod keys;
pub mod models;
pub mod registry;
pub mod report;
pub mod safe_log;
pub mod walker;

pub use audit::AuditLogger;
pub use config::{AuditConfig, CustomPatternConfig, ScrubberConfig};
pub use engine::PhiScrubber;
pub use keys::SensitiveKeyRule;
pub use models::{PhiCategory, ScrubResult};
pub use registry::{PatternRegistry, PatternSpec, RegistrySnapshot, Validator};
pub use report::PhiSummary;
pub use safe_log::{LogSink, SafeLogger, TracingSink, SUPPRESSED_LOG_ENTRY};
