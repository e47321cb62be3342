// PHI Guard - PHI scrubbing for logs and structured data
// Copyright (c) 2025 PHI Guard Contributors
// Licensed under the MIT License

//! # PHI Guard - PHI scrubbing for logs and structured data
//!
//! PHI Guard detects Protected Health Information (SSNs, medical record
//! numbers, dates of birth, phone numbers, emails, card numbers, patient names,
//! addresses, prescription numbers and custom identifiers) in free text and in
//! nested JSON values, and replaces each detection with a category token such
//! as `[REDACTED-SSN]`.
//!
//! ## Overview
//!
//! - **Pattern registry**: ordered, prioritized detection rules published as
//!   immutable snapshots; custom rules can be added at runtime
//! - **Detector/Redactor**: priority-ordered, overlap-free redaction of text
//! - **Structure walker**: shape-preserving scrubbing of JSON values, including
//!   JSON embedded in strings and PHI-named fields
//! - **Safe logger**: scrubs every record before it reaches a sink, and emits a
//!   content-free sentinel when scrubbing fails
//! - **Summary reporter** and **audit logger**: category counts, never text
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`scrubber`] - The scrubbing engine
//! - [`domain`] - Error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust
//! use phi_guard::scrubber::{PhiScrubber, ScrubberConfig};
//!
//! # fn main() -> phi_guard::domain::Result<()> {
//! let scrubber = PhiScrubber::new(&ScrubberConfig::default())?;
//!
//! let result = scrubber.scrub("Patient John Doe, SSN: 123-45-6789");
//! assert_eq!(
//!     result.cleaned,
//!     "Patient [REDACTED-PATIENT_NAME], SSN: [REDACTED-SSN]"
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Structured values
//!
//! ```rust
//! use phi_guard::scrubber::{PhiScrubber, ScrubberConfig};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let scrubber = PhiScrubber::new(&ScrubberConfig::default())?;
//!
//! let cleaned = scrubber.scrub_value(&json!({
//!     "patient": {"name": "John Doe", "ssn": "123-45-6789"},
//!     "visits": 3
//! }))?;
//! assert_eq!(cleaned["patient"]["name"], "[REDACTED-PATIENT_NAME]");
//! assert_eq!(cleaned["patient"]["ssn"], "[REDACTED-SSN]");
//! assert_eq!(cleaned["visits"], 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Engine operations return [`domain::ScrubError`]; application operations
//! return [`domain::PhiGuardError`]. Neither ever carries scrubbed input.

pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod scrubber;
