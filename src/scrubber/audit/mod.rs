//! Audit logging module
//!
//! Appends PHI summary reports to a JSON-lines audit trail.

pub mod logger;

pub use logger::AuditLogger;
