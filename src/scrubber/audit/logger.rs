//! Audit logger for PHI summaries

use crate::scrubber::report::PhiSummary;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Audit log entry
///
/// Counts and labels only. Matched text is never available at this layer.
#[derive(Debug, Serialize)]
struct AuditLogEntry<'a> {
    timestamp: String,
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    registry_fingerprint: Option<&'a str>,
    total_calls: usize,
    calls_with_phi: usize,
    calls_without_phi: usize,
    total_matches: usize,
    matches_by_category: BTreeMap<&'a str, usize>,
}

/// Audit logger for scrub summaries
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create audit log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Append one summary to the audit log
    ///
    /// `source` labels where the counts came from, e.g. a batch file name.
    pub fn log_summary(&self, summary: &PhiSummary, source: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = AuditLogEntry {
            timestamp: summary.generated_at.to_rfc3339(),
            source,
            registry_fingerprint: summary.registry_fingerprint.as_deref(),
            total_calls: summary.total_calls,
            calls_with_phi: summary.calls_with_phi,
            calls_without_phi: summary.calls_without_phi,
            total_matches: summary.total_matches,
            matches_by_category: summary
                .matches_by_category
                .iter()
                .map(|(category, count)| (category.label(), *count))
                .collect(),
        };

        self.write_entry(&entry)
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry<'_>) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            let categories = entry
                .matches_by_category
                .iter()
                .map(|(label, count)| format!("{label}={count}"))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                file,
                "[{}] Source: {} | Calls: {} | With PHI: {} | Matches: {} | Categories: {}",
                entry.timestamp,
                entry.source,
                entry.total_calls,
                entry.calls_with_phi,
                entry.total_matches,
                categories
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrubber::{PhiScrubber, ScrubberConfig};
    use tempfile::tempdir;

    fn summary() -> PhiSummary {
        let scrubber = PhiScrubber::new(&ScrubberConfig::default()).unwrap();
        let (_, summary) = scrubber
            .scrub_batch_with_summary(["SSN 123-45-6789", "email test@example.com", "hello"]);
        summary
    }

    #[test]
    fn test_audit_logger_creation() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested").join("audit.log");

        let logger = AuditLogger::new(log_path.clone(), true, true).unwrap();
        assert!(logger.is_enabled());
        assert!(log_path.parent().unwrap().exists());
    }

    #[test]
    fn test_log_summary_json() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), true, true).unwrap();

        logger.log_summary(&summary(), "batch.txt").unwrap();
        logger.log_summary(&summary(), "batch.txt").unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let entry: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(entry["source"], "batch.txt");
        assert_eq!(entry["total_calls"], 3);
        assert_eq!(entry["matches_by_category"]["SSN"], 1);
        assert!(entry["registry_fingerprint"].is_string());

        assert!(!content.contains("123-45-6789"));
        assert!(!content.contains("test@example.com"));
    }

    #[test]
    fn test_log_summary_plain_text() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), false, true).unwrap();

        logger.log_summary(&summary(), "stdin").unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("Source: stdin"));
        assert!(content.contains("EMAIL=1"));
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), true, false).unwrap();

        logger.log_summary(&summary(), "stdin").unwrap();
        assert!(!log_path.exists());
    }
}
