//! PHI-safe logging
//!
//! [`SafeLogger`] scrubs every message and structured field before handing the
//! record to a [`LogSink`]. If scrubbing fails for any reason, including a panic
//! inside the scrubber, the record is replaced by [`SUPPRESSED_LOG_ENTRY`] with
//! only the error kind attached. Unscrubbed content never reaches the sink.
//!
//! # Example
//!
//! ```no_run
//! use phi_guard::scrubber::{PhiScrubber, SafeLogger, ScrubberConfig};
//! use serde_json::{json, Map};
//! use std::sync::Arc;
//!
//! # fn example() -> phi_guard::domain::Result<()> {
//! let scrubber = Arc::new(PhiScrubber::new(&ScrubberConfig::default())?);
//! let logger = SafeLogger::new(scrubber);
//!
//! let mut fields = Map::new();
//! fields.insert("caller".to_string(), json!("555-123-4567"));
//! logger.info("Callback requested by Patient John Doe", &fields);
//! # Ok(())
//! # }
//! ```

use super::engine::PhiScrubber;
use crate::domain::errors::ScrubError;
use serde_json::{Map, Value};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::Level;

/// Message emitted in place of a record that could not be scrubbed
pub const SUPPRESSED_LOG_ENTRY: &str = "<log entry suppressed: scrub failure>";

/// Field carrying the error kind on a suppressed record
pub const SCRUB_ERROR_FIELD: &str = "scrub_error";

/// Destination for scrubbed log records
pub trait LogSink: Send + Sync {
    /// Emit one record. Message and fields are already scrubbed.
    fn emit(&self, level: Level, message: &str, fields: &Map<String, Value>);
}

/// Sink that forwards records to `tracing` under the `phi_guard::safe_log`
/// target, with all fields serialized as one JSON `fields` value
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, level: Level, message: &str, fields: &Map<String, Value>) {
        let fields = Value::Object(fields.clone());
        if level == Level::ERROR {
            tracing::error!(target: "phi_guard::safe_log", fields = %fields, "{message}");
        } else if level == Level::WARN {
            tracing::warn!(target: "phi_guard::safe_log", fields = %fields, "{message}");
        } else if level == Level::INFO {
            tracing::info!(target: "phi_guard::safe_log", fields = %fields, "{message}");
        } else if level == Level::DEBUG {
            tracing::debug!(target: "phi_guard::safe_log", fields = %fields, "{message}");
        } else {
            tracing::trace!(target: "phi_guard::safe_log", fields = %fields, "{message}");
        }
    }
}

/// Logging wrapper that scrubs before emitting
pub struct SafeLogger<S: LogSink = TracingSink> {
    scrubber: Arc<PhiScrubber>,
    sink: S,
}

impl SafeLogger<TracingSink> {
    /// Create a logger that writes through `tracing`
    pub fn new(scrubber: Arc<PhiScrubber>) -> Self {
        Self::with_sink(scrubber, TracingSink)
    }
}

impl<S: LogSink> SafeLogger<S> {
    /// Create a logger with a custom sink
    pub fn with_sink(scrubber: Arc<PhiScrubber>, sink: S) -> Self {
        Self { scrubber, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Scrub and emit one record
    pub fn log(&self, level: Level, message: &str, fields: &Map<String, Value>) {
        match self.scrub_record(message, fields) {
            Ok((message, fields)) => self.sink.emit(level, &message, &fields),
            Err(e) => self.sink.emit(level, SUPPRESSED_LOG_ENTRY, &suppressed_fields(&e)),
        }
    }

    pub fn trace(&self, message: &str, fields: &Map<String, Value>) {
        self.log(Level::TRACE, message, fields);
    }

    pub fn debug(&self, message: &str, fields: &Map<String, Value>) {
        self.log(Level::DEBUG, message, fields);
    }

    pub fn info(&self, message: &str, fields: &Map<String, Value>) {
        self.log(Level::INFO, message, fields);
    }

    pub fn warn(&self, message: &str, fields: &Map<String, Value>) {
        self.log(Level::WARN, message, fields);
    }

    pub fn error(&self, message: &str, fields: &Map<String, Value>) {
        self.log(Level::ERROR, message, fields);
    }

    /// One-line form `"<message> | Data: <json>"`, or just the message when
    /// there is no data
    pub fn format_line(&self, message: &str, data: Option<&Map<String, Value>>) -> String {
        let empty = Map::new();
        let fields = data.unwrap_or(&empty);

        match self.scrub_record(message, fields) {
            Ok((message, fields)) if fields.is_empty() => message,
            Ok((message, fields)) => match serde_json::to_string(&fields) {
                Ok(json) => format!("{message} | Data: {json}"),
                Err(_) => SUPPRESSED_LOG_ENTRY.to_string(),
            },
            Err(_) => SUPPRESSED_LOG_ENTRY.to_string(),
        }
    }

    /// Scrub message and fields, turning panics into `ScrubFailure`
    fn scrub_record(
        &self,
        message: &str,
        fields: &Map<String, Value>,
    ) -> Result<(String, Map<String, Value>), ScrubError> {
        let scrubber = &self.scrubber;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let message = scrubber.scrub_text(message);
            if fields.is_empty() {
                return Ok((message, Map::new()));
            }
            match scrubber.scrub_value(&Value::Object(fields.clone()))? {
                Value::Object(fields) => Ok((message, fields)),
                _ => Err(ScrubError::ScrubFailure(
                    "field map changed shape".to_string(),
                )),
            }
        }));

        outcome.unwrap_or_else(|_| {
            Err(ScrubError::ScrubFailure(
                "panic while scrubbing log record".to_string(),
            ))
        })
    }
}

fn suppressed_fields(error: &ScrubError) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(
        SCRUB_ERROR_FIELD.to_string(),
        Value::String(error.kind().to_string()),
    );
    fields
}
