//! Recursive scrubbing of JSON values
//!
//! Shape is preserved: arrays keep their length and order, objects keep their
//! keys, and only string leaves change. A string leaf that parses as a JSON
//! array or object is scrubbed structurally and re-serialized in compact form
//! with sorted keys.

use super::detector;
use super::keys::KeyMatcher;
use crate::domain::errors::ScrubError;
use crate::scrubber::models::{CategoryTally, PhiCategory, ScrubResult, TOKEN_PREFIX};
use crate::scrubber::registry::RegistrySnapshot;
use serde_json::{Map, Value};

/// Default bound on container nesting
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Walks one value against a fixed snapshot
pub struct StructureWalker<'a> {
    snapshot: &'a RegistrySnapshot,
    keys: &'a KeyMatcher,
    max_depth: usize,
}

impl<'a> StructureWalker<'a> {
    pub fn new(snapshot: &'a RegistrySnapshot, keys: &'a KeyMatcher, max_depth: usize) -> Self {
        Self {
            snapshot,
            keys,
            max_depth,
        }
    }

    /// Scrub a value, returning the cleaned copy with category counts
    ///
    /// Fails with `DepthExceeded` when containers, including those inside
    /// embedded JSON text, nest deeper than the configured bound.
    pub fn scrub_value(&self, value: &Value) -> Result<ScrubResult<Value>, ScrubError> {
        let mut tally = CategoryTally::default();
        let cleaned = self.walk(value, 0, &mut tally)?;
        Ok(tally.finish(cleaned))
    }

    fn walk(&self, value: &Value, depth: usize, tally: &mut CategoryTally) -> Result<Value, ScrubError> {
        match value {
            Value::Null | Value::Bool(_) | Value::Number(_) => Ok(value.clone()),
            Value::String(s) => self.scrub_string(s, depth, tally).map(Value::String),
            Value::Array(items) => {
                let depth = self.enter(depth)?;
                items
                    .iter()
                    .map(|item| self.walk(item, depth, tally))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            Value::Object(map) => {
                let depth = self.enter(depth)?;
                let mut cleaned = Map::with_capacity(map.len());
                for (key, val) in map {
                    let scrubbed = match (val, self.keys.classify(key)) {
                        (Value::String(s), Some(category)) => {
                            Value::String(redact_field(s, category, tally))
                        }
                        _ => self.walk(val, depth, tally)?,
                    };
                    cleaned.insert(key.clone(), scrubbed);
                }
                Ok(Value::Object(cleaned))
            }
        }
    }

    fn enter(&self, depth: usize) -> Result<usize, ScrubError> {
        let depth = depth + 1;
        if depth > self.max_depth {
            return Err(ScrubError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(depth)
    }

    fn scrub_string(&self, s: &str, depth: usize, tally: &mut CategoryTally) -> Result<String, ScrubError> {
        if let Some(embedded) = parse_container(s) {
            let cleaned = self.walk(&embedded, depth, tally)?;
            return serde_json::to_string(&cleaned)
                .map_err(|_| ScrubError::ScrubFailure("embedded JSON re-serialization failed".to_string()));
        }

        let result = detector::scrub(self.snapshot, s);
        tally.absorb(&result);
        Ok(result.cleaned)
    }
}

/// Parse text that holds a JSON array or object; anything else is plain text
pub(crate) fn parse_container(s: &str) -> Option<Value> {
    let trimmed = s.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    match serde_json::from_str::<Value>(s) {
        Ok(value @ (Value::Array(_) | Value::Object(_))) => Some(value),
        _ => None,
    }
}

/// Replace a whole field value with its category token
fn redact_field(s: &str, category: &PhiCategory, tally: &mut CategoryTally) -> String {
    if s.is_empty() || is_token(s) {
        return s.to_string();
    }
    tally.record(category, 1);
    category.token()
}

/// Check if `s` is exactly one redaction token
fn is_token(s: &str) -> bool {
    s.strip_prefix(TOKEN_PREFIX)
        .and_then(|rest| rest.strip_suffix(']'))
        .is_some_and(|label| {
            !label.is_empty()
                && label
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        })
}
