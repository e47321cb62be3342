//! Pattern definitions and compilation

use crate::domain::errors::ScrubError;
use crate::scrubber::models::PhiCategory;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Name of the capture group that narrows redaction to part of a match
pub const PHI_GROUP: &str = "phi";

/// Upper bound on the compiled program size of a single matcher
const MAX_PROGRAM_SIZE: usize = 1 << 20;

/// Post-match check a candidate must pass to count as a detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// Luhn (mod 10) checksum over the digits of the candidate
    Luhn,
}

impl Validator {
    /// Check a candidate substring
    pub fn accepts(&self, candidate: &str) -> bool {
        match self {
            Self::Luhn => luhn_valid(candidate),
        }
    }
}

fn luhn_valid(candidate: &str) -> bool {
    let digits: Vec<u32> = candidate.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 2 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

/// Where a pattern came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSource {
    /// Embedded default library
    BuiltIn,
    /// Operator-supplied pattern library file
    Library,
    /// Registered at runtime through the administrative path
    Custom,
}

/// Uncompiled pattern definition
#[derive(Debug, Clone, PartialEq)]
pub struct PatternSpec {
    pub name: String,
    pub category: PhiCategory,
    pub matcher: String,
    pub priority: i32,
    pub enabled: bool,
    pub validator: Option<Validator>,
}

impl PatternSpec {
    /// Create an enabled spec without a validator
    pub fn new(
        name: impl Into<String>,
        category: PhiCategory,
        matcher: impl Into<String>,
        priority: i32,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            matcher: matcher.into(),
            priority,
            enabled: true,
            validator: None,
        }
    }

    /// Attach a validator
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Set the enabled flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Compiled detection rule
#[derive(Debug, Clone)]
pub struct Pattern {
    name: String,
    category: PhiCategory,
    regex: Regex,
    token: String,
    priority: i32,
    enabled: bool,
    validator: Option<Validator>,
    source: PatternSource,
    has_phi_group: bool,
    /// Registration order, breaks priority ties
    pub(crate) seq: u64,
}

impl Pattern {
    /// Compile a spec, rejecting matchers that are invalid or unsafe
    pub(crate) fn compile(
        spec: &PatternSpec,
        source: PatternSource,
        seq: u64,
    ) -> Result<Self, ScrubError> {
        let name = spec.name.trim();
        if name.is_empty() {
            return Err(ScrubError::invalid_pattern(
                &spec.name,
                "pattern name must not be empty",
            ));
        }

        spec.category
            .validate()
            .map_err(|reason| ScrubError::invalid_pattern(name, reason))?;

        if has_nested_unbounded_quantifier(&spec.matcher) {
            return Err(ScrubError::invalid_pattern(
                name,
                "nested unbounded quantifiers are not allowed",
            ));
        }

        let regex = RegexBuilder::new(&spec.matcher)
            .size_limit(MAX_PROGRAM_SIZE)
            .build()
            .map_err(|e| ScrubError::invalid_pattern(name, e.to_string()))?;

        if regex.is_match("") {
            return Err(ScrubError::invalid_pattern(
                name,
                "pattern matches the empty string",
            ));
        }

        let has_phi_group = regex.capture_names().flatten().any(|n| n == PHI_GROUP);

        Ok(Self {
            name: name.to_string(),
            token: spec.category.token(),
            category: spec.category.clone(),
            regex,
            priority: spec.priority,
            enabled: spec.enabled,
            validator: spec.validator,
            source,
            has_phi_group,
            seq,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &PhiCategory {
        &self.category
    }

    /// Source text of the matcher
    pub fn matcher(&self) -> &str {
        self.regex.as_str()
    }

    /// Replacement token, e.g. `[REDACTED-PHONE]`
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn validator(&self) -> Option<Validator> {
        self.validator
    }

    pub fn source(&self) -> PatternSource {
        self.source
    }

    /// Copy of this pattern with a different enabled flag
    pub(crate) fn with_enabled(&self, enabled: bool) -> Self {
        Self {
            enabled,
            ..self.clone()
        }
    }

    /// Candidate spans in `text`, left to right and non-overlapping
    ///
    /// Empty spans are dropped. When the validator rejects a match the search
    /// resumes one character after that match's start, so a valid candidate
    /// overlapping a rejected one (a card number following a phone number's
    /// last digits, say) is still found.
    pub(crate) fn candidates(&self, text: &str) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut pos = 0;

        while pos <= text.len() {
            let (whole, span) = if self.has_phi_group {
                let Some(caps) = self.regex.captures_at(text, pos) else {
                    break;
                };
                let Some(whole) = caps.get(0) else {
                    break;
                };
                let span = caps.name(PHI_GROUP).map(|m| (m.start(), m.end()));
                ((whole.start(), whole.end()), span)
            } else {
                let Some(m) = self.regex.find_at(text, pos) else {
                    break;
                };
                ((m.start(), m.end()), Some((m.start(), m.end())))
            };

            if let Some((start, end)) = span {
                let rejected = self
                    .validator
                    .is_some_and(|v| !v.accepts(&text[start..end]));
                if rejected {
                    pos = next_char_boundary(text, whole.0);
                    continue;
                }
                if end > start {
                    spans.push((start, end));
                }
            }

            pos = if whole.1 > whole.0 {
                whole.1
            } else {
                next_char_boundary(text, whole.1)
            };
        }
        spans
    }
}

/// Byte offset just past the character starting at `pos`
fn next_char_boundary(text: &str, pos: usize) -> usize {
    pos + text[pos..].chars().next().map_or(1, char::len_utf8)
}

/// What the last parsed atom was, for quantifier nesting checks
#[derive(Clone, Copy, PartialEq)]
enum Atom {
    None,
    Simple,
    Group { contains_unbounded: bool },
}

/// Detect an unbounded quantifier applied to a group that itself contains an
/// unbounded quantifier, e.g. `(a+)+`, `(?:x*y)*`, `((ab)+c){2,}`.
pub(crate) fn has_nested_unbounded_quantifier(pattern: &str) -> bool {
    let chars: Vec<char> = pattern.chars().collect();
    // One flag per open group: does it contain an unbounded quantifier
    let mut groups: Vec<bool> = vec![false];
    let mut last = Atom::None;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                i += 2;
                last = Atom::Simple;
                continue;
            }
            '[' => {
                i = skip_class(&chars, i);
                last = Atom::Simple;
                continue;
            }
            '(' => {
                groups.push(false);
                last = Atom::None;
            }
            ')' => {
                let inner = groups.pop().unwrap_or(false);
                if groups.is_empty() {
                    groups.push(false);
                }
                if inner {
                    if let Some(parent) = groups.last_mut() {
                        *parent = true;
                    }
                }
                last = Atom::Group {
                    contains_unbounded: inner,
                };
            }
            '*' | '+' => {
                if last == (Atom::Group { contains_unbounded: true }) {
                    return true;
                }
                if let Some(top) = groups.last_mut() {
                    *top = true;
                }
                last = Atom::Simple;
            }
            '{' => {
                let close = chars[i..].iter().position(|&c| c == '}').map(|p| i + p);
                if let Some(close) = close {
                    let body: String = chars[i + 1..close].iter().collect();
                    let unbounded = body.ends_with(',');
                    if unbounded {
                        if last == (Atom::Group { contains_unbounded: true }) {
                            return true;
                        }
                        if let Some(top) = groups.last_mut() {
                            *top = true;
                        }
                    }
                    i = close + 1;
                    last = Atom::Simple;
                    continue;
                }
                last = Atom::Simple;
            }
            _ => last = Atom::Simple,
        }
        i += 1;
    }

    false
}

/// Index just past the character class starting at `start`
fn skip_class(chars: &[char], start: usize) -> usize {
    let mut i = start + 1;
    if chars.get(i) == Some(&'^') {
        i += 1;
    }
    // A leading `]` is a literal
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    let mut depth = 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    chars.len()
}
