//! Detection and redaction over a single string
//!
//! Patterns run in ascending priority against the original text. Each accepted
//! candidate claims its span. Later patterns only search the gaps between
//! claimed spans, with each gap edge read as a text boundary, the same way a
//! redaction token bounds it when the output is scrubbed again. The output is
//! rebuilt left to right, replacing every claimed span with its category token.

use crate::scrubber::models::{CategoryTally, Match, ScrubResult};
use crate::scrubber::registry::RegistrySnapshot;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;

/// Redaction tokens already present in the input
static EXISTING_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\[REDACTED-[A-Z0-9_]+\]").ok());

/// Disjoint spans claimed so far, sorted by start
#[derive(Debug, Default)]
struct ClaimedSpans {
    spans: Vec<Range<usize>>,
}

impl ClaimedSpans {
    /// Unclaimed stretches of a text `len` bytes long, in order
    fn gaps(&self, len: usize) -> Vec<Range<usize>> {
        let mut gaps = Vec::with_capacity(self.spans.len() + 1);
        let mut cursor = 0;
        for span in &self.spans {
            if span.start > cursor {
                gaps.push(cursor..span.start);
            }
            cursor = cursor.max(span.end);
        }
        if cursor < len {
            gaps.push(cursor..len);
        }
        gaps
    }

    fn claim(&mut self, start: usize, end: usize) {
        let idx = self.spans.partition_point(|s| s.start < start);
        self.spans.insert(idx, start..end);
    }
}

/// Scrub one string against a snapshot
pub fn scrub(snapshot: &RegistrySnapshot, text: &str) -> ScrubResult<String> {
    if text.is_empty() {
        return ScrubResult::clean(String::new());
    }

    if !snapshot.may_match(text) {
        return ScrubResult::clean(text.to_string());
    }

    let mut matches = detect(snapshot, text);
    let cleaned = redact(snapshot, text, &mut matches);

    let mut tally = CategoryTally::default();
    for m in &matches {
        tally.record(&m.category, 1);
    }
    tally.finish(cleaned)
}

/// Accepted matches, in acceptance order
fn detect(snapshot: &RegistrySnapshot, text: &str) -> Vec<Match> {
    let mut claimed = ClaimedSpans::default();
    if let Some(existing) = EXISTING_TOKEN.as_ref() {
        for m in existing.find_iter(text) {
            claimed.claim(m.start(), m.end());
        }
    }

    // Prefilter hits per gap; a gap is only rescanned once it has been split
    let mut gap_hits: HashMap<Range<usize>, Vec<usize>> = HashMap::new();
    let mut matches = Vec::new();
    for &pattern_index in snapshot.enabled_indices() {
        let pattern = &snapshot.patterns()[pattern_index];
        for gap in claimed.gaps(text.len()) {
            let hits = gap_hits
                .entry(gap.clone())
                .or_insert_with(|| snapshot.candidate_patterns(&text[gap.clone()]));
            if hits.binary_search(&pattern_index).is_err() {
                continue;
            }
            for (start, end) in pattern.candidates(&text[gap.clone()]) {
                let (start, end) = (gap.start + start, gap.start + end);
                claimed.claim(start, end);
                matches.push(Match {
                    pattern_index,
                    category: pattern.category().clone(),
                    start,
                    end,
                    replaced: false,
                });
            }
        }
    }
    matches
}

/// Rebuild `text` with every match replaced, leaving matches sorted by offset
fn redact(snapshot: &RegistrySnapshot, text: &str, matches: &mut [Match]) -> String {
    matches.sort_by_key(|m| m.start);

    let mut cleaned = String::with_capacity(text.len());
    let mut cursor = 0;
    for m in matches.iter_mut() {
        cleaned.push_str(&text[cursor..m.start]);
        cleaned.push_str(snapshot.patterns()[m.pattern_index].token());
        cursor = m.end;
        m.replaced = true;
    }
    cleaned.push_str(&text[cursor..]);

    debug_assert!(matches.iter().all(|m| m.replaced));
    cleaned
}
