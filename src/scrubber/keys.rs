//! Sensitive field-name rules
//!
//! A string stored under a key such as `ssn` or `patientName` is redacted as a
//! whole, whatever its content. Keys are compared as sequences of lower-case
//! words so that `home_phone` and `homePhone` match the `phone` rule while
//! `filename` does not match `name`.

use crate::scrubber::models::PhiCategory;
use serde::{Deserialize, Serialize};

/// One configured field-name rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitiveKeyRule {
    /// Field name term, e.g. `date_of_birth`
    pub key: String,
    /// Category whose token replaces the value
    pub category: PhiCategory,
}

impl SensitiveKeyRule {
    pub fn new(key: impl Into<String>, category: PhiCategory) -> Self {
        Self {
            key: key.into(),
            category,
        }
    }
}

/// Default rules, first match wins
pub fn default_rules() -> Vec<SensitiveKeyRule> {
    let insurance = PhiCategory::Custom("INSURANCE_ID".to_string());
    let table: [(&str, PhiCategory); 27] = [
        ("ssn", PhiCategory::Ssn),
        ("social_security", PhiCategory::Ssn),
        ("mrn", PhiCategory::MedicalRecordNumber),
        ("medical_record", PhiCategory::MedicalRecordNumber),
        ("dob", PhiCategory::DateOfBirth),
        ("date_of_birth", PhiCategory::DateOfBirth),
        ("birth_date", PhiCategory::DateOfBirth),
        ("birthdate", PhiCategory::DateOfBirth),
        ("email", PhiCategory::Email),
        ("phone", PhiCategory::Phone),
        ("mobile", PhiCategory::Phone),
        ("cell", PhiCategory::Phone),
        ("fax", PhiCategory::Phone),
        ("credit_card", PhiCategory::CreditCard),
        ("card_number", PhiCategory::CreditCard),
        ("address", PhiCategory::Address),
        ("street", PhiCategory::Address),
        ("city", PhiCategory::Address),
        ("zip", PhiCategory::Address),
        ("postal", PhiCategory::Address),
        ("prescription", PhiCategory::PrescriptionNumber),
        ("rx_number", PhiCategory::PrescriptionNumber),
        ("insurance_id", insurance.clone()),
        ("member_id", insurance.clone()),
        ("policy_number", insurance),
        ("name", PhiCategory::PatientName),
        ("patient_name", PhiCategory::PatientName),
    ];

    table
        .into_iter()
        .map(|(key, category)| SensitiveKeyRule::new(key, category))
        .collect()
}

/// Split a field name into lower-case words
///
/// Splits on `_`, `-`, `.`, whitespace and other punctuation, and on camelCase
/// boundaries (`homePhone` -> `home`, `phone`; `SSNValue` -> `ssn`, `value`).
pub fn tokenize_key(key: &str) -> Vec<String> {
    let chars: Vec<char> = key.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }

        current.extend(c.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Compiled rule list
#[derive(Debug, Clone, Default)]
pub struct KeyMatcher {
    rules: Vec<(Vec<String>, PhiCategory)>,
}

impl KeyMatcher {
    pub fn new(rules: &[SensitiveKeyRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| (tokenize_key(&rule.key), rule.category.clone()))
            .filter(|(terms, _)| !terms.is_empty())
            .collect();
        Self { rules }
    }

    /// Matcher that never classifies a key
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Category of the first rule whose terms appear contiguously in `key`
    pub fn classify(&self, key: &str) -> Option<&PhiCategory> {
        if self.rules.is_empty() {
            return None;
        }

        let words = tokenize_key(key);
        self.rules
            .iter()
            .find(|(terms, _)| words.windows(terms.len()).any(|w| w == terms.as_slice()))
            .map(|(_, category)| category)
    }
}
