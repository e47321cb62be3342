//! PHI category data model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix shared by every redaction token
pub const TOKEN_PREFIX: &str = "[REDACTED-";

/// PHI category tag attached to every pattern and every match
///
/// Serializes as its upper-case label (`"SSN"`, `"MEDICAL_RECORD_NUMBER"`, or the
/// upper-cased custom name) so category-keyed maps stay readable in JSON reports.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PhiCategory {
    /// Social Security Numbers
    Ssn,
    /// Medical Record Numbers
    MedicalRecordNumber,
    /// Dates of birth
    DateOfBirth,
    /// Telephone numbers
    Phone,
    /// Email addresses
    Email,
    /// Payment card numbers
    CreditCard,
    /// Patient names
    PatientName,
    /// Street addresses and unit numbers
    Address,
    /// Prescription (Rx) numbers
    PrescriptionNumber,
    /// Operator-defined category, stored upper-cased
    Custom(String),
}

impl PhiCategory {
    /// All built-in categories in declaration order
    pub const BUILT_IN: [PhiCategory; 9] = [
        Self::Ssn,
        Self::MedicalRecordNumber,
        Self::DateOfBirth,
        Self::Phone,
        Self::Email,
        Self::CreditCard,
        Self::PatientName,
        Self::Address,
        Self::PrescriptionNumber,
    ];

    /// Create a custom category, validating its label
    pub fn custom(name: &str) -> Result<Self, String> {
        let label = name.trim().to_uppercase();
        if label.is_empty() {
            return Err("custom category name must not be empty".to_string());
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(format!(
                "custom category '{label}' may only contain letters, digits and underscores"
            ));
        }
        if Self::BUILT_IN.iter().any(|c| c.label() == label) {
            return Err(format!("custom category '{label}' shadows a built-in category"));
        }
        Ok(Self::Custom(label))
    }

    /// Upper-case label used in tokens and reports
    pub fn label(&self) -> &str {
        match self {
            Self::Ssn => "SSN",
            Self::MedicalRecordNumber => "MEDICAL_RECORD_NUMBER",
            Self::DateOfBirth => "DATE_OF_BIRTH",
            Self::Phone => "PHONE",
            Self::Email => "EMAIL",
            Self::CreditCard => "CREDIT_CARD",
            Self::PatientName => "PATIENT_NAME",
            Self::Address => "ADDRESS",
            Self::PrescriptionNumber => "PRESCRIPTION_NUMBER",
            Self::Custom(name) => name.as_str(),
        }
    }

    /// Replacement token for this category, e.g. `[REDACTED-SSN]`
    pub fn token(&self) -> String {
        format!("{TOKEN_PREFIX}{}]", self.label())
    }

    /// Check if this is an operator-defined category
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Check that a category is well formed. Built-ins always are; a custom
    /// category built directly from the enum variant may not be.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Custom(name) => match Self::custom(name)? {
                Self::Custom(label) if label == *name => Ok(()),
                _ => Err(format!("custom category '{name}' must be upper-case")),
            },
            _ => Ok(()),
        }
    }
}

impl fmt::Display for PhiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PhiCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SSN" => Ok(Self::Ssn),
            "MEDICAL_RECORD_NUMBER" | "MRN" => Ok(Self::MedicalRecordNumber),
            "DATE_OF_BIRTH" | "DOB" => Ok(Self::DateOfBirth),
            "PHONE" => Ok(Self::Phone),
            "EMAIL" => Ok(Self::Email),
            "CREDIT_CARD" => Ok(Self::CreditCard),
            "PATIENT_NAME" | "NAME" => Ok(Self::PatientName),
            "ADDRESS" => Ok(Self::Address),
            "PRESCRIPTION_NUMBER" | "RX" => Ok(Self::PrescriptionNumber),
            _ => Self::custom(s),
        }
    }
}

impl TryFrom<String> for PhiCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PhiCategory> for String {
    fn from(category: PhiCategory) -> Self {
        category.label().to_string()
    }
}
