//! Edge case tests for the scrubbing engine

use phi_guard::domain::ScrubError;
use phi_guard::scrubber::{PhiCategory, PhiScrubber, ScrubberConfig, SensitiveKeyRule};
use serde_json::{json, Value};

fn scrubber() -> PhiScrubber {
    PhiScrubber::new(&ScrubberConfig::default()).expect("Failed to create scrubber")
}

/// `depth` arrays nested around a single string leaf
fn nested_arrays(depth: usize, leaf: &str) -> Value {
    let mut value = json!(leaf);
    for _ in 0..depth {
        value = json!([value]);
    }
    value
}

#[test]
fn test_empty_string() {
    let result = scrubber().scrub("");
    assert_eq!(result.cleaned, "");
    assert!(!result.has_detections());
    assert!(result.categories.is_empty());
}

#[test]
fn test_empty_structures() {
    let scrubber = scrubber();
    assert_eq!(scrubber.scrub_value(&json!({})).unwrap(), json!({}));
    assert_eq!(scrubber.scrub_value(&json!([])).unwrap(), json!([]));
    assert_eq!(scrubber.scrub_value(&json!("")).unwrap(), json!(""));
}

#[test]
fn test_scalars_pass_through() {
    let scrubber = scrubber();
    for value in [json!(null), json!(true), json!(123456789), json!(5.5)] {
        assert_eq!(scrubber.scrub_value(&value).unwrap(), value);
    }
}

#[test]
fn test_numbers_under_sensitive_keys_are_kept() {
    let input = json!({"ssn": 123456789, "phone": null, "name": {"first": "Ann"}});
    let cleaned = scrubber().scrub_value(&input).unwrap();

    assert_eq!(cleaned["ssn"], 123456789);
    assert_eq!(cleaned["phone"], Value::Null);
    assert_eq!(cleaned["name"]["first"], "Ann");
}

#[test]
fn test_unicode_text_around_phi() {
    let result = scrubber().scrub("Ünïcödé 123-45-6789 ✓");
    assert_eq!(result.cleaned, "Ünïcödé [REDACTED-SSN] ✓");
}

#[test]
fn test_very_long_string() {
    let filler = "lorem ipsum dolor sit amet ".repeat(4_000);
    let text = format!("{filler}SSN 123-45-6789 {filler}");

    let result = scrubber().scrub(&text);
    assert_eq!(result.count(&PhiCategory::Ssn), 1);
    assert!(!result.cleaned.contains("123-45-6789"));
    assert_eq!(
        result.cleaned.len(),
        text.len() - "123-45-6789".len() + "[REDACTED-SSN]".len()
    );
}

#[test]
fn test_existing_tokens_are_not_rescanned() {
    let result = scrubber().scrub("[REDACTED-SSN] and 123-45-6789");
    assert_eq!(result.cleaned, "[REDACTED-SSN] and [REDACTED-SSN]");
    assert_eq!(result.count(&PhiCategory::Ssn), 1);
}

#[test]
fn test_rescrubbing_is_stable() {
    let scrubber = scrubber();
    let once = scrubber.scrub_text(
        "Patient John Doe, SSN: 123-45-6789, MRN: 00123456, DOB: 01/15/1980",
    );
    let twice = scrubber.scrub(&once);

    assert_eq!(twice.cleaned, once);
    assert!(!twice.has_detections());
}

#[test]
fn test_non_luhn_card_number_is_left_alone() {
    let text = "The order 1234567890123456 shipped";
    assert_eq!(scrubber().scrub_text(text), text);
}

#[test]
fn test_card_after_phone_digits() {
    let result = scrubber().scrub("Contact 555-123-4567 5500 0000 0000 0004");
    assert_eq!(
        result.cleaned,
        "Contact [REDACTED-PHONE] [REDACTED-CREDIT_CARD]"
    );
}

#[test]
fn test_email_glued_to_card_number() {
    let scrubber = scrubber();
    let result = scrubber.scrub("4111111111111111.john@x.com");
    assert_eq!(result.cleaned, "[REDACTED-CREDIT_CARD].[REDACTED-EMAIL]");
    assert_eq!(
        result.categories,
        vec![PhiCategory::CreditCard, PhiCategory::Email]
    );
    assert_eq!(scrubber.scrub_text(&result.cleaned), result.cleaned);
}

#[test]
fn test_categories_in_text_order() {
    let result = scrubber().scrub("Call 555-123-4567 about SSN 123-45-6789 or 555-987-6543");
    assert_eq!(result.categories, vec![PhiCategory::Phone, PhiCategory::Ssn]);
    assert_eq!(result.count(&PhiCategory::Phone), 2);
}

#[test]
fn test_mrn_claims_digits_before_bare_ssn() {
    let result = scrubber().scrub("Lookup MRN: 12345678 for 123456789");
    assert_eq!(
        result.cleaned,
        "Lookup MRN: [REDACTED-MEDICAL_RECORD_NUMBER] for [REDACTED-SSN]"
    );
}

#[test]
fn test_malformed_json_leaf_is_text() {
    let input = json!({"payload": "{\"ssn\": \"123-45-6789\""});
    let cleaned = scrubber().scrub_value(&input).unwrap();
    assert_eq!(cleaned["payload"], "{\"ssn\": \"[REDACTED-SSN]\"");
}

#[test]
fn test_json_scalar_text_is_scrubbed_as_text() {
    let scrubber = scrubber();
    assert_eq!(scrubber.scrub_json("\"123-45-6789\""), "\"[REDACTED-SSN]\"");
    assert_eq!(scrubber.scrub_json("not json 123-45-6789"), "not json [REDACTED-SSN]");
}

#[test]
fn test_depth_limit_boundary() {
    let scrubber = scrubber().with_max_depth(3);

    let at_limit = nested_arrays(3, "123-45-6789");
    let cleaned = scrubber.scrub_value(&at_limit).unwrap();
    assert_eq!(cleaned, nested_arrays(3, "[REDACTED-SSN]"));

    let over_limit = nested_arrays(4, "123-45-6789");
    assert_eq!(
        scrubber.scrub_value(&over_limit),
        Err(ScrubError::DepthExceeded { limit: 3 })
    );
}

#[test]
fn test_embedded_json_counts_towards_depth() {
    let scrubber = scrubber().with_max_depth(2);
    let inner = serde_json::to_string(&json!([["123-45-6789"]])).unwrap();

    assert_eq!(
        scrubber.scrub_value(&json!([inner])),
        Err(ScrubError::DepthExceeded { limit: 2 })
    );
}

#[test]
fn test_scrub_json_falls_back_on_depth() {
    let scrubber = scrubber().with_max_depth(1);
    let output = scrubber.scrub_json(r#"[["SSN 123-45-6789"]]"#);
    assert_eq!(output, r#"[["SSN [REDACTED-SSN]"]]"#);
}

#[test]
fn test_field_redaction_can_be_disabled() {
    let config = ScrubberConfig {
        field_redaction: false,
        ..Default::default()
    };
    let scrubber = PhiScrubber::new(&config).unwrap();

    let cleaned = scrubber
        .scrub_value(&json!({"name": "John Doe", "ssn": "123-45-6789"}))
        .unwrap();
    assert_eq!(cleaned["name"], "John Doe");
    assert_eq!(cleaned["ssn"], "[REDACTED-SSN]");
}

#[test]
fn test_custom_sensitive_keys() {
    let scrubber = scrubber().with_sensitive_keys(&[SensitiveKeyRule::new(
        "guardian",
        PhiCategory::PatientName,
    )]);

    let cleaned = scrubber
        .scrub_value(&json!({"guardianName": "Ann Lee", "filename": "report.pdf"}))
        .unwrap();
    assert_eq!(cleaned["guardianName"], "[REDACTED-PATIENT_NAME]");
    assert_eq!(cleaned["filename"], "report.pdf");
}

#[test]
fn test_sensitive_key_matching_uses_word_tokens() {
    let cleaned = scrubber()
        .scrub_value(&json!({
            "homePhone": "call me",
            "patient-name": "JD",
            "filename": "notes.txt",
            "rename_count": "3"
        }))
        .unwrap();

    assert_eq!(cleaned["homePhone"], "[REDACTED-PHONE]");
    assert_eq!(cleaned["patient-name"], "[REDACTED-PATIENT_NAME]");
    assert_eq!(cleaned["filename"], "notes.txt");
    assert_eq!(cleaned["rename_count"], "3");
}

#[test]
fn test_already_redacted_field_not_recounted() {
    let result = scrubber()
        .scrub_value_detailed(&json!({"ssn": "[REDACTED-SSN]", "email": ""}))
        .unwrap();
    assert_eq!(result.cleaned["ssn"], "[REDACTED-SSN]");
    assert_eq!(result.cleaned["email"], "");
    assert!(!result.has_detections());
}
