//! Property tests for the scrubbing engine

use phi_guard::scrubber::{PhiScrubber, ScrubberConfig};
use proptest::prelude::*;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static SCRUBBER: LazyLock<PhiScrubber> = LazyLock::new(|| {
    PhiScrubber::new(&ScrubberConfig::default()).expect("Failed to create scrubber")
});

/// PHI-bearing fragments and the secret each one carries
const SAMPLES: [(&str, &str); 16] = [
    ("SSN 123-45-6789", "123-45-6789"),
    ("MRN: 884213", "884213"),
    ("DOB: 03/14/1962", "03/14/1962"),
    ("call 555-867-5309", "867-5309"),
    ("jane.roe@example.org", "jane.roe@example.org"),
    ("card 4111 1111 1111 1111", "4111 1111 1111 1111"),
    ("Patient Maria Lopez", "Maria Lopez"),
    ("742 Evergreen Terrace", "742 Evergreen"),
    ("Rx: 4829113", "4829113"),
    ("(555) 123-4567", "123-4567"),
    ("born on 1990-06-30", "1990-06-30"),
    ("5500 0000 0000 0004", "5500 0000 0000 0004"),
    ("Apt 12B", "12B"),
    ("MR# 987654321", "987654321"),
    ("ssn 123 45 6789", "123 45 6789"),
    ("123456789", "123456789"),
];

const SEPARATORS: [&str; 4] = [" ", ", ", "\n", "; "];

#[derive(Debug, Clone)]
enum Fragment {
    Phi(usize),
    Filler(String),
}

fn fragment() -> impl Strategy<Value = Fragment> {
    prop_oneof![
        (0..SAMPLES.len()).prop_map(Fragment::Phi),
        "[a-z]{1,8}".prop_map(Fragment::Filler),
    ]
}

/// Log-like text mixing PHI samples with filler words
fn phi_text() -> impl Strategy<Value = (String, Vec<&'static str>)> {
    prop::collection::vec((fragment(), 0..SEPARATORS.len()), 0..8).prop_map(|parts| {
        let mut text = String::new();
        let mut secrets = Vec::new();
        for (fragment, sep) in parts {
            match fragment {
                Fragment::Phi(i) => {
                    text.push_str(SAMPLES[i].0);
                    secrets.push(SAMPLES[i].1);
                }
                Fragment::Filler(word) => text.push_str(&word),
            }
            text.push_str(SEPARATORS[sep]);
        }
        (text, secrets)
    })
}

/// Samples glued together with no separator or a bare dot
fn glued_text() -> impl Strategy<Value = String> {
    prop::collection::vec((0..SAMPLES.len(), any::<bool>()), 1..6).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(i, dot)| format!("{}{}", SAMPLES[i].0, if dot { "." } else { "" }))
            .collect()
    })
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (0i64..1000).prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::String),
        (0..SAMPLES.len()).prop_map(|i| Value::String(SAMPLES[i].0.to_string())),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Same containers, same keys, same non-string scalars
fn same_shape(before: &Value, after: &Value) -> bool {
    match (before, after) {
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|w| same_shape(v, w)))
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(v, w)| same_shape(v, w))
        }
        (Value::String(_), Value::String(_)) => true,
        (a, b) => a == b,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn scrubbed_text_never_contains_phi((text, secrets) in phi_text()) {
        let cleaned = SCRUBBER.scrub_text(&text);
        for secret in secrets {
            prop_assert!(
                !cleaned.contains(secret),
                "secret {:?} survived in {:?}",
                secret,
                cleaned
            );
        }
    }

    #[test]
    fn scrubbing_is_idempotent((text, _) in phi_text()) {
        let once = SCRUBBER.scrub_text(&text);
        let twice = SCRUBBER.scrub(&once);
        prop_assert_eq!(&twice.cleaned, &once);
        prop_assert!(!twice.has_detections());
    }

    #[test]
    fn scrubbing_is_idempotent_on_noise(text in "[a-cX-Z0-9 @.:#()/\n-]{0,80}") {
        let once = SCRUBBER.scrub_text(&text);
        prop_assert_eq!(SCRUBBER.scrub_text(&once), once);
    }

    #[test]
    fn scrubbing_is_idempotent_on_glued_samples(text in glued_text()) {
        let once = SCRUBBER.scrub_text(&text);
        let twice = SCRUBBER.scrub(&once);
        prop_assert_eq!(&twice.cleaned, &once);
        prop_assert!(!twice.has_detections());
    }

    #[test]
    fn detection_counts_match_tokens((text, _) in phi_text()) {
        let result = SCRUBBER.scrub(&text);
        let tokens = result.cleaned.matches("[REDACTED-").count()
            - text.matches("[REDACTED-").count();
        prop_assert_eq!(result.total_matches(), tokens);
        if result.has_detections() {
            prop_assert!(SCRUBBER.has_phi(&text));
        }
    }

    #[test]
    fn structured_scrub_preserves_shape(value in json_value()) {
        let cleaned = SCRUBBER.scrub_value(&value).unwrap();
        prop_assert!(same_shape(&value, &cleaned), "{} became {}", value, cleaned);
    }

    #[test]
    fn structured_scrub_never_leaks(value in json_value()) {
        let cleaned = SCRUBBER.scrub_value(&value).unwrap().to_string();
        for (sample, secret) in SAMPLES {
            if value.to_string().contains(sample) {
                prop_assert!(!cleaned.contains(secret), "{:?} survived in {}", secret, cleaned);
            }
        }
    }
}
