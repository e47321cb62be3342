//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod check;
pub mod init;
pub mod scrub;
pub mod summarize;
pub mod validate;

use super::EXIT_CONFIG_ERROR;
use crate::config::PhiGuardConfig;
use crate::scrubber::PhiScrubber;
use tokio::io::AsyncReadExt;

/// Build the scrubber for a command, printing the failure and returning the
/// configuration exit code when patterns or settings are rejected
pub(crate) fn build_scrubber(config: &PhiGuardConfig) -> Result<PhiScrubber, i32> {
    PhiScrubber::new(&config.scrubber).map_err(|e| {
        tracing::error!(error = %e, "Failed to build PHI scrubber");
        eprintln!("❌ Failed to initialize scrubber");
        eprintln!("   Error: {e}");
        EXIT_CONFIG_ERROR
    })
}

/// Use the argument when given, otherwise read all of stdin
pub(crate) async fn read_input(text: Option<&str>) -> anyhow::Result<String> {
    match text {
        Some(text) => Ok(text.to_string()),
        None => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            Ok(input)
        }
    }
}

/// One `LABEL: count` line per category, for stderr reports
pub(crate) fn format_counts<'a, I>(counts: I) -> String
where
    I: IntoIterator<Item = (&'a crate::scrubber::PhiCategory, &'a usize)>,
{
    counts
        .into_iter()
        .map(|(category, count)| format!("  {category}: {count}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrubber::PhiCategory;
    use std::collections::BTreeMap;

    #[test]
    fn test_format_counts() {
        let mut counts = BTreeMap::new();
        counts.insert(PhiCategory::Ssn, 2);
        counts.insert(PhiCategory::Email, 1);
        let text = format_counts(&counts);
        assert!(text.contains("  SSN: 2"));
        assert!(text.contains("  EMAIL: 1"));
    }

    #[test]
    fn test_build_scrubber_rejects_bad_pattern() {
        let toml = r#"
[[scrubber.custom_patterns]]
name = "broken"
category = "BROKEN"
pattern = '(a+)+'
"#;
        let config: PhiGuardConfig = toml::from_str(toml).unwrap();
        assert_eq!(build_scrubber(&config).err(), Some(EXIT_CONFIG_ERROR));
    }

    #[tokio::test]
    async fn test_read_input_prefers_argument() {
        let input = read_input(Some("hello")).await.unwrap();
        assert_eq!(input, "hello");
    }
}
