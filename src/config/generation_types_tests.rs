//! Tests for generation_types

use super::*;
use crate::config::Config;
use proptest::prelude::*;

#[test]
fn test_defaults() {
    let config = GenerationConfig::default();
    assert!(!config.is_configured());
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.backoff_base_ms, 2000);
    assert!(!config.force_web);
    assert_eq!(config.retry_policy(), RetryPolicy::default());
}

#[test]
fn test_blank_endpoint_is_not_configured() {
    let config: Config = toml::from_str(
        r#"
[generation]
endpoint = "   "
"#,
    )
    .unwrap();
    assert!(!config.generation.is_configured());
    assert_eq!(config.generation.endpoint(), None);
}

#[test]
fn test_session_id_falls_back_to_uuid() {
    let config = GenerationConfig::default();
    let first = config.session_id();
    let second = config.session_id();
    assert_eq!(first.len(), 36);
    assert_ne!(first, second);

    let fixed = GenerationConfig {
        session_id: Some("paper-session".to_string()),
        ..GenerationConfig::default()
    };
    assert_eq!(fixed.session_id(), "paper-session");
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config: Config = toml::from_str(
        r#"
[generation]
endpoint = "http://localhost:3000/api/chat"
force_web = true
"#,
    )
    .unwrap();
    assert_eq!(
        config.generation.endpoint(),
        Some("http://localhost:3000/api/chat")
    );
    assert!(config.generation.force_web);
    assert_eq!(config.generation.max_retries, 3);
}

// **Feature: config, Property: retry settings round into the policy**
// *For any* retry count and base delay in the config file, the resulting
// policy uses exactly those values.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_retry_settings_parse(max_retries in 0u32..10, backoff_base_ms in 1u64..10_000) {
        let toml_content = format!(r#"
[generation]
max_retries = {}
backoff_base_ms = {}
"#, max_retries, backoff_base_ms);

        let config: Config = toml::from_str(&toml_content).unwrap();
        let policy = config.generation.retry_policy();

        prop_assert_eq!(policy.max_retries, max_retries);
        prop_assert_eq!(policy.base_delay, Duration::from_millis(backoff_base_ms));
    }
}
