//! Tests for error classification

use super::*;
use proptest::prelude::*;

fn api(code: u16, message: &str) -> AiError {
    AiError::Api {
        code,
        message: message.to_string(),
    }
}

#[test]
fn test_network_errors_are_transient() {
    assert_eq!(
        AiError::Network("connection reset".to_string()).class(),
        ErrorClass::Transient
    );
}

#[test]
fn test_overloaded_and_rate_limit_are_transient() {
    assert_eq!(api(500, "Model is overloaded").class(), ErrorClass::Transient);
    assert_eq!(api(400, "Rate limit exceeded").class(), ErrorClass::Transient);
    assert_eq!(api(429, "slow down").class(), ErrorClass::Transient);
    assert_eq!(api(529, "").class(), ErrorClass::Transient);
}

#[test]
fn test_quota_beats_transient_markers() {
    assert_eq!(
        api(429, "Rate limit: insufficient credits").class(),
        ErrorClass::Quota
    );
    assert_eq!(api(402, "Payment required").class(), ErrorClass::Quota);
    assert_eq!(api(403, "Monthly quota exceeded").class(), ErrorClass::Quota);
}

#[test]
fn test_malformed_request_is_fatal() {
    assert_eq!(api(400, "Invalid JSON body").class(), ErrorClass::Fatal);
    assert_eq!(AiError::Parse("bad".to_string()).class(), ErrorClass::Fatal);
    assert_eq!(AiError::EmptyResponse.class(), ErrorClass::Fatal);
    assert_eq!(AiError::Cancelled.class(), ErrorClass::Fatal);
}

#[test]
fn test_retries_exhausted_keeps_last_class() {
    let error = AiError::RetriesExhausted {
        attempts: 4,
        last: Box::new(api(503, "unavailable")),
    };
    assert!(error.is_transient());
    assert!(error.to_string().contains("after 4 attempts"));
}

#[test]
fn test_user_messages_are_distinguishable() {
    let exhausted = AiError::RetriesExhausted {
        attempts: 4,
        last: Box::new(api(503, "overloaded")),
    }
    .user_message();
    let quota = api(402, "credit balance too low").user_message();
    let empty = AiError::EmptyResponse.user_message();

    assert!(exhausted.contains("busy"));
    assert!(quota.contains("quota"));
    assert!(empty.contains("No content"));
    assert_ne!(exhausted, quota);
}

// **Feature: generation, Property: quota failures are never retried**
// *For any* message mentioning quota or credits, the error is classified as
// Quota regardless of status code.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_quota_never_transient(
        code in 400u16..600,
        prefix in "[a-z ]{0,10}",
        marker in prop::sample::select(vec!["quota", "Credit", "INSUFFICIENT"]),
    ) {
        let error = api(code, &format!("{}{}", prefix, marker));
        prop_assert_eq!(error.class(), ErrorClass::Quota);
        prop_assert!(!error.is_transient());
    }
}
