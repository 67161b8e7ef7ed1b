//! Tests for retry with backoff

use std::cell::Cell;

use super::*;
use proptest::prelude::*;

fn overloaded() -> AiError {
    AiError::Api {
        code: 529,
        message: "Overloaded".to_string(),
    }
}

#[test]
fn test_delays_double() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.delay_for(0), Duration::from_secs(2));
    assert_eq!(policy.delay_for(1), Duration::from_secs(4));
    assert_eq!(policy.delay_for(2), Duration::from_secs(8));
    assert_eq!(policy.max_attempts(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_success_on_first_attempt() {
    let calls = Cell::new(0);
    let result = RetryPolicy::default()
        .run(&CancellationToken::new(), |_| {
            calls.set(calls.get() + 1);
            async { Ok::<_, AiError>("done") }
        })
        .await;

    assert_eq!(result, Ok("done"));
    assert_eq!(calls.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_transient_then_success() {
    let calls = Cell::new(0);
    let start = tokio::time::Instant::now();

    let result = RetryPolicy::default()
        .run(&CancellationToken::new(), |attempt| {
            calls.set(calls.get() + 1);
            async move {
                if attempt < 2 {
                    Err(overloaded())
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

    assert_eq!(result, Ok(2));
    assert_eq!(calls.get(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_always_transient_gives_up_after_max_attempts() {
    let calls = Cell::new(0);
    let start = tokio::time::Instant::now();

    let result: Result<(), AiError> = RetryPolicy::default()
        .run(&CancellationToken::new(), |_| {
            calls.set(calls.get() + 1);
            async { Err(AiError::Network("connection refused".to_string())) }
        })
        .await;

    assert_eq!(calls.get(), 4);
    assert_eq!(start.elapsed(), Duration::from_secs(14));
    match result {
        Err(AiError::RetriesExhausted { attempts, last }) => {
            assert_eq!(attempts, 4);
            assert!(matches!(*last, AiError::Network(_)));
        }
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_quota_failure_is_not_retried() {
    let calls = Cell::new(0);
    let result: Result<(), AiError> = RetryPolicy::default()
        .run(&CancellationToken::new(), |_| {
            calls.set(calls.get() + 1);
            async {
                Err(AiError::Api {
                    code: 402,
                    message: "Insufficient credits".to_string(),
                })
            }
        })
        .await;

    assert_eq!(calls.get(), 1);
    assert!(matches!(result, Err(AiError::Api { code: 402, .. })));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_backoff() {
    let cancel = CancellationToken::new();
    let calls = Cell::new(0);

    let result: Result<(), AiError> = RetryPolicy::default()
        .run(&cancel, |_| {
            calls.set(calls.get() + 1);
            cancel.cancel();
            async { Err(overloaded()) }
        })
        .await;

    assert_eq!(result, Err(AiError::Cancelled));
    assert_eq!(calls.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pre_cancelled_makes_no_attempt() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let calls = Cell::new(0);

    let result: Result<(), AiError> = RetryPolicy::default()
        .run(&cancel, |_| {
            calls.set(calls.get() + 1);
            async { Ok(()) }
        })
        .await;

    assert_eq!(result, Err(AiError::Cancelled));
    assert_eq!(calls.get(), 0);
}

// **Feature: generation, Property: retry bound**
// *For any* retry budget, an operation that always fails transiently is
// attempted exactly max_retries + 1 times.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn prop_retry_bound(max_retries in 0u32..6) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .start_paused(true)
            .build()
            .expect("Failed to create tokio runtime");

        let calls = Cell::new(0u32);
        let policy = RetryPolicy::new(max_retries, Duration::from_millis(10));
        let result: Result<(), AiError> = rt.block_on(policy.run(&CancellationToken::new(), |_| {
            calls.set(calls.get() + 1);
            async { Err(overloaded()) }
        }));

        prop_assert_eq!(calls.get(), max_retries + 1);
        let is_exhausted = matches!(result, Err(AiError::RetriesExhausted { .. }));
        prop_assert!(is_exhausted);
    }
}
