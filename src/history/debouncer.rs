//! Debouncer for history snapshots
//!
//! Delays snapshotting until typing settles so one burst of keystrokes ends up
//! as a single history entry.

use std::time::{Duration, Instant};

/// Default debounce delay in milliseconds
pub const DEFAULT_HISTORY_DEBOUNCE_MS: u64 = 300;

/// Tracks when the last change arrived and whether a snapshot is pending.
#[derive(Debug)]
pub struct HistoryDebouncer {
    delay: Duration,
    last_change: Option<Instant>,
    pending: bool,
}

impl HistoryDebouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_change: None,
            pending: false,
        }
    }

    /// Record a change; repeated calls keep pushing the deadline back.
    pub fn schedule(&mut self) {
        self.schedule_at(Instant::now());
    }

    pub fn schedule_at(&mut self, now: Instant) {
        self.last_change = Some(now);
        self.pending = true;
    }

    /// Drop the pending snapshot without taking it.
    pub fn cancel(&mut self) {
        self.pending = false;
        self.last_change = None;
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready_at(Instant::now())
    }

    /// True once a snapshot is pending and the delay has elapsed since the last change.
    pub fn is_ready_at(&self, now: Instant) -> bool {
        if !self.pending {
            return false;
        }

        match self.last_change {
            Some(last) => now.saturating_duration_since(last) >= self.delay,
            None => false,
        }
    }

    pub fn mark_complete(&mut self) {
        self.pending = false;
        self.last_change = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for HistoryDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEBOUNCE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_debouncer() {
        let debouncer = HistoryDebouncer::new(300);
        assert_eq!(debouncer.delay(), Duration::from_millis(300));
        assert!(!debouncer.has_pending());
        assert!(!debouncer.is_ready());
    }

    #[test]
    fn test_not_ready_immediately() {
        let mut debouncer = HistoryDebouncer::new(300);
        let now = Instant::now();
        debouncer.schedule_at(now);
        assert!(debouncer.has_pending());
        assert!(!debouncer.is_ready_at(now));
    }

    #[test]
    fn test_ready_after_delay() {
        let mut debouncer = HistoryDebouncer::new(300);
        let now = Instant::now();
        debouncer.schedule_at(now);
        assert!(debouncer.is_ready_at(now + Duration::from_millis(300)));
    }

    #[test]
    fn test_cancel_clears_pending() {
        let mut debouncer = HistoryDebouncer::new(0);
        debouncer.schedule();
        debouncer.cancel();
        assert!(!debouncer.has_pending());
        assert!(!debouncer.is_ready());
    }

    #[test]
    fn test_mark_complete_clears_pending() {
        let mut debouncer = HistoryDebouncer::new(0);
        debouncer.schedule();
        assert!(debouncer.is_ready());
        debouncer.mark_complete();
        assert!(!debouncer.is_ready());
    }

    #[test]
    fn test_default_delay() {
        assert_eq!(
            HistoryDebouncer::default().delay(),
            Duration::from_millis(DEFAULT_HISTORY_DEBOUNCE_MS)
        );
    }

    // **Feature: editor-history, Property: burst of changes coalesces**
    // *For any* burst of changes spaced closer than the delay, the debouncer
    // only becomes ready one full delay after the last change.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_burst_coalesces(
            gaps in prop::collection::vec(0u64..299, 1..20),
            delay_ms in 300u64..1000
        ) {
            let mut debouncer = HistoryDebouncer::new(delay_ms);
            let start = Instant::now();
            let mut at = start;

            for gap in gaps {
                at += Duration::from_millis(gap);
                prop_assert!(!debouncer.is_ready_at(at));
                debouncer.schedule_at(at);
            }

            prop_assert!(!debouncer.is_ready_at(at + Duration::from_millis(delay_ms - 1)));
            prop_assert!(debouncer.is_ready_at(at + Duration::from_millis(delay_ms)));
        }
    }
}
