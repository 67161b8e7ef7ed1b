//! Tests for notification_state

use super::*;
use std::thread;

#[test]
fn test_info_notification() {
    let notif = Notification::new("Suggestion accepted");
    assert_eq!(notif.message, "Suggestion accepted");
    assert_eq!(notif.notification_type, NotificationType::Info);
    assert_eq!(notif.duration, Some(Duration::from_millis(1500)));
    assert!(!notif.is_expired());
}

#[test]
fn test_warning_notification() {
    let notif = Notification::with_type("Still streaming", NotificationType::Warning);
    assert_eq!(notif.notification_type, NotificationType::Warning);
    assert_eq!(notif.duration, Some(Duration::from_secs(10)));
}

#[test]
fn test_error_notification_is_permanent() {
    let mut state = NotificationState::new();
    state.show_error("Generation failed");

    let notif = state.current().unwrap();
    assert_eq!(notif.notification_type, NotificationType::Error);
    assert_eq!(notif.duration, None);
    assert!(!state.clear_if_expired());
    assert!(state.current().is_some());

    state.dismiss();
    assert!(state.current().is_none());
}

#[test]
fn test_clear_if_expired() {
    let mut state = NotificationState::new();
    state.show("Saved");

    if let Some(ref mut notif) = state.current {
        notif.duration = Some(Duration::from_millis(10));
    }

    assert!(!state.clear_if_expired());
    thread::sleep(Duration::from_millis(20));
    assert!(state.clear_if_expired());
    assert!(state.current().is_none());
}

#[test]
fn test_display_includes_label() {
    let notif = Notification::with_type("Quota exhausted", NotificationType::Error);
    assert_eq!(notif.to_string(), "[error] Quota exhausted");
}

use proptest::prelude::*;

// **Feature: notifications, Property: replacement**
// *For any* sequence of messages, only the most recent one is visible.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_notification_replacement(messages in prop::collection::vec("[a-zA-Z0-9 ]{1,50}", 1..10)) {
        let mut state = NotificationState::new();

        for msg in &messages {
            state.show(msg);
        }

        let last_message = messages.last().unwrap();
        prop_assert_eq!(state.current_message(), Some(last_message.as_str()));
    }
}
