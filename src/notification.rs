//! Non-blocking user notifications
//!
//! Every user-visible failure in a session is reported through here; none of
//! them interrupt editing.

mod notification_state;

pub use notification_state::{Notification, NotificationState, NotificationType};
