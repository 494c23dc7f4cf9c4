//! Notification delivery.
//!
//! The engine hands composed reminders to a [`Notifier`] and forgets
//! about them. Whether the text lands on a terminal, a webhook, or a
//! host toast is the notifier's business; the engine never inspects the
//! outcome beyond logging a failed delivery.

mod console;
mod messages;
mod webhook;

pub use console::ConsoleNotifier;
pub use messages::{due_today_body, reminder_body, upcoming_body, Lang};
pub use webhook::WebhookNotifier;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// Whether the delivery channel is allowed to show notifications.
///
/// Mirrors the host permission model: when the user has notifications
/// turned off, an evaluation pass must not mark anything as sent, so
/// the same reminders stay eligible once permission returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
}

/// A fully composed reminder, ready to deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderNotice {
    /// Notification title (the exam title).
    pub title: String,
    /// Localized body text.
    pub body: String,
    /// Suppression identifier, stable across restarts. Hosts can use it
    /// to collapse duplicate toasts.
    pub tag: String,
    /// Subject the reminder is about.
    pub subject: String,
    /// Whole days until the exam starts (0 = today).
    pub days_left: i64,
}

impl ReminderNotice {
    /// Compose the notice for one exam at a given distance.
    pub fn compose(lang: Lang, title: &str, subject: &str, days_left: i64, tag: String) -> Self {
        Self {
            title: title.to_string(),
            body: reminder_body(lang, subject, days_left),
            tag,
            subject: subject.to_string(),
            days_left,
        }
    }
}

/// Every delivery channel implements this trait.
///
/// Delivery is fire-and-forget: the engine logs a failure and moves on,
/// and a failed delivery still counts as sent for the day.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Unique identifier (e.g. "console", "webhook").
    fn name(&self) -> &str;

    /// Whether this channel may deliver right now.
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    /// Deliver one reminder.
    async fn notify(&self, notice: &ReminderNotice) -> Result<(), NotifyError>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::{Notifier, Permission, ReminderNotice};
    use crate::error::NotifyError;

    /// Captures every notice it is handed. Clones share the buffer, so
    /// a clone can be boxed into an agent while the original observes.
    #[derive(Clone)]
    pub struct RecordingNotifier {
        sent: Arc<Mutex<Vec<ReminderNotice>>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self {
                sent: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Everything delivered so far.
        pub fn taken(&self) -> Vec<ReminderNotice> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        fn name(&self) -> &str {
            "recording"
        }

        async fn notify(&self, notice: &ReminderNotice) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(notice.clone());
            Ok(())
        }
    }

    /// Fails every delivery.
    pub struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        fn name(&self) -> &str {
            "failing"
        }

        async fn notify(&self, _notice: &ReminderNotice) -> Result<(), NotifyError> {
            Err(NotifyError::DeliveryFailed("channel unavailable".into()))
        }
    }

    /// Refuses permission outright.
    pub struct DeniedNotifier;

    #[async_trait]
    impl Notifier for DeniedNotifier {
        fn name(&self) -> &str {
            "denied"
        }

        fn permission(&self) -> Permission {
            Permission::Denied
        }

        async fn notify(&self, _notice: &ReminderNotice) -> Result<(), NotifyError> {
            Err(NotifyError::DeliveryFailed("permission denied".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_picks_the_due_today_template() {
        let notice = ReminderNotice::compose(Lang::En, "Midterm", "Math", 0, "t".into());
        assert_eq!(notice.body, "Math exam is today! Crush it!");
        assert_eq!(notice.title, "Midterm");
        assert_eq!(notice.days_left, 0);
    }

    #[test]
    fn compose_carries_the_tag_through() {
        let notice =
            ReminderNotice::compose(Lang::Ko, "Final", "Physics", 3, "Final-2024-06-01-D3".into());
        assert_eq!(notice.tag, "Final-2024-06-01-D3");
        assert!(notice.body.contains("D-3"));
    }
}
