//! Terminal notifier.
//!
//! Prints reminders to stdout. This is the default channel for the CLI
//! agent and doubles as the permission gate: when notifications are
//! disabled in config the notifier reports `Denied` and the engine
//! skips the pass without marking anything sent.

use async_trait::async_trait;

use super::{Notifier, Permission, ReminderNotice};
use crate::error::NotifyError;

pub struct ConsoleNotifier {
    enabled: bool,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// A notifier that refuses permission, matching a user who has
    /// notifications switched off.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    fn permission(&self) -> Permission {
        if self.enabled {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    async fn notify(&self, notice: &ReminderNotice) -> Result<(), NotifyError> {
        println!("{}: {}", notice.title, notice.body);
        log::debug!("delivered reminder {}", notice.tag);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_follows_the_enabled_flag() {
        assert_eq!(ConsoleNotifier::new().permission(), Permission::Granted);
        assert_eq!(ConsoleNotifier::disabled().permission(), Permission::Denied);
    }
}
