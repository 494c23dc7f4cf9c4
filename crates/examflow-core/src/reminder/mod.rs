//! Exam reminder evaluation: thresholds, the sent ledger, and the engine
//! that ties them to a delivery channel.

pub mod engine;
pub mod ledger;
pub mod threshold;

pub use engine::{EvaluationReport, PendingReminder, ReminderEngine};
pub use ledger::{LedgerStore, SentLedger, SENT_LEDGER_KEY};
pub use threshold::{days_until, is_reminder_day, reminder_tag, REMINDER_OFFSETS};
