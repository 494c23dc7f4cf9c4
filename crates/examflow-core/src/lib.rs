//! # ExamFlow Core Library
//!
//! This library provides the background agent behind the ExamFlow exam
//! planner: it keeps the app shell cached for offline use and turns the
//! pushed exam schedule into at-most-once-per-day reminder
//! notifications. All operations are available via a standalone CLI
//! binary; a desktop host embeds the same agent as a library.
//!
//! ## Architecture
//!
//! - **Reminder Engine**: Day-granular evaluation of the exam schedule
//!   against fixed day-offsets, with a durable sent ledger so restarts
//!   and repeated passes never re-fire a reminder
//! - **Agent Loop**: A periodic evaluator that also reacts to schedule
//!   pushes and sleep/wake gaps, serialized by a single-flight guard
//! - **Asset Cache**: A versioned, SQLite-backed copy of the fixed app
//!   shell assets
//! - **Storage**: SQLite for durable state, TOML for configuration
//!
//! ## Key Components
//!
//! - [`ReminderEngine`]: Evaluates one day against the schedule
//! - [`Agent`]: The long-running loop around the engine
//! - [`Notifier`]: Trait for delivery channels (console, webhook)
//! - [`Database`]: Durable ledger and asset persistence
//! - [`Config`]: Application configuration management

pub mod agent;
pub mod cache;
pub mod error;
pub mod exam;
pub mod notify;
pub mod reminder;
pub mod storage;

pub use agent::{Agent, AgentCommand, AgentHandle, EvalTrigger, SingleFlight};
pub use cache::{AssetCache, PrimeSummary, CACHE_NAME, STATIC_ASSETS};
pub use error::{CacheError, ConfigError, CoreError, NotifyError, ScheduleError, StoreError};
pub use exam::{Exam, ExamSchedule};
pub use notify::{ConsoleNotifier, Lang, Notifier, Permission, ReminderNotice, WebhookNotifier};
pub use reminder::{
    EvaluationReport, LedgerStore, PendingReminder, ReminderEngine, SentLedger, REMINDER_OFFSETS,
};
pub use storage::{Config, Database, ScheduleStore};
