//! The background agent loop.
//!
//! Owns the stores and the notifier, and decides when to evaluate:
//! once at startup, after every schedule push, every few minutes, and
//! after a sleep/wake gap. Hosts talk to a running agent through an
//! [`AgentHandle`]; a second process pushes by rewriting the schedule
//! snapshot, which the loop notices by mtime.
//!
//! Evaluation itself stays caller-driven and synchronous in spirit: one
//! pass at a time, serialized by a [`SingleFlight`] guard rather than by
//! locking the stores.

mod single_flight;

pub use single_flight::{Passage, SingleFlight};

use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate, Utc};
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::exam::ExamSchedule;
use crate::notify::Notifier;
use crate::reminder::{EvaluationReport, ReminderEngine};
use crate::storage::{Config, Database, ScheduleStore};

/// Time jump threshold to detect sleep/wake (5 minutes)
const TIME_JUMP_THRESHOLD_SECS: i64 = 300;

/// Command channel depth. Pushes are rare; a full channel just blocks
/// the sender briefly.
const COMMAND_BUFFER: usize = 16;

/// Commands a host can send to a running agent.
#[derive(Debug)]
pub enum AgentCommand {
    /// Replace the schedule snapshot and evaluate immediately.
    Push(ExamSchedule),
    /// Evaluate now.
    Evaluate,
    /// Stop the loop.
    Shutdown,
}

/// Why an evaluation pass ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalTrigger {
    Startup,
    DataPush,
    Periodic,
    Wake,
    Manual,
}

impl std::fmt::Display for EvalTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EvalTrigger::Startup => "startup",
            EvalTrigger::DataPush => "data-push",
            EvalTrigger::Periodic => "periodic",
            EvalTrigger::Wake => "wake",
            EvalTrigger::Manual => "manual",
        };
        f.write_str(s)
    }
}

/// Cloneable handle for sending commands into a running agent.
#[derive(Clone)]
pub struct AgentHandle {
    tx: mpsc::Sender<AgentCommand>,
}

impl AgentHandle {
    /// Push a new schedule. Returns false if the agent is gone.
    pub async fn push(&self, schedule: ExamSchedule) -> bool {
        self.tx.send(AgentCommand::Push(schedule)).await.is_ok()
    }

    /// Ask for an immediate evaluation pass.
    pub async fn evaluate(&self) -> bool {
        self.tx.send(AgentCommand::Evaluate).await.is_ok()
    }

    /// Stop the agent loop.
    pub async fn shutdown(&self) -> bool {
        self.tx.send(AgentCommand::Shutdown).await.is_ok()
    }
}

/// The background agent: stores, notifier, and the evaluation loop.
pub struct Agent {
    db: Database,
    config: Config,
    notifier: Box<dyn Notifier>,
    schedule: ScheduleStore,
    rx: mpsc::Receiver<AgentCommand>,
    flight: SingleFlight,
}

impl Agent {
    pub fn new(
        db: Database,
        config: Config,
        notifier: Box<dyn Notifier>,
        schedule: ScheduleStore,
    ) -> (Self, AgentHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        (
            Self {
                db,
                config,
                notifier,
                schedule,
                rx,
                flight: SingleFlight::new(),
            },
            AgentHandle { tx },
        )
    }

    /// Today's calendar date in local time. Reminders are day-granular,
    /// so this is the only clock reading an evaluation uses.
    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Run one guarded evaluation, draining a queued follow-up before
    /// releasing the flight. Returns None when the trigger coalesced
    /// into a pass already in flight.
    pub async fn evaluate_now(&self, trigger: EvalTrigger) -> Option<EvaluationReport> {
        match self.flight.try_begin() {
            Passage::Entered => {
                let mut report = self.pass(trigger).await;
                while self.flight.finish() {
                    report = self.pass(trigger).await;
                }
                Some(report)
            }
            Passage::Queued => {
                log::debug!("evaluation in flight; queued follow-up ({trigger})");
                None
            }
            Passage::Dropped => {
                log::debug!("evaluation in flight, follow-up already queued; dropped {trigger}");
                None
            }
        }
    }

    async fn pass(&self, trigger: EvalTrigger) -> EvaluationReport {
        let today = Self::today();
        let schedule = self.schedule.load();
        log::info!(
            "evaluating {} exam(s) for {today} (trigger: {trigger})",
            schedule.exams.len()
        );
        ReminderEngine::new(&self.db, self.notifier.as_ref())
            .evaluate(today, &schedule)
            .await
    }

    /// Run the loop until [`AgentCommand::Shutdown`] arrives or every
    /// handle is dropped.
    pub async fn run(mut self) {
        let poll = Duration::from_secs(self.config.agent.poll_secs.max(1));
        let interval = Duration::from_secs(self.config.agent.evaluate_interval_secs.max(1));

        self.evaluate_now(EvalTrigger::Startup).await;

        let mut last_eval = Instant::now();
        let mut last_check = Utc::now();
        let mut last_push = self.schedule.modified();

        loop {
            match timeout(poll, self.rx.recv()).await {
                Ok(Some(AgentCommand::Push(schedule))) => {
                    if let Err(e) = self.schedule.save(&schedule) {
                        log::error!("failed to persist pushed schedule: {e}");
                    }
                    last_push = self.schedule.modified();
                    self.evaluate_now(EvalTrigger::DataPush).await;
                    last_eval = Instant::now();
                }
                Ok(Some(AgentCommand::Evaluate)) => {
                    self.evaluate_now(EvalTrigger::Manual).await;
                    last_eval = Instant::now();
                }
                Ok(Some(AgentCommand::Shutdown)) => {
                    log::info!("agent shutting down");
                    break;
                }
                Ok(None) => {
                    log::info!("all agent handles dropped; shutting down");
                    break;
                }
                Err(_) => {
                    // Poll expired with nothing to read.
                    let now = Utc::now();
                    let time_jump = (now - last_check).num_seconds();
                    if time_jump > TIME_JUMP_THRESHOLD_SECS {
                        log::info!("detected system wake (time jumped {time_jump} seconds)");
                        self.evaluate_now(EvalTrigger::Wake).await;
                        last_eval = Instant::now();
                    } else if self.schedule.modified() != last_push {
                        log::info!("schedule snapshot changed on disk");
                        last_push = self.schedule.modified();
                        self.evaluate_now(EvalTrigger::DataPush).await;
                        last_eval = Instant::now();
                    } else if last_eval.elapsed() >= interval {
                        self.evaluate_now(EvalTrigger::Periodic).await;
                        last_eval = Instant::now();
                    }
                }
            }
            last_check = Utc::now();
        }
    }
}
