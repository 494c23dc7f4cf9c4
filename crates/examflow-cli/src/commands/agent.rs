use clap::Subcommand;
use examflow_core::agent::{Agent, EvalTrigger};
use examflow_core::storage::{Config, Database, ScheduleStore};
use examflow_core::{ConsoleNotifier, LedgerStore, ReminderEngine};

use crate::common;

#[derive(Subcommand)]
pub enum AgentAction {
    /// Run the background agent until interrupted
    Run,
    /// Run one evaluation pass and print the report as JSON
    Evaluate,
    /// Print schedule, ledger, and pending reminders as JSON
    Status,
}

pub fn run(action: AgentAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let store = ScheduleStore::open()?;

    match action {
        AgentAction::Run => {
            let notifier = common::build_notifier(&config)?;
            let (agent, _handle) = Agent::new(db, config, notifier, store);
            let rt = common::runtime()?;
            log::info!("agent started");
            rt.block_on(agent.run());
        }
        AgentAction::Evaluate => {
            let notifier = common::build_notifier(&config)?;
            let (agent, _handle) = Agent::new(db, config, notifier, store);
            let rt = common::runtime()?;
            if let Some(report) = rt.block_on(agent.evaluate_now(EvalTrigger::Manual)) {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        AgentAction::Status => {
            let today = chrono::Local::now().date_naive();
            let schedule = store.load();
            let console = ConsoleNotifier::new();
            let engine = ReminderEngine::new(&db, &console);
            let pending = engine.pending(today, &schedule);
            let ledger = LedgerStore::new(&db).load(today);

            let status = serde_json::json!({
                "date": today,
                "lang": schedule.lang,
                "exams": schedule.exams.len(),
                "pending": pending,
                "sent_today": if ledger.date == today { ledger.sent_count() } else { 0 },
                "ledger_date": ledger.date,
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}
