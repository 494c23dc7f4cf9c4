use std::path::PathBuf;

use clap::Subcommand;
use examflow_core::storage::ScheduleStore;

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Push a schedule JSON file; a running agent picks it up within
    /// one poll interval
    Push {
        /// Path to a schedule JSON file
        file: PathBuf,
    },
    /// Print the current schedule snapshot
    Show,
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = ScheduleStore::open()?;

    match action {
        ScheduleAction::Push { file } => {
            let schedule = ScheduleStore::read_file(&file)?;
            store.save(&schedule)?;
            let summary = serde_json::json!({
                "pushed": schedule.exams.len(),
                "lang": schedule.lang,
                "snapshot": store.path(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        ScheduleAction::Show => {
            println!("{}", serde_json::to_string_pretty(&store.load())?);
        }
    }
    Ok(())
}
