use clap::Subcommand;
use examflow_core::storage::Database;
use examflow_core::LedgerStore;

#[derive(Subcommand)]
pub enum SentAction {
    /// Print the stored sent ledger as JSON
    Show,
    /// Clear the sent ledger; today's reminders become eligible again
    Clear,
}

pub fn run(action: SentAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let store = LedgerStore::new(&db);

    match action {
        SentAction::Show => {
            let today = chrono::Local::now().date_naive();
            println!("{}", serde_json::to_string_pretty(&store.load(today))?);
        }
        SentAction::Clear => {
            store.clear()?;
            println!("{{\"type\": \"sent_ledger_cleared\"}}");
        }
    }
    Ok(())
}
