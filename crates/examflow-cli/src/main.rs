use clap::{Parser, Subcommand};
use env_logger::Env;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "examflow-cli", version, about = "ExamFlow reminder agent CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Background agent control
    Agent {
        #[command(subcommand)]
        action: commands::agent::AgentAction,
    },
    /// Exam schedule management
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Sent-reminder ledger
    Sent {
        #[command(subcommand)]
        action: commands::sent::SentAction,
    },
    /// Static asset cache
    Cache {
        #[command(subcommand)]
        action: commands::cache::CacheAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Agent { action } => commands::agent::run(action),
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Sent { action } => commands::sent::run(action),
        Commands::Cache { action } => commands::cache::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
