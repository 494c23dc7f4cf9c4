mod config;
pub mod database;
pub mod schedule_store;

pub use config::{AgentConfig, CacheConfig, Config, NotificationsConfig};
pub use database::{AssetMeta, CachedAsset, Database};
pub use schedule_store::ScheduleStore;

use std::path::PathBuf;

/// Returns `~/.config/examflow[-dev]/` based on EXAMFLOW_ENV.
///
/// Set EXAMFLOW_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("EXAMFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("examflow-dev")
    } else {
        base_dir.join("examflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
