use clap::Subcommand;
use examflow_core::storage::{Config, Database};
use examflow_core::{AssetCache, CacheError, CACHE_NAME};
use url::Url;

use crate::common;

#[derive(Subcommand)]
pub enum CacheAction {
    /// Fetch the static assets from the origin and store them under the
    /// current cache version
    Prime {
        /// Override the configured cache.origin
        #[arg(long)]
        origin: Option<String>,
    },
    /// List cached assets as JSON
    List,
    /// Drop assets from superseded cache versions
    Purge,
}

pub fn run(action: CacheAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let cache = AssetCache::new(&db);

    match action {
        CacheAction::Prime { origin } => {
            let config = Config::load_or_default();
            let origin = origin
                .or(config.cache.origin)
                .ok_or(CacheError::OriginMissing)?;
            let origin = Url::parse(&origin)?;

            let rt = common::runtime()?;
            let summary = rt.block_on(cache.prime(&reqwest::Client::new(), &origin))?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        CacheAction::List => {
            println!("{}", serde_json::to_string_pretty(&cache.entries()?)?);
        }
        CacheAction::Purge => {
            let removed = cache.purge_stale()?;
            let summary = serde_json::json!({
                "removed": removed,
                "kept": CACHE_NAME,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
