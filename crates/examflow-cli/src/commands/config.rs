use clap::Subcommand;
use examflow_core::storage::Config;
use examflow_core::ConfigError;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dot-separated key (e.g. agent.poll_secs)
    Get { key: String },
    /// Set one value and persist it
    Set { key: String, value: String },
    /// Print the whole configuration as TOML
    List,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_or_default();
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(ConfigError::UnknownKey(key).into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_or_default();
            config.set(&key, &value)?;
            println!("{key} = {}", config.get(&key).unwrap_or_default());
        }
        ConfigAction::List => {
            let config = Config::load_or_default();
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
