//! Handlers for `config show` and `config set`.

use std::path::Path;

use clap::Subcommand;

use super::scan::load_config;
use crate::config::{get_config_value, set_config_value};
use crate::error::{Error, Result};
use crate::store::Store;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Set a config value by dotted path (key=value)
    Set {
        /// e.g. risk.max_position_size_usd=2.5
        keyvalue: String,
    },
}

pub fn execute(config_path: &Path, db_path: &Path, command: &ConfigCommand) -> Result<i32> {
    let config = load_config(config_path)?;

    match command {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(0)
        }
        ConfigCommand::Set { keyvalue } => {
            let Some((key, value)) = keyvalue.split_once('=') else {
                eprintln!("Error: use key=value format");
                return Ok(1);
            };
            let key = key.trim();
            let value = value.trim();

            let updated = match set_config_value(&config, key, value) {
                Ok(updated) => updated,
                Err(Error::Config(message)) => {
                    eprintln!("Error: {message}");
                    return Ok(1);
                }
                Err(e) => return Err(e),
            };

            // Persist the updated file, snapshot it, and audit the
            // operation.
            let rendered =
                toml::to_string_pretty(&updated).map_err(|e| Error::Config(e.to_string()))?;
            std::fs::write(config_path, rendered)?;

            if let Some(parent) = db_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let store = Store::open(&db_path.to_string_lossy())?;
            store.snapshot_config(&updated)?;
            store.log_operator_command("config set", keyvalue, "ok")?;

            println!("Set {key} = {}", get_config_value(&updated, key)?);
            Ok(0)
        }
    }
}
