use std::collections::HashMap;
use std::env;

use config::{Config as ConfigSource, File, FileFormat};
use serde_derive::{Deserialize, Serialize};

/// Service configuration: where the ledger lives on disk, what address the
/// HTTP surface binds to, and the opaque credential table a chat front-end
/// would look a caller up in. Every field has a default, so a missing config
/// file is not a startup error.
#[derive(Serialize, Deserialize, Default, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub store_path: String,
    #[serde(default)]
    pub bind_addr: String,
    #[serde(default)]
    pub front_end_credentials: HashMap<String, String>,
}

impl Config {
    /// Reads `LEDGER_API_CONFIG_PATH` (default `./config/local/ledger-api-config.json`)
    /// if present and promotes its values into the environment, so `build`
    /// can read everything uniformly from `env::var`.
    pub fn load() -> Result<(), ConfigError> {
        let config_path =
            env::var("LEDGER_API_CONFIG_PATH").unwrap_or_else(|_| "./config/local/ledger-api-config.json".to_string());

        // A missing file is a no-op (every field has an env/default fallback
        // in `build`); a file that exists but fails to parse is not.
        let source = ConfigSource::builder()
            .add_source(File::new(&config_path, FileFormat::Json).required(false))
            .build()
            .map_err(|_| ConfigError::Loading)?;

        set_env(&source, "RUST_LOG").map_err(|_| ConfigError::Loading)?;
        set_env(&source, "LEDGER_API_STORE_PATH").map_err(|_| ConfigError::Loading)?;
        set_env(&source, "LEDGER_API_BIND_ADDR").map_err(|_| ConfigError::Loading)?;
        set_env(&source, "LEDGER_API_FRONT_END_CREDENTIALS").map_err(|_| ConfigError::Loading)?;
        Ok(())
    }

    pub fn build() -> Result<Config, &'static str> {
        let front_end_credentials = match env::var("LEDGER_API_FRONT_END_CREDENTIALS") {
            Ok(raw) => serde_json::from_str(&raw).map_err(|_| "invalid LEDGER_API_FRONT_END_CREDENTIALS")?,
            Err(_) => HashMap::new(),
        };

        Ok(Config {
            store_path: env::var("LEDGER_API_STORE_PATH").unwrap_or_else(|_| "./data/ledger".to_string()),
            bind_addr: env::var("LEDGER_API_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:27182".to_string()),
            front_end_credentials,
        })
    }
}

fn set_env(source: &ConfigSource, key: &str) -> Result<(), config::ConfigError> {
    if let Ok(value) = source.get::<String>(key) {
        env::set_var(key, value);
    }
    Ok(())
}

#[derive(Debug)]
pub enum ConfigError {
    Loading,
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ConfigError::*;
        match self {
            Loading => write!(f, "loading configuration"),
        }
    }
}
