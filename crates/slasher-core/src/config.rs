//! Application configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/expense-slasher/config.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! The database path can additionally be overridden with `SLASHER_DB`.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

/// Environment variable overriding the database path
pub const DB_PATH_ENV: &str = "SLASHER_DB";

const DEFAULT_CONFIG: &str = r#"
database_path = "expenses.db"
log_level = "warn"
currency_symbol = "$"
"#;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub database_path: PathBuf,
    pub log_level: String,
    pub currency_symbol: String,
}

/// Partial config as read from an override file
#[derive(Debug, Default, Deserialize)]
struct ConfigOverride {
    database_path: Option<PathBuf>,
    log_level: Option<String>,
    currency_symbol: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("expenses.db"),
            log_level: "warn".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

impl Config {
    /// Load embedded defaults, the override file if present, then the environment
    pub fn load() -> Result<Self> {
        let mut config = Self::embedded()?;

        if let Some(path) = override_path().filter(|p| p.exists()) {
            debug!(path = %path.display(), "Loading config override");
            let content = fs::read_to_string(&path)?;
            config.apply_override(&content)?;
        }

        if let Ok(db) = std::env::var(DB_PATH_ENV) {
            if !db.trim().is_empty() {
                config.database_path = PathBuf::from(db);
            }
        }

        Ok(config)
    }

    /// Parse the compiled-in defaults
    pub fn embedded() -> Result<Self> {
        Ok(toml::from_str(DEFAULT_CONFIG)?)
    }

    /// Layer a TOML document over this config; absent keys keep their current value
    pub fn apply_override(&mut self, content: &str) -> Result<()> {
        let over: ConfigOverride = toml::from_str(content)?;
        if let Some(path) = over.database_path {
            self.database_path = path;
        }
        if let Some(level) = over.log_level {
            self.log_level = level;
        }
        if let Some(symbol) = over.currency_symbol {
            self.currency_symbol = symbol;
        }
        Ok(())
    }
}

/// Location of the user override file
pub fn override_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("expense-slasher").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_matches_default() {
        assert_eq!(Config::embedded().unwrap(), Config::default());
    }

    #[test]
    fn test_partial_override() {
        let mut config = Config::default();
        config
            .apply_override("database_path = \"/tmp/ledger.db\"\n")
            .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/ledger.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.currency_symbol, "$");
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_override("log_level = [1, 2]");
        assert!(matches!(result, Err(crate::Error::Config(_))));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_override_path_location() {
        if let Some(path) = override_path() {
            assert!(path.ends_with("expense-slasher/config.toml"));
        }
    }
}
