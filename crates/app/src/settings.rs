//! Handles settings for the application.
//!
//! Values come from an optional `settings.toml` in the working directory,
//! then from `BUDGET_LEDGER__*` environment variables
//! (e.g. `BUDGET_LEDGER__APP__LEVEL=debug`).
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [database]
//! sqlite = "./budget_ledger.db"   # or: database = "memory"
//! ```
use config::{Config, ConfigError, Environment, File};
#[cfg(test)]
use config::FileFormat;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub database: Option<Database>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(File::with_name("settings").required(false))
    }

    #[cfg(test)]
    fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Self::load(File::from_str(raw, FileFormat::Toml))
    }

    fn load<S>(file: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        Config::builder()
            .set_default("app.level", "info")?
            .add_source(file)
            .add_source(Environment::with_prefix("BUDGET_LEDGER").separator("__"))
            .build()?
            .try_deserialize()
    }
}
