//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and overridden by `EASYMONEY__*` environment
//! variables (e.g. `EASYMONEY__SERVER__PORT=8080`).
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [server]
//! bind = "0.0.0.0"
//! port = 3000
//! database = { sqlite = "easymoney.db" }   # or "memory", or { local = "budget.json" }
//!
//! [reset]
//! secret = "change-me"
//! schedule_hourly = true
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Storage backend of the server.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    /// In-memory SQLite, lost on exit.
    Memory,
    /// SQLite file at the given path.
    Sqlite(String),
    /// Single-profile JSON document store at the given path.
    Local(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Default, Deserialize)]
pub struct Reset {
    /// Bearer token for `/api/reset`.
    pub secret: Option<String>,
    /// Wipe all data at the top of every hour.
    #[serde(default)]
    pub schedule_hourly: bool,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
    #[serde(default)]
    pub reset: Reset,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(Environment::with_prefix("EASYMONEY").separator("__"))
                .build()?,
        )
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap();
        Settings::from_config(config).unwrap()
    }

    #[test]
    fn empty_settings_use_defaults() {
        let settings = parse("");
        assert_eq!(settings.app.level, "info");
        assert!(settings.server.is_none());
        assert!(settings.reset.secret.is_none());
        assert!(!settings.reset.schedule_hourly);
    }

    #[test]
    fn database_variants_are_parsed() {
        let settings = parse(
            r#"
            [server]
            port = 3000
            database = "memory"
            "#,
        );
        assert_eq!(settings.server.unwrap().database, Database::Memory);

        let settings = parse(
            r#"
            [server]
            port = 3000
            database = { local = "budget.json" }

            [reset]
            secret = "s3cret"
            schedule_hourly = true
            "#,
        );
        let server = settings.server.unwrap();
        assert_eq!(server.database, Database::Local("budget.json".to_string()));
        assert_eq!(settings.reset.secret.as_deref(), Some("s3cret"));
        assert!(settings.reset.schedule_hourly);
    }
}
