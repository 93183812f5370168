//! Application settings loaded from `cardwatch.toml` with environment overrides.
//!
//! The file is optional; every field has a default so a bare checkout runs
//! with a local SQLite database, a 09:00 UTC scan, and the public ntfy server.
//! `DATABASE_URL` in the environment always wins over the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Public ntfy instance used when a user has no server of their own.
pub const DEFAULT_NTFY_SERVER: &str = "https://ntfy.sh";

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SeaORM connection string
    pub database_url: String,
    /// When the daily scan fires
    pub scheduler: SchedulerConfig,
    /// Outbound notification defaults
    pub notify: NotifyConfig,
}

/// Time of day (UTC) for the recurring scan.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Hour 0-23
    pub hour: u8,
    /// Minute 0-59
    pub minute: u8,
}

/// Defaults for the ntfy channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Fallback server base URL for users without their own
    pub default_server: String,
    /// Request timeout in seconds; a timed-out notification is dropped
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://data/cardwatch.sqlite?mode=rwc".to_string(),
            scheduler: SchedulerConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { hour: 9, minute: 0 }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            default_server: DEFAULT_NTFY_SERVER.to_string(),
            timeout_secs: 5,
        }
    }
}

impl AppConfig {
    fn validate(self) -> Result<Self> {
        if self.scheduler.hour > 23 || self.scheduler.minute > 59 {
            return Err(Error::Config {
                message: format!(
                    "scheduler time {:02}:{:02} is not a valid time of day",
                    self.scheduler.hour, self.scheduler.minute
                ),
            });
        }
        if self.notify.timeout_secs == 0 {
            return Err(Error::Config {
                message: "notify.timeout_secs must be at least 1".to_string(),
            });
        }
        Ok(self)
    }

    fn apply_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database_url = url;
        }
        self
    }
}

/// Loads configuration from a TOML file, applying environment overrides.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed, or if
/// the resulting configuration is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    let config = if path.exists() {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&contents).map_err(|e| Error::Config {
            message: format!("failed to parse {}: {e}", path.display()),
        })?
    } else {
        AppConfig::default()
    };

    config.apply_env_overrides().validate()
}

/// Loads configuration from `$CARDWATCH_CONFIG`, falling back to
/// `./cardwatch.toml` (which may be absent).
pub fn load_default_config() -> Result<AppConfig> {
    let path =
        std::env::var("CARDWATCH_CONFIG").unwrap_or_else(|_| "cardwatch.toml".to_string());
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            database_url = "sqlite://tmp/test.sqlite?mode=rwc"

            [scheduler]
            hour = 7
            minute = 30

            [notify]
            default_server = "https://ntfy.example.org/"
            timeout_secs = 10
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database_url, "sqlite://tmp/test.sqlite?mode=rwc");
        assert_eq!(config.scheduler.hour, 7);
        assert_eq!(config.scheduler.minute, 30);
        assert_eq!(config.notify.default_server, "https://ntfy.example.org/");
        assert_eq!(config.notify.timeout_secs, 10);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r#"
            [scheduler]
            hour = 21
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scheduler.hour, 21);
        assert_eq!(config.scheduler.minute, 0);
        assert_eq!(config.notify.default_server, DEFAULT_NTFY_SERVER);
        assert_eq!(config.notify.timeout_secs, 5);
        assert!(config.database_url.starts_with("sqlite://"));
    }

    #[test]
    fn test_invalid_scheduler_time_rejected() {
        let config = AppConfig {
            scheduler: SchedulerConfig { hour: 24, minute: 0 },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_config("definitely/not/a/real/path.toml").unwrap();
        assert_eq!(config.scheduler.hour, 9);
        assert_eq!(config.scheduler.minute, 0);
    }
}
