/// Database configuration and connection management
pub mod database;

/// Application settings loading from cardwatch.toml and the environment
pub mod settings;

pub use settings::{AppConfig, NotifyConfig, SchedulerConfig, load_default_config};
