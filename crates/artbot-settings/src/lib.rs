//! # ARTBot Settings
//!
//! Print run configuration, loaded from a TOML or JSON file and checked
//! before a run starts. `DATABASE_URL` overrides the configured database.

pub mod config;
pub mod error;

pub use config::{
    BatchSettings, Config, DatabaseSettings, LabwareSettings, OutputFormat, OutputSettings,
    DATABASE_URL_ENV,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
