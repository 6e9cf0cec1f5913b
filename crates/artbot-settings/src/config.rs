//! Configuration for ARTBot print runs
//!
//! Supports JSON and TOML file formats, chosen by file extension. The
//! default location is platform-specific (`<config dir>/artbot/config.toml`).
//!
//! Configuration is organized into logical sections:
//! - Database (where the artpiece queue lives)
//! - Output (where procedures are written and in which format)
//! - Batch (how many artpieces per run and which deck slots hold canvases)
//! - Labware (palette plate and pipette)

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Environment variable that overrides `database.url`
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Database settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// `sqlite://path` or a bare file path
    pub url: Option<String>,
}

impl DatabaseSettings {
    /// File path of the SQLite database
    pub fn sqlite_path(&self) -> ConfigResult<PathBuf> {
        let url = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ConfigError::MissingKey("database.url".to_string()))?;

        let path = if let Some(rest) = url.strip_prefix("sqlite://") {
            rest
        } else if let Some(rest) = url.strip_prefix("sqlite:") {
            rest
        } else if url.contains("://") {
            return Err(ConfigError::InvalidSetting {
                key: "database.url".to_string(),
                reason: format!("only sqlite databases are supported, got {}", url),
            });
        } else {
            url
        };

        if path.is_empty() {
            return Err(ConfigError::InvalidSetting {
                key: "database.url".to_string(),
                reason: "database path is empty".to_string(),
            });
        }
        Ok(PathBuf::from(path))
    }
}

/// Procedure file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Opentrons Python protocol
    #[default]
    Python,
    /// Jupyter notebook wrapping the protocol
    Notebook,
    /// Structured plan as JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Python => write!(f, "python"),
            Self::Notebook => write!(f, "notebook"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "notebook" | "ipynb" => Ok(Self::Notebook),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory procedures are written to
    pub directory: PathBuf,
    /// Procedure file format
    pub format: OutputFormat,
    /// Protocol template replacing the built-in one
    pub template: Option<PathBuf>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("procedures"),
            format: OutputFormat::default(),
            template: None,
        }
    }
}

/// Batch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Maximum number of artpieces per procedure
    pub num_pieces: usize,
    /// Deck slots holding canvases, in allocation order
    pub canvas_slots: Vec<String>,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            num_pieces: 9,
            canvas_slots: (1..=9).map(|slot| slot.to_string()).collect(),
        }
    }
}

/// Labware settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabwareSettings {
    /// Palette plate holding the bacterial colors
    pub palette: String,
    /// Pipette used to dispense
    pub pipette: String,
}

impl Default for LabwareSettings {
    fn default() -> Self {
        Self {
            palette: "corning_96_wellplate_360ul_flat".to_string(),
            pipette: "p10_single".to_string(),
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseSettings,
    pub output: OutputSettings,
    pub batch: BatchSettings,
    pub labware: LabwareSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("artbot").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise the default file if it exists,
    /// otherwise defaults.
    pub fn load(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Ok(path) if path.exists() => Self::load_from_file(&path),
            _ => {
                debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Overlay settings from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay settings from `lookup`; empty values are ignored
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            debug!("Database url taken from {}", DATABASE_URL_ENV);
            self.database.url = Some(url);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.batch.num_pieces == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "batch.num_pieces".to_string(),
                value: "0".to_string(),
            });
        }

        if self.batch.canvas_slots.is_empty() {
            return Err(ConfigError::MissingKey("batch.canvas_slots".to_string()));
        }

        for (i, slot) in self.batch.canvas_slots.iter().enumerate() {
            if slot.trim().is_empty() {
                return Err(ConfigError::InvalidSetting {
                    key: "batch.canvas_slots".to_string(),
                    reason: "slot names must not be empty".to_string(),
                });
            }
            if self.batch.canvas_slots[..i].contains(slot) {
                return Err(ConfigError::InvalidSetting {
                    key: "batch.canvas_slots".to_string(),
                    reason: format!("slot {} is listed twice", slot),
                });
            }
        }

        if self.batch.num_pieces > self.batch.canvas_slots.len() {
            return Err(ConfigError::ValueOutOfRange {
                key: "batch.num_pieces".to_string(),
                value: format!(
                    "{} (only {} canvas slots)",
                    self.batch.num_pieces,
                    self.batch.canvas_slots.len()
                ),
            });
        }

        for (key, value) in [
            ("labware.palette", &self.labware.palette),
            ("labware.pipette", &self.labware.pipette),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidSetting {
                    key: key.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(format!(
                "{} (config file must be .json or .toml)",
                other.unwrap_or("no extension")
            ))
            .into()),
        }
    }
}
