//! Configuration management with validation and defaults
//!
//! One table's worth of tunables: money, wheel range, bias, click geometry,
//! history window, save location and logging.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete table configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CroupierConfig {
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub bias: BiasConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

/// Money and wheel range
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Stake added or removed per click
    pub chip_value: u64,
    /// Balance of a fresh session
    pub starting_money: u64,
    pub min_number: u8,
    pub max_number: u8,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            chip_value: 10,
            starting_money: 1_000,
            min_number: 0,
            max_number: 36,
        }
    }
}

/// Skew of the winning number toward covered pockets
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiasConfig {
    /// Probability that a spin draws from the weight map, 0.0 is a fair wheel
    pub chance: f64,
    /// Heavier stakes weigh more
    pub weight_by_stake: bool,
    /// Pockets next to a covered pocket gain weight too
    pub neighbor_boost: bool,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            chance: 0.35,
            weight_by_stake: true,
            neighbor_boost: true,
        }
    }
}

impl BiasConfig {
    pub fn fair() -> Self {
        Self {
            chance: 0.0,
            weight_by_stake: false,
            neighbor_boost: false,
        }
    }
}

/// Click proximity thresholds, as a fraction of the cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub corner_threshold: f64,
    pub edge_threshold: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            corner_threshold: 0.18,
            edge_threshold: 0.22,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_lines: usize,
    pub max_spin_lines: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_lines: 20,
            max_spin_lines: 7,
        }
    }
}

/// Save file location
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub save_path: PathBuf,
    /// Write the save after every spin
    pub autosave: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("./croupier_save.json"),
            autosave: true,
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enable_logging: bool,
    pub log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enable_logging: true,
            log_level: LogLevel::Info,
        }
    }
}

/// Configuration validation and factory methods
impl CroupierConfig {
    /// Unbiased wheel over 0..=36
    pub fn fair() -> Self {
        Self {
            bias: BiasConfig::fair(),
            ..Default::default()
        }
    }

    /// The house table: one draw in three leans toward the player's pockets
    pub fn house_default() -> Self {
        Self::default()
    }

    /// Validate configuration for logical consistency
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.table.chip_value == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "chip_value must be > 0".to_string(),
            ));
        }

        if self.table.max_number > 36 {
            return Err(ConfigValidationError::InvalidValue(
                "max_number must be <= 36".to_string(),
            ));
        }

        if self.table.min_number > self.table.max_number {
            return Err(ConfigValidationError::LogicalInconsistency(format!(
                "min_number {} is above max_number {}",
                self.table.min_number, self.table.max_number
            )));
        }

        if !(0.0..=1.0).contains(&self.bias.chance) {
            return Err(ConfigValidationError::InvalidValue(format!(
                "bias chance must be within [0, 1], got {}",
                self.bias.chance
            )));
        }

        for (name, value) in [
            ("corner_threshold", self.layout.corner_threshold),
            ("edge_threshold", self.layout.edge_threshold),
        ] {
            if !(0.0..=0.5).contains(&value) {
                return Err(ConfigValidationError::InvalidValue(format!(
                    "{} must be within [0, 0.5], got {}",
                    name, value
                )));
            }
        }

        if self.history.max_lines == 0 || self.history.max_spin_lines == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "history windows must be > 0".to_string(),
            ));
        }

        if self.session.save_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "session.save_path".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    InvalidValue(String),
    LogicalInconsistency(String),
    MissingRequired(String),
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValidationError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
            ConfigValidationError::LogicalInconsistency(msg) => write!(f, "Configuration logical inconsistency: {}", msg),
            ConfigValidationError::MissingRequired(msg) => write!(f, "Missing required configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigValidationError {}
