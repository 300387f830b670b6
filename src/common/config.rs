//! Configuration loading for the croupier engine
//!
//! Reads a TOML file (or starts from defaults), applies `CROUPIER_*`
//! environment overrides and validates the result.

use crate::config::{BiasConfig, CroupierConfig, LayoutConfig, LogLevel, TableConfig};
use crate::errors::{ConfigurationError, CroupierResult};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variables understood by the loader
pub const ENV_CHIP_VALUE: &str = "CROUPIER_CHIP_VALUE";
pub const ENV_STARTING_MONEY: &str = "CROUPIER_STARTING_MONEY";
pub const ENV_BIAS_CHANCE: &str = "CROUPIER_BIAS_CHANCE";
pub const ENV_SAVE_PATH: &str = "CROUPIER_SAVE_PATH";
pub const ENV_LOG_LEVEL: &str = "CROUPIER_LOG_LEVEL";

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> CroupierResult<CroupierConfig> {
        self.load_with(|key| env::var(key).ok())
    }

    /// Same as `load`, with a custom variable source
    pub fn load_with<F>(&self, lookup: F) -> CroupierResult<CroupierConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match self.config_path {
            Some(ref path) => self.load_from_file(path)?,
            None => CroupierConfig::default(),
        };

        // Override with environment variables
        apply_overrides(&mut config, lookup)?;

        config
            .validate()
            .map_err(|e| ConfigurationError::ValidationFailed(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration from TOML file
    fn load_from_file(&self, path: &Path) -> CroupierResult<CroupierConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e)).into())
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, config: &CroupierConfig, path: P) -> CroupierResult<()> {
        let path = path.as_ref();
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| ConfigurationError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml_string).map_err(|e| {
            ConfigurationError::SaveFailed(format!("Failed to write to {}: {}", path.display(), e)).into()
        })
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_field<T: std::str::FromStr>(field: &str, value: String, reason: &str) -> Result<T, ConfigurationError> {
    value.trim().parse().map_err(|_| ConfigurationError::InvalidValue {
        field: field.to_string(),
        value,
        reason: reason.to_string(),
    })
}

/// Apply `CROUPIER_*` overrides read through `lookup`
pub fn apply_overrides<F>(config: &mut CroupierConfig, lookup: F) -> Result<(), ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_CHIP_VALUE) {
        config.table.chip_value = parse_field(ENV_CHIP_VALUE, value, "Invalid chip value")?;
    }
    if let Some(value) = lookup(ENV_STARTING_MONEY) {
        config.table.starting_money = parse_field(ENV_STARTING_MONEY, value, "Invalid amount")?;
    }
    if let Some(value) = lookup(ENV_BIAS_CHANCE) {
        config.bias.chance = parse_field(ENV_BIAS_CHANCE, value, "Invalid probability")?;
    }
    if let Some(value) = lookup(ENV_SAVE_PATH) {
        config.session.save_path = PathBuf::from(value);
    }
    if let Some(value) = lookup(ENV_LOG_LEVEL) {
        config.monitoring.log_level =
            LogLevel::parse(&value).ok_or_else(|| ConfigurationError::InvalidValue {
                field: ENV_LOG_LEVEL.to_string(),
                value,
                reason: "Expected error, warn, info, debug or trace".to_string(),
            })?;
    }

    Ok(())
}

/// Builder pattern for creating configurations
pub struct ConfigBuilder {
    config: CroupierConfig,
}

impl ConfigBuilder {
    /// Create a new config builder with defaults
    pub fn new() -> Self {
        Self {
            config: CroupierConfig::default(),
        }
    }

    pub fn table(mut self, table: TableConfig) -> Self {
        self.config.table = table;
        self
    }

    pub fn bias(mut self, bias: BiasConfig) -> Self {
        self.config.bias = bias;
        self
    }

    pub fn layout(mut self, layout: LayoutConfig) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn chip_value(mut self, chip_value: u64) -> Self {
        self.config.table.chip_value = chip_value;
        self
    }

    pub fn starting_money(mut self, money: u64) -> Self {
        self.config.table.starting_money = money;
        self
    }

    pub fn save_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.session.save_path = path.as_ref().to_path_buf();
        self
    }

    /// Build the final configuration
    pub fn build(self) -> CroupierConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
