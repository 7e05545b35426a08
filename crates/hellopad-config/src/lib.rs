//! Configuration management for HelloPad
//!
//! Handles tunable settings, the logical button catalogue, the device mapping
//! table and its TOML persistence.

mod catalogue;
mod mapping;
mod settings;
mod store;

pub use catalogue::{Catalogue, LogicalButton};
pub use mapping::{DeviceMapping, ValidationIssue, ValidationReport};
pub use settings::{DetectorConfig, MapperConfig, PathsConfig};
pub use store::{FORMAT_VERSION, InMemoryStore, MappingFile, MappingStore};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),
}

/// Standard configuration paths
pub const CONFIG_DIR: &str = "/etc/hellopad";
pub const USER_CONFIG_DIR: &str = "/roms/.hellopad";

/// Prefix for environment overrides, e.g. `HELLOPAD__MAPPER__COOLDOWN_MS=250`
pub const ENV_PREFIX: &str = "HELLOPAD";

/// Upper bound for the diagnostic input log
pub const MAX_INPUT_LOG_CAPACITY: usize = 10_000;

/// Main HelloPad configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelloPadConfig {
    #[serde(default)]
    pub detector: DetectorConfig,

    #[serde(default)]
    pub mapper: MapperConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

impl HelloPadConfig {
    /// Load configuration from a file, with environment overrides on top
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::layered(Some(path))
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        // Try user config first, then system config
        let user_config = Path::new(USER_CONFIG_DIR).join("config.toml");
        if user_config.exists() {
            return Self::load(&user_config);
        }

        let system_config = Path::new(CONFIG_DIR).join("config.toml");
        if system_config.exists() {
            return Self::load(&system_config);
        }

        tracing::warn!("No configuration file found, using defaults");
        Self::layered(None)
    }

    fn layered(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).format(config::FileFormat::Toml));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the detector cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let detector = &self.detector;
        let in_range = |v: f32| v > 0.0 && v <= 1.0;

        if !in_range(detector.axis_threshold) {
            return Err(ConfigError::Invalid(format!(
                "axis_threshold must be in (0, 1], got {}",
                detector.axis_threshold
            )));
        }
        if !in_range(detector.display_threshold) {
            return Err(ConfigError::Invalid(format!(
                "display_threshold must be in (0, 1], got {}",
                detector.display_threshold
            )));
        }
        if detector.display_threshold >= detector.axis_threshold {
            return Err(ConfigError::Invalid(
                "display_threshold must be below axis_threshold".to_string(),
            ));
        }
        if !(1..=MAX_INPUT_LOG_CAPACITY).contains(&detector.input_log_capacity) {
            return Err(ConfigError::Invalid(format!(
                "input_log_capacity must be in 1..={}, got {}",
                MAX_INPUT_LOG_CAPACITY, detector.input_log_capacity
            )));
        }
        Ok(())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Mapping store at the configured path
    pub fn mapping_file(&self) -> MappingFile {
        MappingFile::new(&self.paths.mapping_file)
    }
}
