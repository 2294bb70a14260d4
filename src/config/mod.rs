//! # Configuration Management
//!
//! Layered configuration for the memoizer pipeline:
//!
//! 1. Built-in defaults ([`MemoizerConfig::default`])
//! 2. An optional TOML file (explicit path, or `MEMOIZER_CONFIG`)
//! 3. Environment overrides, e.g. `MEMOIZER__CHANNELS__CALLER_BUFFER_SIZE=256`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use classifier_memoizer::config::MemoizerConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MemoizerConfig::load()?;
//! println!("caller buffer: {}", config.channels.caller_buffer_size);
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::{ConfigResult, ConfigurationError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::constants::{DEFAULT_CHANNEL_BUFFER_SIZE, ENV_CONFIG_PATH, ENV_PREFIX};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MemoizerConfig {
    /// Deployment environment name (`development`, `test`, `production`)
    pub environment: Option<String>,
    pub channels: ChannelsConfig,
    pub logging: LoggingConfig,
}

/// Bounded channel capacities for the three channel pairs.
///
/// Each capacity applies to both directions of its pair.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChannelsConfig {
    /// Caller ↔ memoizer
    pub caller_buffer_size: usize,
    /// Memoizer ↔ classifier
    pub classifier_buffer_size: usize,
    /// Memoizer ↔ cache
    pub cache_buffer_size: usize,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            caller_buffer_size: DEFAULT_CHANNEL_BUFFER_SIZE,
            classifier_buffer_size: DEFAULT_CHANNEL_BUFFER_SIZE,
            cache_buffer_size: DEFAULT_CHANNEL_BUFFER_SIZE,
        }
    }
}

impl ChannelsConfig {
    /// Every bounded channel needs a capacity of at least 1
    pub fn validate(&self) -> ConfigResult<()> {
        let sizes = [
            ("channels.caller_buffer_size", self.caller_buffer_size),
            ("channels.classifier_buffer_size", self.classifier_buffer_size),
            ("channels.cache_buffer_size", self.cache_buffer_size),
        ];
        for (field, size) in sizes {
            if size == 0 {
                return Err(ConfigurationError::invalid_value(
                    field,
                    size,
                    "bounded channels need a capacity of at least 1",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive; falls back to `RUST_LOG`, then to the environment default
    pub level: Option<String>,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl MemoizerConfig {
    /// Load configuration from defaults, `MEMOIZER_CONFIG` and the environment
    pub fn load() -> ConfigResult<Self> {
        let path = std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from);
        Self::load_from(path.as_deref())
    }

    /// Load configuration with an explicit (optional) TOML file
    pub fn load_from(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading memoizer configuration file");
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;

        debug!(
            config = %serde_json::to_string(&config).unwrap_or_else(|_| "[serialization error]".to_string()),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.channels.validate()?;

        if let Some(level) = &self.logging.level {
            EnvFilter::try_new(level).map_err(|e| {
                ConfigurationError::invalid_value("logging.level", level, e.to_string())
            })?;
        }

        Ok(())
    }

    /// Environment from config, else `MEMOIZER_ENV`/`APP_ENV`, else `development`
    pub fn environment(&self) -> String {
        self.environment
            .clone()
            .unwrap_or_else(crate::logging::detect_environment)
    }
}
