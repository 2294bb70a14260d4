//! # System Constants
//!
//! Descriptions attached to [`MemErr`](crate::error::MemErr) values, dependency
//! names used in logs, and configuration defaults.

/// Error descriptions emitted by the memoizer
pub mod descriptions {
    pub const CLASSIFIER_CRASHED: &str = "Classifier crashed";
    pub const CLASSIFIER_ERROR: &str = "Classifier error";
    pub const CLASSIFIER_BAD_IDENTIFIER: &str = "Bad identifier from classifier";
}

/// Names of the services in the pipeline, used in logs and errors
pub mod services {
    pub const CALLER: &str = "caller";
    pub const MEMOIZER: &str = "memoizer";
    pub const CLASSIFIER: &str = "classifier";
    pub const CACHE: &str = "cache";
}

/// Default capacity of every bounded channel
pub const DEFAULT_CHANNEL_BUFFER_SIZE: usize = 100;

/// Prefix for environment overrides (`MEMOIZER__CHANNELS__CACHE_BUFFER_SIZE`)
pub const ENV_PREFIX: &str = "MEMOIZER";

/// Environment variable naming a TOML configuration file
pub const ENV_CONFIG_PATH: &str = "MEMOIZER_CONFIG";

/// Environment variable naming the deployment environment
pub const ENV_ENVIRONMENT: &str = "MEMOIZER_ENV";
