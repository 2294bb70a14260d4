//! # Structured Logging Module
//!
//! Environment-aware structured logging for the memoizer pipeline. Console
//! output is human-readable by default and JSON when configured.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;
use crate::constants::ENV_ENVIRONMENT;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging. Later calls are no-ops.
///
/// `environment` picks the default level when neither `RUST_LOG` nor
/// `config.level` is set; pass [`MemoizerConfig::environment`](crate::config::MemoizerConfig::environment).
pub fn init_structured_logging(config: &LoggingConfig, environment: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = build_filter(config, environment);

        let layer = if config.json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // Another subscriber (e.g. from a host application) may already be installed
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            environment,
            json = config.json,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
pub fn detect_environment() -> String {
    std::env::var(ENV_ENVIRONMENT)
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn default_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

fn build_filter(config: &LoggingConfig, environment: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::try_new(filter_directive(config, environment))
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(environment)))
}

/// Configured level, else the environment default
fn filter_directive(config: &LoggingConfig, environment: &str) -> String {
    config
        .level
        .clone()
        .unwrap_or_else(|| default_log_level(environment).to_string())
}
