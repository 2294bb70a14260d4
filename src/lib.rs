#![allow(clippy::doc_markdown)] // Allow technical terms like xxHash64 in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Classifier Memoizer
//!
//! A memoizing stage that sits between a caller and two independent upstream
//! services: a classifier that turns payloads into labels, and a lookaside
//! cache keyed by a checksum of the payload.
//!
//! ## Overview
//!
//! Every boundary is a pair of bounded tokio channels. The memoizer consumes
//! caller requests one at a time, consults the cache, falls back to the
//! classifier on a miss, writes successful results back, and emits exactly one
//! response per request, in request order.
//!
//! ## Failure Isolation
//!
//! - **Cache unavailable**: silently degraded. Every later request goes
//!   straight to the classifier; the caller never sees a cache error.
//! - **Classifier unavailable**: the in-flight request gets `ServiceCrash`,
//!   the classifier is degraded and not called again. Cached results are still
//!   served.
//! - **Classifier error / wrong identifier**: surfaced as `ServiceError` /
//!   `ServiceCorrupt`, nothing is cached.
//!
//! Degradation is permanent. There are no retries and no timeouts.
//!
//! ## Module Organization
//!
//! - [`error`] - Per-request error taxonomy and crate errors
//! - [`messages`] - Request/response shapes for every channel pair
//! - [`key`] - Cache key derivation
//! - [`channel`] - Channel pairs and the synchronous call abstraction
//! - [`memoizer`] - The orchestration state machine
//! - [`services`] - Reference classifier and cache services
//! - [`client`] - Caller-side driver
//! - [`bootstrap`] - Pipeline wiring
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup
//! - [`testing`] - Test doubles
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use classifier_memoizer::{MemoizerConfig, MemoizerSystem};
//! use classifier_memoizer::services::IntensityClassifier;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MemoizerConfig::load()?;
//! classifier_memoizer::logging::init_structured_logging(&config.logging, &config.environment());
//!
//! let mut system = MemoizerSystem::start(&config, IntensityClassifier)?;
//! let image = vec![0u8; 784];
//! let cold = system.client().classify(image.clone()).await?;
//! let hot = system.client().classify(image).await?;
//! assert_eq!(cold.value, hot.value);
//!
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod channel;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod key;
pub mod logging;
pub mod memoizer;
pub mod messages;
pub mod services;
pub mod testing;

pub use bootstrap::{MemoizerSystem, ShutdownReport};
pub use channel::{service_channel, ChannelClosed, ServiceChannel, ServiceEndpoint};
pub use client::MemoizerClient;
pub use config::{ConfigurationError, MemoizerConfig};
pub use error::{MemErr, MemErrCause, MemoizerError, MemoizerResult};
pub use key::CacheKey;
pub use memoizer::{DependencyState, Memoizer, MemoizerStats};
pub use messages::{CacheRequest, CacheResponse, Request, Response};
