//! # Pipeline Bootstrap
//!
//! Wires a caller, the memoizer, a classifier service and a cache service
//! together with bounded channels sized from [`ChannelsConfig`], and spawns
//! the three service loops on the current tokio runtime.
//!
//! ```rust,no_run
//! use classifier_memoizer::bootstrap::MemoizerSystem;
//! use classifier_memoizer::config::MemoizerConfig;
//! use classifier_memoizer::services::IntensityClassifier;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MemoizerConfig::load()?;
//! let mut system = MemoizerSystem::start(&config, IntensityClassifier)?;
//!
//! let response = system.client().classify(vec![0u8; 784]).await?;
//! println!("class {} for request {}", response.value, response.id);
//!
//! let report = system.shutdown().await?;
//! println!("hit rate {:.2}", report.memoizer.hit_rate());
//! # Ok(())
//! # }
//! ```

use tokio::task::JoinHandle;
use tracing::info;

use crate::channel::service_channel;
use crate::client::MemoizerClient;
use crate::config::{ChannelsConfig, MemoizerConfig};
use crate::error::MemoizerResult;
use crate::memoizer::{Memoizer, MemoizerStats};
use crate::services::{spawn_cache_service, spawn_classifier_service, CacheStore, Classifier};

/// Handle to a running pipeline
#[derive(Debug)]
pub struct MemoizerSystem {
    client: MemoizerClient,
    cache_store: CacheStore,
    memoizer: JoinHandle<MemoizerStats>,
    classifier: JoinHandle<u64>,
    cache: JoinHandle<()>,
}

/// Final state of a pipeline after shutdown
#[derive(Debug, Clone)]
pub struct ShutdownReport {
    pub memoizer: MemoizerStats,
    /// Requests the classifier service answered
    pub classifier_answered: u64,
    /// Entries left in the cache store
    pub cache_entries: usize,
    /// Responses that were still in flight when the client closed
    pub leftover_responses: usize,
}

impl MemoizerSystem {
    /// Validate `config`, wire the channels and spawn every service
    pub fn start<C>(config: &MemoizerConfig, classifier: C) -> MemoizerResult<Self>
    where
        C: Classifier + 'static,
    {
        config.validate()?;
        Self::start_with_store(&config.channels, classifier, CacheStore::new())
    }

    /// Start with a pre-populated (or shared) cache store
    pub fn start_with_store<C>(
        channels: &ChannelsConfig,
        classifier: C,
        cache_store: CacheStore,
    ) -> MemoizerResult<Self>
    where
        C: Classifier + 'static,
    {
        channels.validate()?;

        let (caller_channel, caller_endpoint) = service_channel(channels.caller_buffer_size);
        let (classifier_channel, classifier_endpoint) =
            service_channel(channels.classifier_buffer_size);
        let (cache_channel, cache_endpoint) = service_channel(channels.cache_buffer_size);

        info!(
            classifier = classifier.name(),
            caller_buffer_size = channels.caller_buffer_size,
            classifier_buffer_size = channels.classifier_buffer_size,
            cache_buffer_size = channels.cache_buffer_size,
            "🔧 BOOTSTRAP: Starting memoizer pipeline"
        );

        let classifier = spawn_classifier_service(classifier, classifier_endpoint);
        let cache = spawn_cache_service(cache_store.clone(), cache_endpoint);
        let memoizer = tokio::spawn(
            Memoizer::new(caller_endpoint, classifier_channel, cache_channel).run(),
        );

        Ok(Self {
            client: MemoizerClient::new(caller_channel),
            cache_store,
            memoizer,
            classifier,
            cache,
        })
    }

    pub fn client(&mut self) -> &mut MemoizerClient {
        &mut self.client
    }

    pub fn cache_store(&self) -> &CacheStore {
        &self.cache_store
    }

    /// Close the request channel and wait for every service to stop
    pub async fn shutdown(self) -> MemoizerResult<ShutdownReport> {
        let leftovers = self.client.close().await;
        let memoizer = self.memoizer.await?;
        let classifier_answered = self.classifier.await?;
        self.cache.await?;

        let report = ShutdownReport {
            memoizer,
            classifier_answered,
            cache_entries: self.cache_store.len(),
            leftover_responses: leftovers.len(),
        };
        info!(
            requests = report.memoizer.requests,
            cache_hits = report.memoizer.cache_hits,
            cache_entries = report.cache_entries,
            "🛑 BOOTSTRAP: Memoizer pipeline stopped"
        );
        Ok(report)
    }
}
