//! Pipeline wiring for integration tests.
//!
//! Unlike `MemoizerSystem`, the pieces here stay individually reachable so a
//! test can kill the cache or the classifier mid-run, or swap in a
//! misbehaving classifier loop.

#![allow(dead_code)]

use std::future::Future;
use tokio::task::JoinHandle;

use classifier_memoizer::services::{run_classifier_service, spawn_cache_service, CacheStore, Classifier};
use classifier_memoizer::{
    service_channel, Memoizer, MemoizerClient, MemoizerStats, Request, Response, ServiceEndpoint,
};

/// Small buffers so backpressure shows up quickly
pub const TEST_BUFFER_SIZE: usize = 4;

pub enum CacheMode {
    Healthy,
    /// Cache endpoint dropped before the first request
    Dead,
}

pub struct Pipeline {
    pub client: MemoizerClient,
    pub store: CacheStore,
    pub memoizer: JoinHandle<MemoizerStats>,
    pub classifier: JoinHandle<u64>,
    pub cache: Option<JoinHandle<()>>,
}

/// Wire a pipeline around `classifier` run by the reference classifier service
pub fn spawn_pipeline<C>(classifier: C, cache_mode: CacheMode) -> Pipeline
where
    C: Classifier + 'static,
{
    spawn_pipeline_with(
        move |endpoint| run_classifier_service(classifier, endpoint),
        cache_mode,
    )
}

/// Wire a pipeline around a hand-written classifier service loop
pub fn spawn_pipeline_with<F, Fut>(classifier_service: F, cache_mode: CacheMode) -> Pipeline
where
    F: FnOnce(ServiceEndpoint<Request, Response>) -> Fut,
    Fut: Future<Output = u64> + Send + 'static,
{
    let (caller_channel, caller_endpoint) = service_channel(TEST_BUFFER_SIZE);
    let (classifier_channel, classifier_endpoint) = service_channel(TEST_BUFFER_SIZE);
    let (cache_channel, cache_endpoint) = service_channel(TEST_BUFFER_SIZE);

    let store = CacheStore::new();
    let cache = match cache_mode {
        CacheMode::Healthy => Some(spawn_cache_service(store.clone(), cache_endpoint)),
        CacheMode::Dead => {
            drop(cache_endpoint);
            None
        }
    };

    let classifier = tokio::spawn(classifier_service(classifier_endpoint));
    let memoizer =
        tokio::spawn(Memoizer::new(caller_endpoint, classifier_channel, cache_channel).run());

    Pipeline {
        client: MemoizerClient::new(caller_channel),
        store,
        memoizer,
        classifier,
        cache,
    }
}

impl Pipeline {
    /// Stop the cache service; its channel ends are dropped with the task
    pub async fn kill_cache(&mut self) {
        if let Some(cache) = self.cache.take() {
            cache.abort();
            let _ = cache.await;
        }
    }

    /// Stop the classifier service; its channel ends are dropped with the task
    pub async fn kill_classifier(&mut self) {
        self.classifier.abort();
        let _ = (&mut self.classifier).await;
    }

    /// Close the request channel and collect the memoizer's stats
    pub async fn finish(self) -> MemoizerStats {
        let leftovers = self.client.close().await;
        assert!(leftovers.is_empty(), "unexpected responses: {leftovers:?}");
        self.memoizer.await.expect("memoizer task")
    }
}

/// Deterministic 28x28 grayscale test image
pub fn digit_image(seed: u8) -> Vec<u8> {
    (0..784u32)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed.wrapping_mul(17)))
        .collect()
}

/// Image whose mean intensity is `level`
pub fn flat_image(level: u8) -> Vec<u8> {
    vec![level; 784]
}
