//! # Memoizer Core
//!
//! A single sequential worker. Each request is taken to completion (cache
//! lookup, classifier call, cache write, response) before the next request is
//! accepted, so responses leave in the order requests arrived.
//!
//! Routing per request:
//!
//! ```text
//! key = xxh64(payload)
//! cache available? ── lookup(key) ── hit with matching id ──▶ respond(cached)
//!        │                 │
//!        │            closed ─▶ degrade cache
//!        ▼
//! classifier available? ── call(request)
//!   closed           ─▶ degrade classifier, respond ServiceCrash
//!   error            ─▶ respond ServiceError (wrapped)
//!   id mismatch      ─▶ respond ServiceCorrupt
//!   ok               ─▶ cache write (fire and forget), respond unchanged
//! ```
//!
//! A degraded classifier is not called again: requests that miss the cache are
//! answered with `ServiceCrash` straight away, while cache hits keep flowing.

use std::sync::Arc;
use tracing::{debug, debug_span, info, warn, Instrument};

use super::dependency::{Dependency, DependencyState};
use super::stats::MemoizerStats;
use crate::channel::{ServiceChannel, ServiceEndpoint};
use crate::constants::{descriptions, services};
use crate::error::MemErr;
use crate::key::CacheKey;
use crate::messages::{CacheRequest, CacheResponse, Request, Response};

/// Memoizing stage between a caller, a classifier and a cache
#[derive(Debug)]
pub struct Memoizer {
    caller: ServiceEndpoint<Request, Response>,
    classifier: Dependency<Request, Response>,
    cache: Dependency<CacheRequest, CacheResponse>,
    stats: MemoizerStats,
}

impl Memoizer {
    pub fn new(
        caller: ServiceEndpoint<Request, Response>,
        classifier: ServiceChannel<Request, Response>,
        cache: ServiceChannel<CacheRequest, CacheResponse>,
    ) -> Self {
        Self {
            caller,
            classifier: Dependency::new(services::CLASSIFIER, classifier),
            cache: Dependency::new(services::CACHE, cache),
            stats: MemoizerStats::default(),
        }
    }

    pub fn classifier_state(&self) -> DependencyState {
        self.classifier.state()
    }

    pub fn cache_state(&self) -> DependencyState {
        self.cache.state()
    }

    /// Serve requests until the caller closes its request channel.
    ///
    /// Afterwards the response channel is closed and every dependency that is
    /// still available is told to shut down.
    pub async fn run(mut self) -> MemoizerStats {
        info!("🚀 Memoizer started");

        while let Some(request) = self.caller.next_request().await {
            let span = debug_span!("memoizer_request", request_id = request.id);
            let response = self.process(request).instrument(span).await;

            if self.caller.respond(response).await.is_err() {
                warn!(
                    service = services::CALLER,
                    "Caller stopped receiving responses, no longer accepting requests"
                );
                break;
            }
        }

        self.shutdown()
    }

    async fn process(&mut self, request: Request) -> Response {
        self.stats.requests += 1;
        let key = CacheKey::from_payload(&request.payload);

        if let Some(value) = self.lookup(key, request.id).await {
            self.stats.cache_hits += 1;
            debug!(key = %key, value, "Cache HIT");
            return Response::success(request.id, value);
        }

        self.stats.cache_misses += 1;
        debug!(key = %key, cache = %self.cache.state(), "Cache MISS");
        self.classify(request, key).await
    }

    /// Cached value for `key`, if the cache is available and answers for `id`
    async fn lookup(&mut self, key: CacheKey, id: i64) -> Option<i64> {
        let channel = self.cache.channel()?;

        match channel.call(CacheRequest::lookup(key, id)).await {
            Ok(reply) if reply.is_hit_for(id) => Some(reply.value),
            Ok(reply) => {
                if reply.exists {
                    warn!(
                        dependency = self.cache.name(),
                        expected_id = id,
                        reply_id = reply.id,
                        "Cache answered with a mismatched identifier, treating as miss"
                    );
                }
                None
            }
            Err(closed) => {
                self.cache.degrade(closed);
                None
            }
        }
    }

    async fn classify(&mut self, request: Request, key: CacheKey) -> Response {
        let id = request.id;

        let Some(channel) = self.classifier.channel() else {
            self.stats.crash_responses += 1;
            debug!("Classifier degraded, failing request without calling it");
            return Response::failure(id, MemErr::service_crash(descriptions::CLASSIFIER_CRASHED));
        };

        self.stats.classifier_calls += 1;
        let reply = match channel.call(request).await {
            Ok(reply) => reply,
            Err(closed) => {
                self.classifier.degrade(closed);
                self.stats.crash_responses += 1;
                return Response::failure(
                    id,
                    MemErr::service_crash(descriptions::CLASSIFIER_CRASHED),
                );
            }
        };

        if let Some(err) = &reply.error {
            self.stats.classifier_errors += 1;
            debug!(error = %err, "Classifier returned an error");
            return Response::failure(
                id,
                MemErr::service_error(descriptions::CLASSIFIER_ERROR, Arc::new(err.clone())),
            );
        }

        if reply.id != id {
            self.stats.corrupt_responses += 1;
            warn!(
                dependency = self.classifier.name(),
                expected_id = id,
                reply_id = reply.id,
                "Classifier answered with a mismatched identifier"
            );
            return Response::failure(
                id,
                MemErr::service_corrupt(descriptions::CLASSIFIER_BAD_IDENTIFIER),
            );
        }

        self.store(key, reply.value, id).await;
        reply
    }

    async fn store(&mut self, key: CacheKey, value: i64, id: i64) {
        let Some(channel) = self.cache.channel() else {
            return;
        };

        match channel.cast(CacheRequest::store(key, value, id)).await {
            Ok(()) => {
                self.stats.cache_writes += 1;
                debug!(key = %key, value, "Cache SET");
            }
            Err(closed) => self.cache.degrade(closed),
        }
    }

    fn shutdown(self) -> MemoizerStats {
        let Memoizer {
            caller,
            classifier,
            cache,
            mut stats,
        } = self;

        stats.classifier_state = classifier.state();
        stats.cache_state = cache.state();

        // Closing our response sender lets the caller observe end-of-stream
        drop(caller);
        classifier.shutdown();
        cache.shutdown();

        info!(
            requests = stats.requests,
            cache_hits = stats.cache_hits,
            classifier_calls = stats.classifier_calls,
            classifier = %stats.classifier_state,
            cache = %stats.cache_state,
            "🛑 Memoizer stopped"
        );

        stats
    }
}
