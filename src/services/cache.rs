//! # Cache Service
//!
//! In-memory lookaside store behind a channel pair. Lookups get exactly one
//! [`CacheResponse`]; writes are applied and never answered. Entries are never
//! evicted.
//!
//! The store is a [`CacheStore`] handle that can be cloned and inspected while
//! the service is running.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::channel::ServiceEndpoint;
use crate::key::CacheKey;
use crate::messages::{CacheRequest, CacheResponse};

/// Shared key/value storage of the cache service
#[derive(Debug, Clone, Default)]
pub struct CacheStore {
    entries: Arc<DashMap<u64, i64>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: CacheKey) -> Option<i64> {
        self.entries.get(&key.value()).map(|entry| *entry)
    }

    pub fn insert(&self, key: CacheKey, value: i64) {
        self.entries.insert(key.value(), value);
    }

    pub fn contains(&self, key: CacheKey) -> bool {
        self.entries.contains_key(&key.value())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply one request; lookups produce a reply, writes do not
    pub fn handle(&self, request: CacheRequest) -> Option<CacheResponse> {
        let key = CacheKey::from(request.key);

        if request.write {
            self.insert(key, request.value);
            debug!(key = %key, value = request.value, "Cache SET");
            return None;
        }

        let reply = match self.get(key) {
            Some(value) => {
                debug!(key = %key, "Cache HIT");
                CacheResponse::hit(request.id, value)
            }
            None => {
                debug!(key = %key, "Cache MISS");
                CacheResponse::miss(request.id)
            }
        };
        Some(reply)
    }
}

/// Spawn the cache service loop on the current tokio runtime
pub fn spawn_cache_service(
    store: CacheStore,
    endpoint: ServiceEndpoint<CacheRequest, CacheResponse>,
) -> JoinHandle<()> {
    tokio::spawn(run_cache_service(store, endpoint))
}

/// Serve cache requests until the request stream ends
pub async fn run_cache_service(
    store: CacheStore,
    mut endpoint: ServiceEndpoint<CacheRequest, CacheResponse>,
) {
    info!(entries = store.len(), "🚀 Cache service started");

    while let Some(request) = endpoint.next_request().await {
        let Some(reply) = store.handle(request) else {
            continue;
        };
        if endpoint.respond(reply).await.is_err() {
            warn!("Cache client stopped reading responses");
            break;
        }
    }

    info!(entries = store.len(), "🛑 Cache service stopped");
}
