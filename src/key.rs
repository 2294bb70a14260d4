//! Cache key derivation.
//!
//! The key is the xxHash64 (seed 0) of the request payload. It is an index,
//! not an identity: two distinct payloads may collide, in which case the second
//! one is answered with the first one's cached value.

use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh64::xxh64;

const KEY_SEED: u64 = 0;

/// 64-bit cache index derived from a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(u64);

impl CacheKey {
    pub fn from_payload(payload: &[u8]) -> Self {
        Self(xxh64(payload, KEY_SEED))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for CacheKey {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
