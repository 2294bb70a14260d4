//! # Protocol Messages
//!
//! Message shapes exchanged over the three channel pairs: caller ↔ memoizer,
//! memoizer ↔ classifier (both carry [`Request`]/[`Response`]) and
//! memoizer ↔ cache ([`CacheRequest`]/[`CacheResponse`]).

use serde::{Deserialize, Serialize};

use crate::error::{MemErr, MemErrCause};
use crate::key::CacheKey;

/// A unit of work submitted by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Unique among the requests in flight on one channel pair
    pub id: i64,
    /// Opaque bytes, e.g. an image
    pub payload: Vec<u8>,
}

impl Request {
    pub fn new(id: i64, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }
}

/// Result of a [`Request`]; exactly one is produced per request
#[derive(Debug, Clone)]
pub struct Response {
    pub value: i64,
    pub id: i64,
    pub error: Option<MemErr>,
}

impl Response {
    pub fn success(id: i64, value: i64) -> Self {
        Self {
            value,
            id,
            error: None,
        }
    }

    /// Failed response. The value carries no meaning.
    pub fn failure(id: i64, error: MemErr) -> Self {
        Self {
            value: 0,
            id,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// `MemErrCause::None` when the response carries no error
    pub fn cause(&self) -> MemErrCause {
        self.error
            .as_ref()
            .map_or(MemErrCause::None, MemErr::cause)
    }
}

/// Lookup (`write == false`) or fire-and-forget store (`write == true`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRequest {
    pub write: bool,
    pub key: u64,
    pub value: i64,
    pub id: i64,
}

impl CacheRequest {
    pub fn lookup(key: CacheKey, id: i64) -> Self {
        Self {
            write: false,
            key: key.value(),
            value: 0,
            id,
        }
    }

    pub fn store(key: CacheKey, value: i64, id: i64) -> Self {
        Self {
            write: true,
            key: key.value(),
            value,
            id,
        }
    }
}

/// Reply to a lookup; writes never get one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheResponse {
    pub exists: bool,
    pub value: i64,
    pub id: i64,
}

impl CacheResponse {
    pub fn hit(id: i64, value: i64) -> Self {
        Self {
            exists: true,
            value,
            id,
        }
    }

    pub fn miss(id: i64) -> Self {
        Self {
            exists: false,
            value: 0,
            id,
        }
    }

    /// A reply only counts as a hit for the request that asked for it
    pub fn is_hit_for(&self, request_id: i64) -> bool {
        self.exists && self.id == request_id
    }
}
