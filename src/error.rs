//! # Error Taxonomy
//!
//! [`MemErr`] is the per-request error carried in the `error` field of a
//! [`Response`](crate::messages::Response). Its [`MemErrCause`] is a closed set:
//! every reason a request can fail maps to exactly one cause.
//!
//! [`MemoizerError`] covers everything outside the per-request protocol
//! (configuration, client-side channel failures, task joins).

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ConfigurationError;

/// Opaque upstream error carried by a [`MemErrCause::ServiceError`]
pub type WrappedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Why a request could not be satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemErrCause {
    /// Sentinel, no failure
    None,
    /// An upstream service reported a failure
    ServiceError,
    /// An upstream service's response path is permanently unavailable
    ServiceCrash,
    /// An upstream service answered with the wrong identifier
    ServiceCorrupt,
    /// Reserved for caller input validation
    BadArgument,
}

impl fmt::Display for MemErrCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemErrCause::None => "None",
            MemErrCause::ServiceError => "ServiceError",
            MemErrCause::ServiceCrash => "ServiceCrash",
            MemErrCause::ServiceCorrupt => "ServiceCorrupt",
            MemErrCause::BadArgument => "BadArgument",
        };
        f.write_str(name)
    }
}

/// Error returned to the caller for a request that could not be satisfied
#[derive(Clone)]
pub struct MemErr {
    cause: MemErrCause,
    description: String,
    /// Only populated for `ServiceError`
    wrapped: Option<WrappedError>,
}

impl MemErr {
    pub fn new(
        cause: MemErrCause,
        description: impl Into<String>,
        wrapped: Option<WrappedError>,
    ) -> Self {
        Self {
            cause,
            description: description.into(),
            wrapped,
        }
    }

    pub fn service_error(description: impl Into<String>, wrapped: WrappedError) -> Self {
        Self::new(MemErrCause::ServiceError, description, Some(wrapped))
    }

    pub fn service_crash(description: impl Into<String>) -> Self {
        Self::new(MemErrCause::ServiceCrash, description, None)
    }

    pub fn service_corrupt(description: impl Into<String>) -> Self {
        Self::new(MemErrCause::ServiceCorrupt, description, None)
    }

    pub fn bad_argument(description: impl Into<String>) -> Self {
        Self::new(MemErrCause::BadArgument, description, None)
    }

    pub fn cause(&self) -> MemErrCause {
        self.cause
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn wrapped(&self) -> Option<&WrappedError> {
        self.wrapped.as_ref()
    }

    /// Extract the cause from an opaque error value.
    ///
    /// # Panics
    ///
    /// Panics if `err` is not a [`MemErr`]. Every error that crosses the
    /// memoizer boundary is a `MemErr`, so anything else is a programming error.
    /// Use [`MemErr::try_cause_of`] when the error origin is unknown.
    pub fn cause_of(err: &(dyn StdError + 'static)) -> MemErrCause {
        match Self::try_cause_of(err) {
            Some(cause) => cause,
            None => panic!("error is not a MemErr: {err}"),
        }
    }

    /// Extract the cause from an opaque error value, if it is a [`MemErr`]
    pub fn try_cause_of(err: &(dyn StdError + 'static)) -> Option<MemErrCause> {
        err.downcast_ref::<MemErr>().map(MemErr::cause)
    }
}

impl fmt::Display for MemErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = &self.description;
        match self.cause {
            MemErrCause::None => write!(f, "No error to report ({desc})"),
            MemErrCause::ServiceError => match &self.wrapped {
                Some(inner) => write!(f, "Upstream service had an error ({desc}): {inner}"),
                None => write!(f, "Upstream service had an error ({desc})"),
            },
            MemErrCause::ServiceCrash => write!(f, "Upstream service failed ({desc})"),
            MemErrCause::ServiceCorrupt => {
                write!(f, "Upstream service returned bad results ({desc})")
            }
            MemErrCause::BadArgument => write!(f, "Bad client request ({desc})"),
        }
    }
}

impl fmt::Debug for MemErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemErr")
            .field("cause", &self.cause)
            .field("description", &self.description)
            .field("wrapped", &self.wrapped.as_ref().map(|e| e.to_string()))
            .finish()
    }
}

impl StdError for MemErr {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.wrapped
            .as_ref()
            .map(|e| &**e as &(dyn StdError + 'static))
    }
}

/// Crate-level errors outside the per-request protocol
#[derive(Debug, Error)]
pub enum MemoizerError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The other end of a channel pair went away while it was still in use
    #[error("{service} disconnected")]
    Disconnected { service: &'static str },

    /// A response arrived that does not belong to any outstanding request
    #[error("Unexpected response id {id} from {service}")]
    UnexpectedResponse { service: &'static str, id: i64 },

    /// Allocating `requested` more identifiers would overflow `i64`
    #[error("Request identifiers exhausted: cannot allocate {requested} after {next_id}")]
    IdsExhausted { next_id: i64, requested: usize },

    #[error("Background task failed: {0}")]
    TaskJoin(String),
}

impl From<tokio::task::JoinError> for MemoizerError {
    fn from(err: tokio::task::JoinError) -> Self {
        MemoizerError::TaskJoin(err.to_string())
    }
}

pub type MemoizerResult<T> = std::result::Result<T, MemoizerError>;
