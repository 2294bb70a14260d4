//! Run statistics for a memoizer.

use serde::{Deserialize, Serialize};

use super::dependency::DependencyState;

/// Counters collected by a memoizer over its lifetime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoizerStats {
    /// Requests accepted from the caller
    pub requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Requests forwarded to the classifier
    pub classifier_calls: u64,
    /// Classifier responses that carried an error
    pub classifier_errors: u64,
    /// Classifier responses with a mismatched identifier
    pub corrupt_responses: u64,
    /// Requests answered with `ServiceCrash`
    pub crash_responses: u64,
    pub cache_writes: u64,
    pub classifier_state: DependencyState,
    pub cache_state: DependencyState,
}

impl Default for MemoizerStats {
    fn default() -> Self {
        Self {
            requests: 0,
            cache_hits: 0,
            cache_misses: 0,
            classifier_calls: 0,
            classifier_errors: 0,
            corrupt_responses: 0,
            crash_responses: 0,
            cache_writes: 0,
            classifier_state: DependencyState::Available,
            cache_state: DependencyState::Available,
        }
    }
}

impl MemoizerStats {
    /// Fraction of requests answered from the cache
    pub fn hit_rate(&self) -> f64 {
        if self.requests == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / self.requests as f64
    }
}
