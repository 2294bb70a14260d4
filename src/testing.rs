//! # Test Doubles
//!
//! Classifiers for exercising the pipeline in tests and benchmarks.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::services::{Classifier, ClassifierError};

/// Wraps a classifier and records every payload it is asked to classify.
///
/// Clones share the same call log, so a test can keep one clone and hand the
/// other to the pipeline.
#[derive(Debug, Clone)]
pub struct RecordingClassifier<C> {
    inner: C,
    calls: Arc<Mutex<Vec<Vec<u8>>>>,
    delay: Option<Duration>,
}

impl<C: Classifier> RecordingClassifier<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Sleep for `delay` before every classification
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<Vec<u8>> {
        self.calls.lock().clone()
    }

    /// How many times `payload` was classified
    pub fn calls_for(&self, payload: &[u8]) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|seen| seen.as_slice() == payload)
            .count()
    }
}

#[async_trait]
impl<C: Classifier> Classifier for RecordingClassifier<C> {
    async fn classify(&self, payload: &[u8]) -> Result<i64, ClassifierError> {
        self.calls.lock().push(payload.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.classify(payload).await
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Answers every payload with the same result
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    result: Result<i64, ClassifierError>,
}

impl FixedClassifier {
    pub fn value(value: i64) -> Self {
        Self { result: Ok(value) }
    }

    pub fn failing(error: ClassifierError) -> Self {
        Self { result: Err(error) }
    }
}

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(&self, _payload: &[u8]) -> Result<i64, ClassifierError> {
        self.result.clone()
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
