//! # Classifier Service
//!
//! Runs any [`Classifier`] behind a channel pair under the classifier contract:
//! one response per request, same identifier, FIFO order. The loop ends when
//! the client drops its request sender, and the response sender is dropped
//! with it.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::channel::ServiceEndpoint;
use crate::error::MemErr;
use crate::messages::{Request, Response};

/// Failures a classifier implementation can report for one payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifierError {
    #[error("Payload rejected: {0}")]
    InvalidPayload(String),

    #[error("Model failure: {0}")]
    Model(String),
}

/// Turns a payload into a class label
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, payload: &[u8]) -> Result<i64, ClassifierError>;

    fn name(&self) -> &'static str;
}

#[async_trait]
impl<C: Classifier + ?Sized> Classifier for Arc<C> {
    async fn classify(&self, payload: &[u8]) -> Result<i64, ClassifierError> {
        (**self).classify(payload).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Reference classifier for 28x28 grayscale digit images.
///
/// Buckets the mean pixel intensity into ten classes. It is deterministic and
/// cheap, which is all the pipeline needs from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntensityClassifier;

impl IntensityClassifier {
    pub const CLASSES: i64 = 10;
}

#[async_trait]
impl Classifier for IntensityClassifier {
    async fn classify(&self, payload: &[u8]) -> Result<i64, ClassifierError> {
        if payload.is_empty() {
            return Err(ClassifierError::InvalidPayload("empty image".to_string()));
        }

        let total: u64 = payload.iter().map(|&b| u64::from(b)).sum();
        let mean = total / payload.len() as u64;
        Ok((mean as i64 * Self::CLASSES) / 256)
    }

    fn name(&self) -> &'static str {
        "intensity"
    }
}

/// Spawn the service loop for `classifier` on the current tokio runtime
pub fn spawn_classifier_service<C>(
    classifier: C,
    endpoint: ServiceEndpoint<Request, Response>,
) -> JoinHandle<u64>
where
    C: Classifier + 'static,
{
    tokio::spawn(run_classifier_service(classifier, endpoint))
}

/// Serve classification requests until the request stream ends.
///
/// Returns the number of requests answered.
pub async fn run_classifier_service<C: Classifier>(
    classifier: C,
    mut endpoint: ServiceEndpoint<Request, Response>,
) -> u64 {
    info!(classifier = classifier.name(), "🚀 Classifier service started");
    let mut answered = 0u64;

    while let Some(request) = endpoint.next_request().await {
        let response = match classifier.classify(&request.payload).await {
            Ok(value) => {
                debug!(request_id = request.id, value, "Classified payload");
                Response::success(request.id, value)
            }
            Err(err) => {
                debug!(request_id = request.id, error = %err, "Classification failed");
                Response::failure(
                    request.id,
                    MemErr::service_error(classifier.name(), Arc::new(err)),
                )
            }
        };

        if endpoint.respond(response).await.is_err() {
            warn!("Classifier client stopped reading responses");
            break;
        }
        answered += 1;
    }

    info!(answered, "🛑 Classifier service stopped");
    answered
}
