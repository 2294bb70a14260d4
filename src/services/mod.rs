//! # Upstream Services
//!
//! Reference implementations of the two services the memoizer consults, each
//! honoring its channel contract.

pub mod cache;
pub mod classifier;

pub use cache::{run_cache_service, spawn_cache_service, CacheStore};
pub use classifier::{
    run_classifier_service, spawn_classifier_service, Classifier, ClassifierError,
    IntensityClassifier,
};
