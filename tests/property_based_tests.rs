mod common;

use std::collections::HashMap;

use classifier_memoizer::services::IntensityClassifier;
use classifier_memoizer::testing::RecordingClassifier;
use classifier_memoizer::CacheKey;
use common::strategies::*;
use common::*;
use proptest::prelude::*;

proptest! {
    /// Property: Key derivation depends only on payload content
    #[test]
    fn cache_keys_are_deterministic(payload in payload_strategy()) {
        let copy = payload.clone();
        prop_assert_eq!(CacheKey::from_payload(&payload), CacheKey::from_payload(&copy));
    }

    /// Property: Flipping a byte changes the key
    #[test]
    fn single_byte_change_changes_key(payload in payload_strategy(), index in any::<prop::sample::Index>()) {
        let mut changed = payload.clone();
        let i = index.index(changed.len());
        changed[i] ^= 0x01;
        prop_assert_ne!(CacheKey::from_payload(&payload), CacheKey::from_payload(&changed));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: Every response carries its request's id, repeated payloads
    /// get identical values, and each distinct payload is classified once
    #[test]
    fn memoized_workloads_are_consistent(workload in repeated_workload_strategy()) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();

        let (responses, recorder) = runtime.block_on(async {
            let recorder = RecordingClassifier::new(IntensityClassifier);
            let mut pipeline = spawn_pipeline(recorder.clone(), CacheMode::Healthy);
            let responses = pipeline.client.classify_batch(workload.clone()).await.unwrap();
            pipeline.finish().await;
            (responses, recorder)
        });

        prop_assert_eq!(responses.len(), workload.len());

        let mut seen: HashMap<&[u8], i64> = HashMap::new();
        for (offset, (payload, response)) in workload.iter().zip(&responses).enumerate() {
            prop_assert_eq!(response.id, offset as i64);
            prop_assert!(response.error.is_none());
            let value = *seen.entry(payload.as_slice()).or_insert(response.value);
            prop_assert_eq!(value, response.value);
        }

        for payload in seen.keys() {
            prop_assert_eq!(recorder.calls_for(payload), 1);
        }
    }
}

/// Sequential submissions never reach the classifier twice for one payload
#[test]
fn sequential_repeats_classify_once() {
    tokio_test::block_on(async {
        let recorder = RecordingClassifier::new(IntensityClassifier);
        let mut pipeline = spawn_pipeline(recorder.clone(), CacheMode::Healthy);

        for round in 0..3 {
            for seed in 0..4 {
                let response = pipeline.client.classify(digit_image(seed)).await.unwrap();
                assert!(response.error.is_none(), "round {round}: {:?}", response.error);
            }
        }

        for seed in 0..4 {
            assert_eq!(recorder.calls_for(&digit_image(seed)), 1);
        }
        let stats = pipeline.finish().await;
        assert_eq!(stats.cache_hits, 8);
    });
}
