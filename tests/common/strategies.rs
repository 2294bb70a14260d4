use proptest::prelude::*;

/// Strategy for generating image-like payloads (28x28 grayscale and smaller)
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 1..64),
        prop::collection::vec(any::<u8>(), 784..=784),
    ]
}

/// Strategy for a workload drawn from a small set of distinct payloads, so
/// that repeats (and therefore cache hits) are common
pub fn repeated_workload_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(payload_strategy(), 1..6).prop_flat_map(|distinct| {
        let choices = distinct.len();
        prop::collection::vec(0..choices, 1..40).prop_map(move |picks| {
            picks.into_iter().map(|i| distinct[i].clone()).collect()
        })
    })
}
