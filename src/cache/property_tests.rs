//! Property-Based Tests for the Durable Cache
//!
//! Uses proptest to verify the cache against a plain HashMap model and to
//! pin down the deterministic encoding.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::cache::{CacheEntry, DurableCache};
use crate::storage::MemoryStorage;

// == Strategies ==
/// Generates valid cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,32}"
}

/// Generates cache values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,64}"
}

/// A sequence of cache operations for model-based testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

fn fresh_cache() -> DurableCache<String> {
    DurableCache::new("prop", Box::new(MemoryStorage::new()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of set/delete operations, the cache agrees with a
    // plain HashMap model: same contents, same length.
    #[test]
    fn prop_model_consistency(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut cache = fresh_cache();
        let mut model: HashMap<String, String> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key.clone(), value.clone());
                    model.insert(key, value);
                }
                CacheOp::Delete { key } => {
                    cache.delete(&key);
                    model.remove(&key);
                }
            }
        }

        prop_assert_eq!(cache.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(cache.get(key), Some(value.clone()));
        }
    }

    // Storing a value and reading it back returns the value exactly.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let mut cache = fresh_cache();

        cache.set(key.clone(), value.clone());
        prop_assert_eq!(cache.get(&key), Some(value));
    }

    // Encoding the same state twice yields byte-identical blobs, and the
    // blob decodes back to the same contents.
    #[test]
    fn prop_encode_deterministic_and_decodable(
        ops in prop::collection::vec(cache_op_strategy(), 1..30)
    ) {
        let mut cache = fresh_cache();
        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value),
                CacheOp::Delete { key } => { cache.delete(&key); }
            }
        }

        let first = cache.encode().unwrap();
        let second = cache.encode().unwrap();
        prop_assert_eq!(&first, &second, "encode must be deterministic");

        let pairs: Vec<(String, CacheEntry<String>)> =
            serde_json::from_slice(&first).unwrap();
        prop_assert_eq!(pairs.len(), cache.len());
        for (key, entry) in pairs {
            prop_assert_eq!(cache.get(&key), Some(entry.value));
        }
    }

    // After a delete, the key reads as absent regardless of prior history.
    #[test]
    fn prop_delete_removes(key in key_strategy(), value in value_strategy()) {
        let mut cache = fresh_cache();

        cache.set(key.clone(), value);
        cache.delete(&key);
        prop_assert_eq!(cache.get(&key), None);
    }
}
