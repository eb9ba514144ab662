//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store's invariants over random operation
//! sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{glob_match, CacheStore};

// == Test Configuration ==
const TEST_MAX_SIZE: usize = 100;
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,32}"
}

fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}"
}

fn unique_keys(keys: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Has { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Has { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Hits and misses count `get` outcomes only; `has` never moves them.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let store = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => store.set(key, value),
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Has { key } => {
                    store.has(&key);
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.total_hits, expected_hits);
        prop_assert_eq!(stats.total_misses, expected_misses);
        prop_assert_eq!(stats.size, store.len());

        let total = expected_hits + expected_misses;
        if total == 0 {
            prop_assert_eq!(stats.hit_rate, 0.0);
        } else {
            let expected_rate = expected_hits as f64 / total as f64;
            prop_assert!((stats.hit_rate - expected_rate).abs() < 1e-12);
        }
    }

    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let store = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);

        store.set(key.clone(), value.clone());
        prop_assert_eq!(store.get(&key), Some(value));
    }

    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((valid_key_strategy(), valid_value_strategy()), 1..200)
    ) {
        let max_size = 50;
        let store = CacheStore::new(max_size, TEST_DEFAULT_TTL);

        for (key, value) in entries {
            store.set(key, value);
            prop_assert!(store.len() <= max_size, "size {} exceeds max {}", store.len(), max_size);
        }
    }

    // Filling to capacity, reading a random subset, then inserting one more
    // key evicts exactly the least recently read key.
    #[test]
    fn prop_lru_evicts_least_recently_accessed(
        keys in prop::collection::vec(valid_key_strategy(), 3..12),
        reads in prop::collection::vec(any::<prop::sample::Index>(), 0..20),
        new_key in valid_key_strategy()
    ) {
        let keys = unique_keys(keys);
        prop_assume!(keys.len() >= 2);
        prop_assume!(!keys.contains(&new_key));

        let store = CacheStore::new(keys.len(), TEST_DEFAULT_TTL);
        // Model of recency, oldest first
        let mut recency: Vec<String> = Vec::new();
        for key in &keys {
            store.set(key.clone(), format!("value_{}", key));
            recency.push(key.clone());
        }
        for index in reads {
            let key = index.get(&keys).clone();
            prop_assert!(store.get(&key).is_some());
            recency.retain(|k| k != &key);
            recency.push(key);
        }

        store.set(new_key.clone(), "new".to_string());

        let victim = &recency[0];
        prop_assert_eq!(store.len(), keys.len());
        prop_assert_eq!(store.stats().evictions, 1);
        prop_assert!(!store.has(victim), "{} should have been evicted", victim);
        for survivor in recency.iter().skip(1) {
            prop_assert!(store.has(survivor), "{} should survive", survivor);
        }
        prop_assert!(store.has(&new_key));
    }

    #[test]
    fn prop_keys_returns_only_matches(
        keys in prop::collection::vec(valid_key_strategy(), 1..30),
        prefix in "[a-z]{1,3}"
    ) {
        let store = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);
        for key in &keys {
            store.set(key.clone(), "v".to_string());
        }

        let pattern = format!("{}*", prefix);
        let listed = store.keys(&pattern);

        for key in &listed {
            prop_assert!(key.starts_with(&prefix));
        }
        let expected: HashSet<&String> = keys.iter().filter(|k| k.starts_with(&prefix)).collect();
        prop_assert_eq!(listed.len(), expected.len());
        prop_assert_eq!(store.stats().total_hits + store.stats().total_misses, 0);
    }

    #[test]
    fn prop_glob_star_matches_any_infix(
        head in "[a-z_]{0,8}",
        middle in "[a-zA-Z0-9:{}\",]{0,16}",
        tail in "[a-z_]{0,8}"
    ) {
        let key = format!("{}{}{}", head, middle, tail);
        let pattern = format!("{}*{}", head, tail);
        prop_assert!(glob_match(&pattern, &key));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Values read under concurrent writers are always whole values that some
    // writer stored, and capacity holds throughout.
    #[test]
    fn prop_concurrent_operation_correctness(
        operations in prop::collection::vec(cache_op_strategy(), 10..80)
    ) {
        let store = Arc::new(CacheStore::new(16, TEST_DEFAULT_TTL));
        let written: HashSet<String> = operations
            .iter()
            .filter_map(|op| match op {
                CacheOp::Set { value, .. } => Some(value.clone()),
                _ => None,
            })
            .collect();

        let handles: Vec<_> = operations
            .into_iter()
            .map(|op| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || match op {
                    CacheOp::Set { key, value } => {
                        store.set(key, value);
                        None
                    }
                    CacheOp::Get { key } => store.get(&key),
                    CacheOp::Has { key } => {
                        store.has(&key);
                        None
                    }
                    CacheOp::Delete { key } => {
                        store.delete(&key);
                        None
                    }
                })
            })
            .collect();

        for handle in handles {
            let read = handle.join().expect("worker panicked");
            if let Some(value) = read {
                prop_assert!(written.contains(&value), "read unknown value {:?}", value);
            }
            prop_assert!(store.len() <= 16);
        }

        let stats = store.stats();
        prop_assert!(stats.hit_rate >= 0.0 && stats.hit_rate <= 1.0);
    }
}
