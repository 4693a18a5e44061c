//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a plain HashMap model.

use proptest::prelude::*;
use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::{Cache, NO_EXPIRATION};

// == Test Configuration ==
// Sweeper never fires during a property run; sweeps are triggered explicitly.
const TEST_PURGE_INTERVAL: Duration = Duration::from_secs(3600);

fn test_cache() -> Cache<String> {
    Cache::new(TEST_PURGE_INTERVAL).unwrap()
}

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,32}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    Flush,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => Just(CacheOp::Flush),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Any sequence of operations leaves the cache agreeing with a HashMap,
    // and hit/miss counters match what `get` returned.
    #[test]
    fn prop_matches_hashmap_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let cache = test_cache();
        let mut model: HashMap<String, String> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key.clone(), value.clone(), NO_EXPIRATION);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let got = cache.get(&key);
                    prop_assert_eq!(got.as_ref(), model.get(&key));
                    if got.is_some() {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                }
                CacheOp::Delete { key } => {
                    cache.delete(&key);
                    model.remove(&key);
                }
                CacheOp::Flush => {
                    cache.flush();
                    model.clear();
                }
            }
            prop_assert_eq!(cache.item_count(), model.len());
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
    }

    // Deleting a present key lowers the count by exactly one; deleting an
    // absent key leaves it unchanged.
    #[test]
    fn prop_delete_adjusts_count(
        keys in prop::collection::hash_set(key_strategy(), 1..10),
        victim in key_strategy()
    ) {
        let cache = test_cache();
        for key in &keys {
            cache.set(key.clone(), "v".to_string(), NO_EXPIRATION);
        }

        let before = cache.item_count();
        cache.delete(&victim);

        let expected = if keys.contains(&victim) { before - 1 } else { before };
        prop_assert_eq!(cache.item_count(), expected);
        prop_assert!(cache.get(&victim).is_none());
    }

    // Entries without a lifespan survive any number of sweeps.
    #[test]
    fn prop_forever_entries_survive_sweeps(
        entries in prop::collection::hash_map(key_strategy(), value_strategy(), 1..10),
        sweeps in 1usize..10
    ) {
        let cache = test_cache();
        for (key, value) in &entries {
            cache.set(key.clone(), value.clone(), NO_EXPIRATION);
        }

        for _ in 0..sweeps {
            prop_assert_eq!(cache.purge_expired(), 0);
        }

        for (key, value) in &entries {
            let got = cache.get(key);
            prop_assert_eq!(got.as_ref(), Some(value));
        }
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // Once its lifespan has elapsed, one sweep removes the entry; entries
    // with a long lifespan or none at all are untouched.
    #[test]
    fn prop_sweep_evicts_only_elapsed(
        short in prop::collection::hash_set(key_strategy(), 1..5),
        value in value_strategy()
    ) {
        let cache = test_cache();
        for key in &short {
            cache.set(key.clone(), value.clone(), Duration::from_millis(5));
        }
        cache.set("long_lived", value.clone(), Duration::from_secs(3600));
        cache.set("forever", value.clone(), NO_EXPIRATION);

        // Visible before the sweep, even though nothing has expired yet
        for key in &short {
            prop_assert!(cache.get(key).is_some());
        }

        sleep(Duration::from_millis(20));

        prop_assert_eq!(cache.purge_expired(), short.len());
        for key in &short {
            prop_assert!(cache.get(key).is_none());
        }
        prop_assert_eq!(cache.item_count(), 2);
        prop_assert_eq!(cache.stats().tracked_entries, 1);
    }
}
