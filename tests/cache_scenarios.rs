// ==============================================
// CROSS-POLICY CACHE SCENARIOS (integration)
// ==============================================
//
// End-to-end behavioral contracts that span the policy layer: eviction
// order, the bijection invariant, LFU promotion monotonicity, the
// bucket-bounding flush, and the deliberate contract asymmetries between
// the two policies.

use listkit::policy::lfu::LfuCache;
use listkit::policy::lru::LruCache;
use listkit::traits::Cache;

// ==============================================
// LRU scenarios
// ==============================================

#[test]
fn lru_reference_scenario() {
    // capacity 3; set 1,2,3; get 1; set 4 → evicts 2 (the LRU),
    // leaving {1, 3, 4} with 1 refreshed and 4 most recent.
    let mut cache = LruCache::new(3);
    cache.set(1, "one");
    cache.set(2, "two");
    cache.set(3, "three");

    assert_eq!(cache.get(&1), Some(&"one"));
    cache.set(4, "four");

    assert!(cache.contains(&1));
    assert!(!cache.contains(&2));
    assert!(cache.contains(&3));
    assert!(cache.contains(&4));

    let order: Vec<u32> = cache.iter().map(|(k, _)| *k).collect();
    assert_eq!(order, vec![4, 1, 3]);
}

#[test]
fn lru_eviction_order_without_refresh() {
    let mut cache = LruCache::new(3);
    for key in 1..=4 {
        cache.set(key, key);
    }
    // No intervening get: the first-inserted key is the one evicted.
    assert!(!cache.contains(&1));
    assert_eq!(cache.len(), 3);
}

#[test]
fn lru_bijection_invariant_over_mixed_workload() {
    let mut cache = LruCache::new(8);
    for round in 0u32..5 {
        for key in 0u32..16 {
            cache.set(key, key * round);
        }
        for key in (0u32..16).step_by(2) {
            cache.get(&key);
        }
        for key in (0u32..16).step_by(5) {
            cache.delete(&key);
        }
        cache.flush();
        assert!(cache.check_invariants().is_ok());
        assert!(cache.len() <= 8);
    }
}

// ==============================================
// LFU scenarios
// ==============================================

#[test]
fn lfu_reference_scenario() {
    // capacity 2; a,b,c at freq 1; a → freq 2; b → freq 3; flush keeps the
    // freq-3 and freq-2 buckets, evicting c.
    let mut cache = LfuCache::new(2);
    cache.set("a", 1);
    cache.set("b", 2);
    cache.set("c", 3);

    cache.get(&"a");
    cache.get(&"b");
    cache.get(&"b");

    cache.flush();

    assert_eq!(cache.frequency(&"a"), Some(2));
    assert_eq!(cache.frequency(&"b"), Some(3));
    assert!(!cache.contains(&"c"));
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.bucket_count(), 2);
}

#[test]
fn lfu_promotion_is_strictly_monotonic() {
    let mut cache = LfuCache::new(0);
    cache.set("key", ());

    let mut frequencies = vec![cache.frequency(&"key").unwrap()];
    for _ in 0..10 {
        cache.get(&"key");
        frequencies.push(cache.frequency(&"key").unwrap());
    }

    // 1, 2, 3, ... with no plateaus and no skips.
    let expected: Vec<u64> = (1..=11).collect();
    assert_eq!(frequencies, expected);
}

#[test]
fn lfu_capacity_bounds_buckets_not_keys() {
    // A capacity-2 cache retains arbitrarily many keys when they cluster
    // into two frequency values.
    let mut cache = LfuCache::new(2);
    for key in 0..100 {
        cache.set(key, key);
    }
    for key in 0..40 {
        cache.get(&key);
    }

    cache.flush();
    assert_eq!(cache.bucket_count(), 2);
    assert_eq!(cache.len(), 100);

    // A third frequency value pushes the lowest bucket out on flush.
    cache.get(&0); // freq 3
    cache.flush();
    assert_eq!(cache.bucket_count(), 2);
    assert!(cache.contains(&0)); // freq 3, kept
    assert!(cache.contains(&39)); // freq 2, kept
    assert!(!cache.contains(&99)); // freq 1, dropped with its bucket
    assert_eq!(cache.len(), 40);
}

// ==============================================
// Contract asymmetries between the policies
// ==============================================

#[test]
fn delete_asymmetry_is_preserved() {
    let mut lru: LruCache<u32, i32> = LruCache::new(0);
    let mut lfu: LfuCache<u32, i32> = LfuCache::new(0);

    lru.set(1, 10);
    lfu.set(1, 10);

    // LRU reports presence accurately.
    assert!(lru.delete(&1));
    assert!(!lru.delete(&1));
    assert!(!lru.delete(&2));

    // LFU always reports success.
    assert!(lfu.delete(&1));
    assert!(lfu.delete(&1));
    assert!(lfu.delete(&2));
}

#[test]
fn duplicate_set_is_a_noop_in_both_policies() {
    let mut lru: LruCache<u32, &str> = LruCache::new(0);
    let mut lfu: LfuCache<u32, &str> = LfuCache::new(0);

    assert!(lru.set(1, "first"));
    assert!(lfu.set(1, "first"));
    assert!(!lru.set(1, "second"));
    assert!(!lfu.set(1, "second"));

    assert_eq!(lru.peek(&1), Some(&"first"));
    assert_eq!(lfu.peek(&1), Some(&"first"));
}

// ==============================================
// Generic consumption through the Cache trait
// ==============================================

fn churn<C: Cache<u32, u32>>(cache: &mut C) {
    for key in 0..20 {
        cache.set(key, key * 2);
    }
    for key in (0..20).step_by(3) {
        cache.get(&key);
    }
    for key in (0..20).step_by(7) {
        cache.delete(&key);
    }
    cache.flush();
}

#[test]
fn both_policies_work_behind_the_cache_trait() {
    let mut lru = LruCache::new(8);
    let mut lfu = LfuCache::new(8);

    churn(&mut lru);
    churn(&mut lfu);

    assert!(lru.len() <= 8);
    assert!(lru.check_invariants().is_ok());
    assert!(lfu.check_invariants().is_ok());

    // Peek through the trait without policy side effects.
    fn peek_all<C: Cache<u32, u32>>(cache: &C) -> usize {
        (0..20).filter(|key| cache.peek(key).is_some()).count()
    }
    assert_eq!(peek_all(&lru), lru.len());
    assert_eq!(peek_all(&lfu), lfu.len());
}
