//! # Least Frequently Used (LFU) cache
//!
//! Frequency-bucketed cache built on [`LinkedList`] node handles. The
//! backing list holds one node per **frequency bucket**; each bucket owns a
//! member map of every key currently at that access count. Promotion on a
//! hit is a pair of O(1) map moves plus an O(1) bucket lookup.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────────┐
//!   │                         LfuCache<K, V>                            │
//!   │                                                                   │
//!   │   spot: FxHashMap<K, NodeHandle>      (key → its bucket)          │
//!   │   by_freq: FxHashMap<u64, NodeHandle> (frequency → bucket)        │
//!   │                  │                                                │
//!   │                  ▼                                                │
//!   │   buckets: LinkedList<Bucket>                                     │
//!   │                                                                   │
//!   │   head ─► [freq: 1        ] ◄──► [freq: 2  ] ◄──► [freq: 5] ◄─tail│
//!   │           [members: {a, c}]      [members: ] ◄──  [{b}    ]       │
//!   │                                   (empty buckets linger)          │
//!   └───────────────────────────────────────────────────────────────────┘
//!
//!   get("a"):  remove "a" from freq-1 members → insert into freq-2
//!              members (bucket created on demand) → spot["a"] = freq-2
//! ```
//!
//! Buckets sit in **first-seen order**, not frequency order: `record`
//! appends a new bucket the first time a frequency is reached. Only
//! [`flush`](LfuCache::flush) sorts them.
//!
//! ## Contract fine print
//!
//! - **Capacity bounds buckets, not keys.** A capacity-2 cache retains
//!   arbitrarily many keys as long as they cluster into two frequency
//!   values; `flush` keeps the `capacity` highest-frequency buckets and
//!   evicts every key in the rest.
//! - **Duplicate `set` is a no-op** returning `false` (first write wins).
//! - **`delete` always returns `true`**, present or not, unlike the LRU
//!   policy's presence-reporting `delete`.
//! - **Empty buckets linger.** Promoting the last key out of a bucket
//!   leaves the empty bucket in the list; nothing reclaims it but `flush`
//!   (which may keep it if its frequency ranks high enough) and `clear`.
//!
//! ## Operations
//!
//! | Method         | Complexity | Description                             |
//! |----------------|------------|-----------------------------------------|
//! | `set(k, v)`    | O(1)       | Insert into the frequency-1 bucket      |
//! | `get(&k)`      | O(1)       | Promote to the `freq + 1` bucket        |
//! | `peek(&k)`     | O(1)       | Lookup without promotion                |
//! | `delete(&k)`   | O(1)       | Drop from its bucket; always `true`     |
//! | `flush()`      | O(b log b + n) | Sort buckets by frequency desc, keep `capacity` |
//! | `clear()`      | O(n)       | Remove everything                       |
//!
//! ## Thread safety
//!
//! `LfuCache` is single-threaded. [`ConcurrentLfuCache`] (feature
//! `concurrency`) wraps it in a single `parking_lot::Mutex`.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::linked_list::LinkedList;
use crate::ds::slot_arena::NodeHandle;
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::{LfuMetrics, LfuMetricsSnapshot};
use crate::traits::Cache;

#[derive(Debug)]
struct Bucket<K, V> {
    freq: u64,
    members: FxHashMap<K, V>,
}

/// Frequency-bucketed LFU cache with O(1) set/get/delete.
///
/// # Example
///
/// ```
/// use listkit::policy::lfu::LfuCache;
///
/// let mut cache = LfuCache::new(2);
/// cache.set("a", 1);
/// cache.set("b", 2);
/// cache.set("c", 3);
///
/// cache.get(&"a");            // "a" now at frequency 2
/// cache.get(&"b");
/// cache.get(&"b");            // "b" now at frequency 3
///
/// cache.flush();              // keep the 2 highest-frequency buckets
/// assert!(cache.contains(&"a"));
/// assert!(cache.contains(&"b"));
/// assert!(!cache.contains(&"c")); // frequency-1 bucket was dropped
/// ```
pub struct LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    buckets: LinkedList<Bucket<K, V>>,
    by_freq: FxHashMap<u64, NodeHandle>,
    spot: FxHashMap<K, NodeHandle>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LfuMetrics,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache bounded to `capacity` **buckets**; `0` means
    /// unbounded.
    ///
    /// # Example
    ///
    /// ```
    /// use listkit::policy::lfu::LfuCache;
    ///
    /// let cache: LfuCache<u32, String> = LfuCache::new(4);
    /// assert_eq!(cache.capacity(), 4);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            buckets: LinkedList::with_capacity(capacity),
            by_freq: FxHashMap::default(),
            spot: FxHashMap::default(),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LfuMetrics::default(),
        }
    }

    /// Inserts a key/value pair into the frequency-1 bucket.
    ///
    /// An existing key is a **no-op** returning `false`; neither the value
    /// nor the frequency changes. `set` never evicts; only
    /// [`flush`](Self::flush) bounds the cache.
    ///
    /// # Example
    ///
    /// ```
    /// use listkit::policy::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(0);
    /// assert!(cache.set(1, "first"));
    /// assert!(!cache.set(1, "second"));
    /// assert_eq!(cache.frequency(&1), Some(1));
    /// ```
    pub fn set(&mut self, key: K, value: V) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_set_call();

        if self.spot.contains_key(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_set_ignored();
            return false;
        }

        let handle = self.record(1);
        if let Some(bucket) = self.buckets.get_mut(handle) {
            bucket.members.insert(key.clone(), value);
        }
        self.spot.insert(key, handle);
        true
    }

    /// Looks up a key; a hit promotes it to the `freq + 1` bucket.
    ///
    /// The old bucket keeps its place in the list even if the promotion
    /// left it empty.
    ///
    /// # Example
    ///
    /// ```
    /// use listkit::policy::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(0);
    /// cache.set(1, "value");
    ///
    /// assert_eq!(cache.get(&1), Some(&"value"));
    /// assert_eq!(cache.frequency(&1), Some(2));
    /// assert_eq!(cache.get(&99), None);
    /// ```
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let old_handle = match self.spot.get(key) {
            Some(&handle) => handle,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                return None;
            },
        };

        let (freq, value) = {
            let bucket = self.buckets.get_mut(old_handle)?;
            let value = bucket.members.remove(key)?;
            (bucket.freq, value)
        };

        #[cfg(feature = "metrics")]
        {
            self.metrics.record_get_hit();
            self.metrics.record_promotion();
        }

        let new_handle = self.record(freq + 1);
        if let Some(bucket) = self.buckets.get_mut(new_handle) {
            bucket.members.insert(key.clone(), value);
        }
        self.spot.insert(key.clone(), new_handle);

        self.buckets
            .get(new_handle)
            .and_then(|bucket| bucket.members.get(key))
    }

    /// Looks up a key without promoting it.
    ///
    /// # Example
    ///
    /// ```
    /// use listkit::policy::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(0);
    /// cache.set(1, "value");
    ///
    /// assert_eq!(cache.peek(&1), Some(&"value"));
    /// assert_eq!(cache.frequency(&1), Some(1)); // unchanged
    /// ```
    pub fn peek(&self, key: &K) -> Option<&V> {
        let handle = *self.spot.get(key)?;
        self.buckets
            .get(handle)
            .and_then(|bucket| bucket.members.get(key))
    }

    /// Removes a key from its bucket's member map.
    ///
    /// **Always returns `true`**, whether or not the key was present. The
    /// LRU policy's `delete` reports presence instead; the two policies
    /// intentionally differ here.
    ///
    /// # Example
    ///
    /// ```
    /// use listkit::policy::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(0);
    /// cache.set(1, "value");
    ///
    /// assert!(cache.delete(&1));
    /// assert!(cache.delete(&1)); // absent, still true
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn delete(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_delete();

        if let Some(handle) = self.spot.remove(key) {
            if let Some(bucket) = self.buckets.get_mut(handle) {
                bucket.members.remove(key);
            }
        }
        true
    }

    /// Returns the access frequency recorded for `key`.
    ///
    /// # Example
    ///
    /// ```
    /// use listkit::policy::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(0);
    /// cache.set(1, "value");
    /// cache.get(&1);
    /// cache.get(&1);
    ///
    /// assert_eq!(cache.frequency(&1), Some(3));
    /// assert_eq!(cache.frequency(&99), None);
    /// ```
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let handle = *self.spot.get(key)?;
        self.buckets.get(handle).map(|bucket| bucket.freq)
    }

    /// Enforces the bucket bound: sorts buckets by frequency descending,
    /// keeps the first `capacity`, and evicts every key in the rest.
    ///
    /// Note the bound is on **buckets**, not keys; see the module docs.
    /// Sorting moves bucket payloads between list nodes, so both handle
    /// indices are rebuilt afterwards.
    ///
    /// # Example
    ///
    /// ```
    /// use listkit::policy::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(1);
    /// cache.set("hot", 1);
    /// cache.set("cold", 2);
    /// cache.get(&"hot");
    ///
    /// cache.flush(); // keeps only the frequency-2 bucket
    /// assert!(cache.contains(&"hot"));
    /// assert!(!cache.contains(&"cold"));
    /// ```
    pub fn flush(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_flush();

        if self.capacity == 0 || self.buckets.len() <= self.capacity {
            return;
        }

        self.buckets.sort_by(|a, b| b.freq.cmp(&a.freq));

        #[cfg(feature = "metrics")]
        {
            let dropped = (self.buckets.len() - self.capacity) as u64;
            self.metrics.record_buckets_dropped(dropped);
        }

        let doomed: Vec<K> = self
            .buckets
            .iter()
            .skip(self.capacity)
            .flat_map(|bucket| bucket.members.keys().cloned())
            .collect();
        for key in &doomed {
            self.spot.remove(key);
        }

        self.buckets.shrink(self.capacity);
        self.reindex();

        #[cfg(debug_assertions)]
        self.debug_validate_invariants();
    }

    /// Removes every key and every bucket.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.by_freq.clear();
        self.spot.clear();
    }

    /// Returns the number of cached **keys**.
    pub fn len(&self) -> usize {
        self.spot.len()
    }

    /// Returns `true` if no keys are cached.
    pub fn is_empty(&self) -> bool {
        self.spot.is_empty()
    }

    /// Returns the number of frequency buckets, lingering empties included.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the configured **bucket** capacity; `0` means unbounded.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Re-bounds the cache without evicting; call [`flush`](Self::flush) to
    /// enforce the new bound.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Returns `true` if the key is cached; does not affect its frequency.
    pub fn contains(&self, key: &K) -> bool {
        self.spot.contains_key(key)
    }

    /// Validates the spot/bucket bijection and index maps.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.buckets.check_invariants()?;

        if self.by_freq.len() != self.buckets.len() {
            return Err(InvariantError::new(
                "frequency index size differs from bucket count",
            ));
        }
        for (&freq, &handle) in &self.by_freq {
            match self.buckets.get(handle) {
                Some(bucket) if bucket.freq == freq => {},
                _ => {
                    return Err(InvariantError::new(
                        "frequency index entry does not resolve to its bucket",
                    ))
                },
            }
        }

        let member_total: usize = self
            .buckets
            .iter()
            .map(|bucket| bucket.members.len())
            .sum();
        if member_total != self.spot.len() {
            return Err(InvariantError::new(
                "spot index size differs from bucket membership total",
            ));
        }
        for (key, &handle) in &self.spot {
            match self.buckets.get(handle) {
                Some(bucket) if bucket.members.contains_key(key) => {},
                _ => {
                    return Err(InvariantError::new(
                        "spot entry does not resolve to a bucket holding its key",
                    ))
                },
            }
        }

        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("{err}");
        }
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        LfuMetricsSnapshot {
            set_calls: self.metrics.set_calls,
            set_ignored: self.metrics.set_ignored,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            promotions: self.metrics.promotions,
            deletes: self.metrics.deletes,
            buckets_dropped: self.metrics.buckets_dropped,
            flush_calls: self.metrics.flush_calls,
            key_count: self.len(),
            bucket_count: self.bucket_count(),
            capacity: self.capacity,
        }
    }

    // Returns the bucket for an exact frequency, appending a new one in
    // first-seen order if it does not exist yet.
    fn record(&mut self, frequency: u64) -> NodeHandle {
        if let Some(&handle) = self.by_freq.get(&frequency) {
            if self.buckets.contains_handle(handle) {
                return handle;
            }
        }
        let handle = self.buckets.push_back(Bucket {
            freq: frequency,
            members: FxHashMap::default(),
        });
        self.by_freq.insert(frequency, handle);
        handle
    }

    // Repoints by_freq and spot after a structural pass re-seated bucket
    // payloads across nodes.
    fn reindex(&mut self) {
        self.by_freq.clear();
        let entries: Vec<(NodeHandle, u64, Vec<K>)> = self
            .buckets
            .iter_entries()
            .map(|(handle, bucket)| {
                (handle, bucket.freq, bucket.members.keys().cloned().collect())
            })
            .collect();
        for (handle, freq, keys) in entries {
            self.by_freq.insert(freq, handle);
            for key in keys {
                self.spot.insert(key, handle);
            }
        }
    }
}

impl<K, V> Cache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn set(&mut self, key: K, value: V) -> bool {
        LfuCache::set(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        LfuCache::get(self, key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        LfuCache::peek(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        LfuCache::delete(self, key)
    }

    fn flush(&mut self) {
        LfuCache::flush(self)
    }

    fn clear(&mut self) {
        LfuCache::clear(self)
    }

    fn len(&self) -> usize {
        LfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        LfuCache::capacity(self)
    }

    fn contains(&self, key: &K) -> bool {
        LfuCache::contains(self, key)
    }
}

impl<K, V> fmt::Debug for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("keys", &self.len())
            .field("buckets", &self.bucket_count())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an unbounded cache (capacity 0).
    fn default() -> Self {
        Self::new(0)
    }
}

impl<K, V> Extend<(K, V)> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

/// Thread-safe LFU cache: a [`LfuCache`] behind one `parking_lot::Mutex`.
///
/// Every operation takes the exclusive lock, since `get` rewrites bucket
/// membership, so even lookups mutate shared structure. Values are returned
/// by clone.
///
/// # Example
///
/// ```
/// use listkit::policy::lfu::ConcurrentLfuCache;
///
/// let cache: ConcurrentLfuCache<u32, String> = ConcurrentLfuCache::new(4);
/// cache.set(1, "one".to_string());
/// assert_eq!(cache.get(&1), Some("one".to_string()));
/// assert_eq!(cache.frequency(&1), Some(2));
/// ```
#[cfg(feature = "concurrency")]
pub struct ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: std::sync::Arc<parking_lot::Mutex<LfuCache<K, V>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> Clone for ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: std::sync::Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a thread-safe cache bounded to `capacity` buckets; `0` is
    /// unbounded.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: std::sync::Arc::new(parking_lot::Mutex::new(LfuCache::new(capacity))),
        }
    }

    /// Inserts a key/value pair; no-op `false` if the key exists.
    pub fn set(&self, key: K, value: V) -> bool {
        self.inner.lock().set(key, value)
    }

    /// Looks up a key, promoting it; returns a clone of the value.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Looks up a key without promotion; returns a clone of the value.
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().peek(key).cloned()
    }

    /// Removes a key; always returns `true` (see [`LfuCache::delete`]).
    pub fn delete(&self, key: &K) -> bool {
        self.inner.lock().delete(key)
    }

    /// Returns the access frequency recorded for `key`.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.lock().frequency(key)
    }

    /// Enforces the bucket bound.
    pub fn flush(&self) {
        self.inner.lock().flush()
    }

    /// Removes every key and bucket.
    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    /// Returns the number of cached keys.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if no keys are cached.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns the number of frequency buckets.
    pub fn bucket_count(&self) -> usize {
        self.inner.lock().bucket_count()
    }

    /// Returns the configured bucket capacity; `0` means unbounded.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Returns `true` if the key is cached.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        self.inner.lock().metrics_snapshot()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> fmt::Debug for ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("ConcurrentLfuCache")
            .field("keys", &cache.len())
            .field("buckets", &cache.bucket_count())
            .field("capacity", &cache.capacity())
            .finish_non_exhaustive()
    }
}
