//! # Least Recently Used (LRU) cache
//!
//! Recency-ordered cache built on [`LinkedList`] node handles: a hit is an
//! O(1) `move_to_front`, an eviction is an O(1) pop from the tail.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                       LruCache<K, V>                         │
//!   │                                                              │
//!   │   ┌──────────────────────────────────────────────────────┐   │
//!   │   │  index: FxHashMap<K, NodeHandle>                     │   │
//!   │   │                                                      │   │
//!   │   │  ┌─────────┬───────────────────────────────────┐     │   │
//!   │   │  │   Key   │  NodeHandle                       │     │   │
//!   │   │  ├─────────┼───────────────────────────────────┤     │   │
//!   │   │  │  k_1    │ ────────────────────────────────┐ │     │   │
//!   │   │  │  k_2    │ ──────────────────────────┐     │ │     │   │
//!   │   │  │  k_3    │ ────────────────────┐     │     │ │     │   │
//!   │   │  └─────────┴─────────────────────┼─────┼─────┼─┘     │   │
//!   │   └──────────────────────────────────┼─────┼─────┼───────┘   │
//!   │                                      ▼     ▼     ▼           │
//!   │   ┌──────────────────────────────────────────────────────┐   │
//!   │   │  list: LinkedList<Entry { key, value }>              │   │
//!   │   │                                                      │   │
//!   │   │  head ──► [k_1] ◄──► [k_2] ◄──► [k_3] ◄── tail       │   │
//!   │   │           (MRU)                 (LRU, evict first)   │   │
//!   │   └──────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Method       | Complexity | Description                                  |
//! |--------------|------------|----------------------------------------------|
//! | `set(k, v)`  | O(1)       | Insert at MRU; **no-op if key exists**       |
//! | `get(&k)`    | O(1)       | Return value, move node to MRU               |
//! | `peek(&k)`   | O(1)       | Return value without reordering              |
//! | `delete(&k)` | O(1)       | Remove entry; `true` iff it was present      |
//! | `pop_lru()`  | O(1)       | Remove and return the LRU entry              |
//! | `flush()`    | O(n)       | Drop everything past the `capacity` freshest |
//! | `clear()`    | O(n)       | Remove all entries                           |
//!
//! ## Contract fine print
//!
//! - **Duplicate `set` is a no-op.** First write wins; the value is not
//!   updated and the entry is not promoted. `set` returns `false` so the
//!   refusal is observable.
//! - **Capacity 0 means unbounded.** Eviction and `flush` only apply when
//!   a non-zero capacity is configured.
//!
//! ## Invariant
//!
//! The key index and the recency list are a bijection: every indexed key
//! resolves through its handle to a live node holding that exact key, and
//! `index.len() == list.len()` at every public-method boundary.
//!
//! ## Thread safety
//!
//! `LruCache` is single-threaded. [`ConcurrentLruCache`] (feature
//! `concurrency`) wraps it in a single `parking_lot::Mutex`, sufficient
//! because every public method both reads and mutates shared structure.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::linked_list::LinkedList;
use crate::ds::slot_arena::NodeHandle;
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::{LruMetrics, LruMetricsSnapshot};
use crate::traits::Cache;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Recency-list LRU cache with O(1) set/get/delete.
///
/// # Example
///
/// ```
/// use listkit::policy::lru::LruCache;
///
/// let mut cache = LruCache::new(3);
/// cache.set(1, "one");
/// cache.set(2, "two");
/// cache.set(3, "three");
///
/// // Refresh key 1, then overflow: key 2 is now the LRU and gets evicted.
/// cache.get(&1);
/// cache.set(4, "four");
///
/// assert!(cache.contains(&1));
/// assert!(!cache.contains(&2));
/// assert!(cache.contains(&3));
/// assert!(cache.contains(&4));
/// ```
pub struct LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    list: LinkedList<Entry<K, V>>,
    index: FxHashMap<K, NodeHandle>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache bounded to `capacity` entries; `0` means unbounded.
    ///
    /// # Example
    ///
    /// ```
    /// use listkit::policy::lru::LruCache;
    ///
    /// let cache: LruCache<u32, String> = LruCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            list: LinkedList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        }
    }

    /// Inserts a key/value pair at the MRU position.
    ///
    /// An existing key is a **no-op** returning `false`: the stored value is
    /// kept and the entry is not promoted. When a non-zero capacity is
    /// exceeded, the LRU entry is evicted from the tail.
    ///
    /// # Example
    ///
    /// ```
    /// use listkit::policy::lru::LruCache;
    ///
    /// let mut cache = LruCache::new(10);
    /// assert!(cache.set(1, "first"));
    /// assert!(!cache.set(1, "second")); // refused, first write wins
    /// assert_eq!(cache.get(&1), Some(&"first"));
    /// ```
    pub fn set(&mut self, key: K, value: V) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_set_call();

        if self.index.contains_key(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_set_ignored();
            return false;
        }

        let handle = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, handle);

        if self.capacity != 0 && self.list.len() > self.capacity {
            if let Some(evicted) = self.list.pop_back() {
                self.index.remove(&evicted.key);
                #[cfg(feature = "metrics")]
                self.metrics.record_eviction();
            }
        }

        #[cfg(debug_assertions)]
        self.debug_validate_invariants();

        true
    }

    /// Looks up a key; a hit moves the entry to the MRU position.
    ///
    /// # Example
    ///
    /// ```
    /// use listkit::policy::lru::LruCache;
    ///
    /// let mut cache = LruCache::new(10);
    /// cache.set(1, "value");
    ///
    /// assert_eq!(cache.get(&1), Some(&"value"));
    /// assert_eq!(cache.get(&99), None);
    /// ```
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let handle = match self.index.get(key) {
            Some(&handle) => handle,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                return None;
            },
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.list.move_to_front(handle);
        self.list.get(handle).map(|entry| &entry.value)
    }

    /// Looks up a key without touching the recency order.
    ///
    /// # Example
    ///
    /// ```
    /// use listkit::policy::lru::LruCache;
    ///
    /// let mut cache = LruCache::new(2);
    /// cache.set(1, "first");
    /// cache.set(2, "second");
    ///
    /// // Peek does not refresh: key 1 stays the eviction candidate.
    /// assert_eq!(cache.peek(&1), Some(&"first"));
    /// cache.set(3, "third");
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn peek(&self, key: &K) -> Option<&V> {
        let handle = *self.index.get(key)?;
        self.list.get(handle).map(|entry| &entry.value)
    }

    /// Removes a key; returns `true` iff it was present.
    ///
    /// (The LFU policy's `delete` always reports `true`; the two policies
    /// intentionally differ here.)
    ///
    /// # Example
    ///
    /// ```
    /// use listkit::policy::lru::LruCache;
    ///
    /// let mut cache = LruCache::new(10);
    /// cache.set(1, "value");
    ///
    /// assert!(cache.delete(&1));
    /// assert!(!cache.delete(&1));
    /// ```
    pub fn delete(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_delete();

        match self.index.remove(key) {
            Some(handle) => {
                self.list.remove(handle);
                #[cfg(debug_assertions)]
                self.debug_validate_invariants();
                true
            },
            None => false,
        }
    }

    /// Removes and returns the least recently used entry.
    ///
    /// # Example
    ///
    /// ```
    /// use listkit::policy::lru::LruCache;
    ///
    /// let mut cache = LruCache::new(10);
    /// cache.set(1, "first");
    /// cache.set(2, "second");
    ///
    /// assert_eq!(cache.pop_lru(), Some((1, "first")));
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let evicted = self.list.pop_back()?;
        self.index.remove(&evicted.key);
        #[cfg(feature = "metrics")]
        self.metrics.record_eviction();
        Some((evicted.key, evicted.value))
    }

    /// Re-enforces the capacity bound: keeps the `capacity` most recent
    /// entries and drops everything beyond them. No-op when the cache is
    /// within bounds or unbounded.
    ///
    /// # Example
    ///
    /// ```
    /// use listkit::policy::lru::LruCache;
    ///
    /// // Grow unbounded, re-bound, then trim in one shot.
    /// let mut cache = LruCache::new(0);
    /// for key in 0..5 {
    ///     cache.set(key, key);
    /// }
    /// cache.get(&0);
    ///
    /// cache.set_capacity(2);
    /// cache.flush();
    /// assert_eq!(cache.len(), 2);
    /// assert!(cache.contains(&0)); // refreshed, so it survived
    /// ```
    pub fn flush(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_flush();

        if self.capacity == 0 || self.list.len() <= self.capacity {
            return;
        }

        let doomed: Vec<K> = self
            .list
            .iter()
            .skip(self.capacity)
            .map(|entry| entry.key.clone())
            .collect();
        for key in &doomed {
            self.index.remove(key);
            #[cfg(feature = "metrics")]
            self.metrics.record_eviction();
        }
        self.list.shrink(self.capacity);

        #[cfg(debug_assertions)]
        self.debug_validate_invariants();
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the configured capacity; `0` means unbounded.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Re-bounds the cache without evicting; call [`flush`](Self::flush) to
    /// enforce the new bound.
    ///
    /// # Example
    ///
    /// ```
    /// use listkit::policy::lru::LruCache;
    ///
    /// let mut cache = LruCache::new(0);
    /// for key in 0..5 {
    ///     cache.set(key, key);
    /// }
    ///
    /// cache.set_capacity(2);
    /// assert_eq!(cache.len(), 5); // not enforced yet
    /// cache.flush();
    /// assert_eq!(cache.len(), 2);
    /// ```
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Returns `true` if the key is cached; does not affect recency.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns `(key, value)` pairs from most- to least-recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Validates the index/list bijection, returning the first violation.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_invariants()?;
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new("index size differs from list size"));
        }
        for (key, &handle) in &self.index {
            match self.list.get(handle) {
                Some(entry) if entry.key == *key => {},
                _ => {
                    return Err(InvariantError::new(
                        "index entry does not resolve to its node",
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
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            set_calls: self.metrics.set_calls,
            set_ignored: self.metrics.set_ignored,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            deletes: self.metrics.deletes,
            evictions: self.metrics.evictions,
            flush_calls: self.metrics.flush_calls,
            cache_len: self.len(),
            capacity: self.capacity,
        }
    }
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn set(&mut self, key: K, value: V) -> bool {
        LruCache::set(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        LruCache::get(self, key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        LruCache::peek(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        LruCache::delete(self, key)
    }

    fn flush(&mut self) {
        LruCache::flush(self)
    }

    fn clear(&mut self) {
        LruCache::clear(self)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn capacity(&self) -> usize {
        LruCache::capacity(self)
    }

    fn contains(&self, key: &K) -> bool {
        LruCache::contains(self, key)
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an unbounded cache (capacity 0).
    fn default() -> Self {
        Self::new(0)
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

/// Thread-safe LRU cache: a [`LruCache`] behind one `parking_lot::Mutex`.
///
/// Every operation takes the exclusive lock, since `get` reorders the recency
/// list, so even lookups mutate shared structure. Values are returned by
/// clone.
///
/// # Example
///
/// ```
/// use listkit::policy::lru::ConcurrentLruCache;
///
/// let cache: ConcurrentLruCache<u32, String> = ConcurrentLruCache::new(100);
/// cache.set(1, "one".to_string());
/// assert_eq!(cache.get(&1), Some("one".to_string()));
/// assert_eq!(cache.len(), 1);
/// ```
#[cfg(feature = "concurrency")]
pub struct ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: std::sync::Arc<parking_lot::Mutex<LruCache<K, V>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> Clone for ConcurrentLruCache<K, V>
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
impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a thread-safe cache bounded to `capacity`; `0` is unbounded.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: std::sync::Arc::new(parking_lot::Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Inserts a key/value pair; no-op `false` if the key exists.
    pub fn set(&self, key: K, value: V) -> bool {
        self.inner.lock().set(key, value)
    }

    /// Looks up a key, refreshing its recency; returns a clone of the value.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Looks up a key without reordering; returns a clone of the value.
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().peek(key).cloned()
    }

    /// Removes a key; returns `true` iff it was present.
    pub fn delete(&self, key: &K) -> bool {
        self.inner.lock().delete(key)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&self) -> Option<(K, V)> {
        self.inner.lock().pop_lru()
    }

    /// Re-enforces the capacity bound.
    pub fn flush(&self) {
        self.inner.lock().flush()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns the configured capacity; `0` means unbounded.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Returns `true` if the key is cached.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        self.inner.lock().metrics_snapshot()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> fmt::Debug for ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("ConcurrentLruCache")
            .field("len", &cache.len())
            .field("capacity", &cache.capacity())
            .finish_non_exhaustive()
    }
}
