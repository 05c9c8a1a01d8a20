//! Operation counters for the cache policies (feature `metrics`).
//!
//! Each policy core owns a plain counter struct and records into it from the
//! hot paths; `metrics_snapshot()` on a cache copies the counters out
//! together with the current size/capacity. Counters are plain `u64`s: the
//! cores are single-threaded, so no atomics are needed, and the concurrent
//! wrappers snapshot under their lock.

/// Counters recorded by [`LruCache`](crate::policy::lru::LruCache).
#[derive(Debug, Default)]
pub struct LruMetrics {
    pub(crate) set_calls: u64,
    pub(crate) set_ignored: u64,
    pub(crate) get_hits: u64,
    pub(crate) get_misses: u64,
    pub(crate) deletes: u64,
    pub(crate) evictions: u64,
    pub(crate) flush_calls: u64,
}

impl LruMetrics {
    pub(crate) fn record_set_call(&mut self) {
        self.set_calls += 1;
    }

    pub(crate) fn record_set_ignored(&mut self) {
        self.set_ignored += 1;
    }

    pub(crate) fn record_get_hit(&mut self) {
        self.get_hits += 1;
    }

    pub(crate) fn record_get_miss(&mut self) {
        self.get_misses += 1;
    }

    pub(crate) fn record_delete(&mut self) {
        self.deletes += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_flush(&mut self) {
        self.flush_calls += 1;
    }
}

/// Point-in-time copy of [`LruMetrics`] plus cache size/capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LruMetricsSnapshot {
    pub set_calls: u64,
    pub set_ignored: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub deletes: u64,
    pub evictions: u64,
    pub flush_calls: u64,
    pub cache_len: usize,
    pub capacity: usize,
}

/// Counters recorded by [`LfuCache`](crate::policy::lfu::LfuCache).
#[derive(Debug, Default)]
pub struct LfuMetrics {
    pub(crate) set_calls: u64,
    pub(crate) set_ignored: u64,
    pub(crate) get_hits: u64,
    pub(crate) get_misses: u64,
    pub(crate) promotions: u64,
    pub(crate) deletes: u64,
    pub(crate) buckets_dropped: u64,
    pub(crate) flush_calls: u64,
}

impl LfuMetrics {
    pub(crate) fn record_set_call(&mut self) {
        self.set_calls += 1;
    }

    pub(crate) fn record_set_ignored(&mut self) {
        self.set_ignored += 1;
    }

    pub(crate) fn record_get_hit(&mut self) {
        self.get_hits += 1;
    }

    pub(crate) fn record_get_miss(&mut self) {
        self.get_misses += 1;
    }

    pub(crate) fn record_promotion(&mut self) {
        self.promotions += 1;
    }

    pub(crate) fn record_delete(&mut self) {
        self.deletes += 1;
    }

    pub(crate) fn record_buckets_dropped(&mut self, count: u64) {
        self.buckets_dropped += count;
    }

    pub(crate) fn record_flush(&mut self) {
        self.flush_calls += 1;
    }
}

/// Point-in-time copy of [`LfuMetrics`] plus cache size/capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LfuMetricsSnapshot {
    pub set_calls: u64,
    pub set_ignored: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub promotions: u64,
    pub deletes: u64,
    pub buckets_dropped: u64,
    pub flush_calls: u64,
    pub key_count: usize,
    pub bucket_count: usize,
    pub capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lru_counters_accumulate() {
        let mut metrics = LruMetrics::default();
        metrics.record_set_call();
        metrics.record_set_call();
        metrics.record_set_ignored();
        metrics.record_get_hit();
        metrics.record_get_miss();
        metrics.record_eviction();

        assert_eq!(metrics.set_calls, 2);
        assert_eq!(metrics.set_ignored, 1);
        assert_eq!(metrics.get_hits, 1);
        assert_eq!(metrics.get_misses, 1);
        assert_eq!(metrics.evictions, 1);
        assert_eq!(metrics.deletes, 0);
    }

    #[test]
    fn lfu_counters_accumulate() {
        let mut metrics = LfuMetrics::default();
        metrics.record_set_call();
        metrics.record_get_hit();
        metrics.record_promotion();
        metrics.record_buckets_dropped(3);
        metrics.record_flush();

        assert_eq!(metrics.set_calls, 1);
        assert_eq!(metrics.promotions, 1);
        assert_eq!(metrics.buckets_dropped, 3);
        assert_eq!(metrics.flush_calls, 1);
    }
}
