pub mod lfu;
pub mod lru;

#[cfg(feature = "concurrency")]
pub use lfu::ConcurrentLfuCache;
pub use lfu::LfuCache;
#[cfg(feature = "concurrency")]
pub use lru::ConcurrentLruCache;
pub use lru::LruCache;
