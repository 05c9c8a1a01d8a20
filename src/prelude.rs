pub use crate::ds::{LinkedList, NodeHandle, SlotArena, XorList};
pub use crate::error::{InvariantError, StaleHandle};
#[cfg(feature = "metrics")]
pub use crate::metrics::{LfuMetricsSnapshot, LruMetricsSnapshot};
#[cfg(feature = "concurrency")]
pub use crate::policy::{ConcurrentLfuCache, ConcurrentLruCache};
pub use crate::policy::{LfuCache, LruCache};
pub use crate::traits::{Cache, List};
