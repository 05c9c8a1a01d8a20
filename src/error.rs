//! Error types for the listkit library.
//!
//! ## Key Components
//!
//! - [`StaleHandle`]: Returned when a [`NodeHandle`](crate::ds::NodeHandle)
//!   names a node that has since been removed (its arena slot was freed or
//!   reused). Using a stale handle is never undefined behavior here: the
//!   plain accessors report `None`/`false`, and the `try_*` accessors return
//!   this error.
//! - [`InvariantError`]: Returned when internal data-structure invariants
//!   are violated (`check_invariants` methods).
//!
//! ## Example Usage
//!
//! ```
//! use listkit::ds::LinkedList;
//!
//! let mut list = LinkedList::new();
//! let handle = list.push_back(1);
//! list.remove(handle);
//!
//! // The handle is stale now; try_get reports it as a defined error.
//! let err = list.try_get(handle).unwrap_err();
//! assert!(err.to_string().contains("stale"));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// StaleHandle
// ---------------------------------------------------------------------------

/// Error returned when a node handle no longer names a live node.
///
/// A handle expires the moment its node is removed: by `remove`, `pop_*`,
/// `shrink`, `clear`, or cache eviction. The arena detects expiry via the
/// slot's generation counter, so the failing handle's coordinates are
/// available for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleHandle {
    index: usize,
    generation: u32,
}

impl StaleHandle {
    /// Creates a new `StaleHandle` for the given slot coordinates.
    #[inline]
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index the expired handle pointed at.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the generation the expired handle was issued with.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for StaleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stale node handle: slot {} generation {}",
            self.index, self.generation
        )
    }
}

impl std::error::Error for StaleHandle {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal list/cache invariants are violated.
///
/// Produced by the `check_invariants` methods on
/// [`LinkedList`](crate::ds::LinkedList), [`XorList`](crate::ds::XorList),
/// [`LruCache`](crate::policy::lru::LruCache) and
/// [`LfuCache`](crate::policy::lfu::LfuCache). Carries a human-readable
/// description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- StaleHandle ------------------------------------------------------

    #[test]
    fn stale_handle_display_shows_coordinates() {
        let err = StaleHandle::new(7, 3);
        assert_eq!(err.to_string(), "stale node handle: slot 7 generation 3");
    }

    #[test]
    fn stale_handle_accessors() {
        let err = StaleHandle::new(2, 9);
        assert_eq!(err.index(), 2);
        assert_eq!(err.generation(), 9);
    }

    #[test]
    fn stale_handle_copy_and_eq() {
        let a = StaleHandle::new(1, 1);
        let b = a;
        assert_eq!(a, b);
    }

    #[test]
    fn stale_handle_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<StaleHandle>();
    }

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("list length mismatch");
        assert_eq!(err.to_string(), "list length mismatch");
    }

    #[test]
    fn invariant_debug_includes_message() {
        let err = InvariantError::new("broken link");
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("broken link"));
    }

    #[test]
    fn invariant_message_accessor() {
        let err = InvariantError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn invariant_clone_and_eq() {
        let a = InvariantError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
    }
}
