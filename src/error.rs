//! Error types for the cache.
//!
//! There is exactly one recoverable error kind: [`Error::KeyNotFound`],
//! returned by [`get`](crate::LfruCache::get) and
//! [`remove`](crate::LfruCache::remove) when the key is absent. A failed call
//! leaves the cache untouched.
//!
//! Internal invariant violations (such as an eviction requested while the
//! engine holds no entries) are defects, not recoverable errors; they panic
//! instead of returning a misleading result.

use core::fmt;

/// A recoverable cache error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The requested key is not present in the cache, either because it was
    /// never inserted or because it has been deleted or evicted.
    KeyNotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound => f.write_str("key not found in cache"),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_display() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found in cache");
    }

    #[test]
    fn test_is_error() {
        fn assert_error<E: core::error::Error>(_: E) {}
        assert_error(Error::KeyNotFound);
    }
}
