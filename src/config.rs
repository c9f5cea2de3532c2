//! Cache configuration.
//!
//! Configuration structs have all public fields for simple instantiation:
//!
//! - **Simple**: just create the struct with the fields set
//! - **Type safety**: all parameters must be provided at construction
//! - **No boilerplate**: no constructors or builder methods needed
//!
//! # Capacity semantics
//!
//! `capacity` is a plain entry count, not a byte budget. A capacity of 0 is
//! legal and produces a cache that accepts every insert but immediately
//! evicts it again, so it stays permanently empty. Negative capacities are
//! unrepresentable: `usize` rejects them at compile time, which is the
//! construction-time contract for this parameter.
//!
//! # Examples
//!
//! ```
//! use lfru_cache::config::LfruCacheConfig;
//! use lfru_cache::LfruCache;
//!
//! let config = LfruCacheConfig { capacity: 1000 };
//! let cache: LfruCache<String, i32> = LfruCache::init(config);
//! ```

use core::fmt;

/// Configuration for an [`LfruCache`](crate::LfruCache).
///
/// The cache evicts by least access frequency, breaking ties among equally
/// frequent entries by least recent use.
///
/// # Examples
///
/// ```
/// use lfru_cache::config::LfruCacheConfig;
/// use lfru_cache::LfruCache;
///
/// let config = LfruCacheConfig { capacity: 100 };
/// let cache: LfruCache<&str, i32> = LfruCache::init(config);
/// assert_eq!(cache.capacity(), 100);
/// ```
#[derive(Clone, Copy)]
pub struct LfruCacheConfig {
    /// Maximum number of key-value pairs the cache can hold. May be 0, in
    /// which case the cache is permanently empty.
    pub capacity: usize,
}

impl fmt::Debug for LfruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = LfruCacheConfig { capacity: 100 };
        assert_eq!(config.capacity, 100);
    }

    #[test]
    fn test_config_zero_capacity_is_allowed() {
        let config = LfruCacheConfig { capacity: 0 };
        assert_eq!(config.capacity, 0);
    }
}
