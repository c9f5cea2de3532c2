#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Quick Reference
//!
//! | Operation | Cost | Frequency effect |
//! |-----------|------|------------------|
//! | [`get`](LfruCache::get) / [`get_mut`](LfruCache::get_mut) | O(1) | +1, marks most recently used |
//! | [`insert`](LfruCache::insert) (new key) | O(1) amortized | starts at 1, may evict one entry |
//! | [`insert`](LfruCache::insert) (existing key) | O(1) | +1, replaces the value |
//! | [`remove`](LfruCache::remove) | O(1) | entry destroyed |
//! | [`peek`](LfruCache::peek) / [`contains_key`](LfruCache::contains_key) | O(1) | none |
//! | [`keys`](LfruCache::keys) / [`iter`](LfruCache::iter) | O(n) total | none |
//!
//! ## Example
//!
//! ```rust
//! use lfru_cache::config::LfruCacheConfig;
//! use lfru_cache::{Error, LfruCache};
//!
//! let mut cache = LfruCache::init(LfruCacheConfig { capacity: 2 });
//! cache.insert("popular", 1);
//! cache.insert("rare", 2);
//!
//! // Raise the frequency of "popular"
//! for _ in 0..5 {
//!     cache.get(&"popular").unwrap();
//! }
//!
//! // "rare" has the lowest frequency and is evicted
//! let evicted = cache.insert("new", 3);
//! assert_eq!(evicted, Some(("rare", 2)));
//! assert_eq!(cache.get(&"rare"), Err(Error::KeyNotFound));
//! ```
//!
//! ## Eviction order
//!
//! When an insertion pushes the cache past capacity, the entry with the
//! lowest access frequency is removed; among entries tied at that frequency,
//! the one that has gone longest without being the target of a `get` or an
//! updating `insert` goes first. Iteration order over keys is unspecified and
//! must never be relied upon.
//!
//! ## Modules
//!
//! - [`lfru`]: the cache implementation
//! - [`config`]: construction parameters
//! - [`error`]: the error type
//! - [`metrics`]: metrics collection and reporting

#![no_std]

#[cfg(not(feature = "hashbrown"))]
extern crate std;

/// Cache configuration structures.
pub mod config;

/// Error types for cache operations.
pub mod error;

/// Doubly linked recency list.
///
/// Internal infrastructure: one instance backs each frequency bucket,
/// ordering that bucket's keys from least to most recently touched with O(1)
/// touch and evict-head operations. Not exposed to library consumers.
pub(crate) mod list;

/// Key-value storage.
///
/// Maps each live key to its value, access frequency, and bucket position.
pub(crate) mod table;

/// Frequency bucket index.
///
/// Groups keys into recency-ordered buckets by access frequency and tracks
/// the minimum frequency, yielding the eviction candidate in O(1).
pub(crate) mod freq;

/// The LFU-with-LRU-tie-break cache implementation.
pub mod lfru;

/// Cache metrics system.
pub mod metrics;

// Re-export the main types
pub use config::LfruCacheConfig;
pub use error::Error;
pub use lfru::LfruCache;
pub use metrics::{CacheMetrics, CoreCacheMetrics, LfruCacheMetrics};
