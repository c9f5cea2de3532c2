//! LFU cache with LRU tie-breaking.
//!
//! The cache evicts the entry with the lowest access frequency when capacity
//! is exceeded; among equally frequent entries the least recently used one
//! goes first. Lookup, update, insertion, and eviction are all amortized
//! O(1).
//!
//! # Algorithm
//!
//! Three cooperating structures form the engine:
//!
//! - the entry table maps each key to its value, frequency count, and bucket
//!   node;
//! - the frequency index groups keys into recency-ordered buckets by
//!   frequency and tracks the current minimum frequency;
//! - the eviction step (in [`insert`](LfruCache::insert)) pops the
//!   least-recent key from the minimum-frequency bucket whenever an insertion
//!   pushes the entry count past capacity.
//!
//! Every access moves the key's node from its current bucket to the tail of
//! the next-higher bucket, so the two structures are updated together as one
//! logical unit per operation.
//!
//! # Thread safety
//!
//! This implementation is not thread-safe. Every operation takes `&mut self`
//! and runs to completion without blocking; callers that need concurrent
//! access must serialize it externally, e.g. behind a `Mutex`.
//!
//! Shared references hand out `&K` and `&V` through [`peek`](LfruCache::peek)
//! and iteration, so the cache is only `Sync` when its keys and values are.
//! A cache over interior-mutable values cannot be shared:
//!
//! ```compile_fail
//! use core::cell::Cell;
//! use lfru_cache::config::LfruCacheConfig;
//! use lfru_cache::LfruCache;
//!
//! fn require_sync<T: Sync>(_: &T) {}
//!
//! let cache: LfruCache<u32, Cell<u64>> =
//!     LfruCache::init(LfruCacheConfig { capacity: 4 });
//! require_sync(&cache);
//! ```

extern crate alloc;

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::config::LfruCacheConfig;
use crate::error::Error;
use crate::freq::FrequencyIndex;
use crate::metrics::{CacheMetrics, LfruCacheMetrics};
use crate::table::{CacheEntry, EntryTable};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A fixed-capacity cache evicting by least access frequency, with least
/// recent use breaking ties.
///
/// Keys start at frequency 1 on insertion; every [`get`](Self::get),
/// [`get_mut`](Self::get_mut), and value-updating [`insert`](Self::insert)
/// raises the key's frequency by exactly 1 and marks it most recently used
/// within its new frequency class.
///
/// # Examples
///
/// ```
/// use lfru_cache::config::LfruCacheConfig;
/// use lfru_cache::LfruCache;
///
/// let mut cache = LfruCache::init(LfruCacheConfig { capacity: 3 });
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.insert("c", 3);
///
/// // Touch "a" and "b" so "c" stays the least frequently used
/// assert_eq!(cache.get(&"a"), Ok(&1));
/// assert_eq!(cache.get(&"b"), Ok(&2));
///
/// // Inserting a fourth key evicts "c"
/// let evicted = cache.insert("d", 4);
/// assert_eq!(evicted, Some(("c", 3)));
/// assert!(cache.get(&"c").is_err());
/// assert_eq!(cache.len(), 3);
/// ```
pub struct LfruCache<K, V, S = DefaultHashBuilder> {
    /// Construction parameters.
    config: LfruCacheConfig,
    /// Key -> (value, frequency, bucket node).
    table: EntryTable<K, V, S>,
    /// Frequency buckets with recency ordering and the minimum-frequency
    /// pointer.
    index: FrequencyIndex<K>,
    /// Hit/miss/eviction counters and frequency gauges.
    metrics: LfruCacheMetrics,
}

// SAFETY: the cache owns all of its data; the raw pointers stored in the
// entry table point only at nodes owned by the frequency index's buckets.
// Sending the whole structure moves that ownership wholesale.
unsafe impl<K: Send, V: Send, S: Send> Send for LfruCache<K, V, S> {}

// SAFETY: all mutation requires &mut self. Shared references hand out &K and
// &V (peek, keys, iter), so keys and values must themselves be shareable.
unsafe impl<K: Sync, V: Sync, S: Sync> Sync for LfruCache<K, V, S> {}

impl<K: Hash + Eq, V> LfruCache<K, V, DefaultHashBuilder> {
    /// Creates a cache from the given configuration with the default hasher.
    ///
    /// # Examples
    ///
    /// ```
    /// use lfru_cache::config::LfruCacheConfig;
    /// use lfru_cache::LfruCache;
    ///
    /// let cache: LfruCache<String, u32> = LfruCache::init(LfruCacheConfig { capacity: 10 });
    /// assert!(cache.is_empty());
    /// ```
    pub fn init(config: LfruCacheConfig) -> Self {
        LfruCache::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LfruCache<K, V, S> {
    /// Creates a cache from the given configuration and hash builder.
    pub fn with_hasher(config: LfruCacheConfig, hash_builder: S) -> Self {
        LfruCache {
            config,
            table: EntryTable::with_hasher(config.capacity, hash_builder),
            index: FrequencyIndex::new(),
            metrics: LfruCacheMetrics::new(),
        }
    }

    /// Returns the maximum number of entries the cache can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Returns the current number of entries, always `<= capacity()`.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns a reference to the value for `key`, counting the access.
    ///
    /// The key's frequency rises by 1 and it becomes the most recently used
    /// entry of its new frequency class.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent; the cache is left
    /// unchanged.
    pub fn get<Q>(&mut self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.touch(key)?;
        Ok(&self
            .table
            .get(key)
            .expect("entry table out of sync with frequency index")
            .value)
    }

    /// Returns a mutable reference to the value for `key`, counting the
    /// access exactly like [`get`](Self::get).
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent; the cache is left
    /// unchanged.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.touch(key)?;
        Ok(&mut self
            .table
            .get_mut(key)
            .expect("entry table out of sync with frequency index")
            .value)
    }

    /// Bumps `key`'s frequency and recency, recording hit/miss metrics.
    fn touch<Q>(&mut self, key: &Q) -> Result<(), Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(entry) = self.table.get(key) else {
            self.metrics.core.record_miss();
            return Err(Error::KeyNotFound);
        };
        let frequency = entry.frequency;
        let node = entry.node;

        // SAFETY: node is the live bucket node for this key, registered at
        // `frequency`
        let node = unsafe { self.index.bump(node, frequency) };

        let entry = self
            .table
            .get_mut(key)
            .expect("entry table out of sync with frequency index");
        entry.frequency += 1;
        entry.node = node;

        self.metrics.core.record_hit();
        self.metrics.record_frequency_increment();
        self.refresh_gauges();
        Ok(())
    }

    /// Inserts or updates a key-value pair.
    ///
    /// Updating an existing key replaces its value, raises its frequency by
    /// 1, and returns the replaced pair. Inserting a new key registers it at
    /// frequency 1; if that pushes the entry count past capacity, exactly one
    /// entry is evicted and returned — the least recently used entry among
    /// those with the lowest frequency. With `capacity == 0` the just-inserted
    /// key is itself evicted, so the cache stays empty.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Clone,
    {
        if let Some(entry) = self.table.get_mut(&key) {
            let old_value = mem::replace(&mut entry.value, value);
            let frequency = entry.frequency;
            let node = entry.node;

            // An update counts as an access: bump frequency and recency
            // SAFETY: node is the live bucket node for this key
            let node = unsafe { self.index.bump(node, frequency) };
            let entry = self
                .table
                .get_mut(&key)
                .expect("entry table out of sync with frequency index");
            entry.frequency += 1;
            entry.node = node;

            self.metrics.record_frequency_increment();
            self.refresh_gauges();
            return Some((key, old_value));
        }

        let node = self.index.register_new(key.clone());
        self.table.insert(key, CacheEntry::new(value, node));
        self.metrics.core.record_insertion();

        // The eviction step runs exactly once, only after a brand-new key
        // lands; updates cannot change the entry count
        let evicted = if self.table.len() > self.config.capacity {
            let victim = self.index.evict_one();
            let entry = self
                .table
                .remove(&victim)
                .expect("evicted key missing from entry table");
            self.metrics.core.record_eviction();
            Some((victim, entry.value))
        } else {
            None
        };

        self.refresh_gauges();
        evicted
    }

    /// Removes `key` from the cache, returning its value.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent; the cache is left
    /// unchanged.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let entry = self.table.remove(key).ok_or(Error::KeyNotFound)?;

        // SAFETY: entry.node is the live bucket node for this key; the table
        // entry is already gone, so nothing else refers to it
        unsafe { self.index.unregister(entry.node, entry.frequency) };

        self.metrics.core.record_removal();
        self.refresh_gauges();
        Ok(entry.value)
    }

    /// Returns a reference to the value for `key` without counting the
    /// access: frequency and recency are unaffected.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get(key).map(|entry| &entry.value)
    }

    /// Returns true if `key` is present, without counting an access.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.contains(key)
    }

    /// Returns `key`'s current access frequency without counting an access.
    /// `None` if the key is absent.
    pub fn frequency<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get(key).map(|entry| entry.frequency)
    }

    /// Iterates over the live keys in unspecified order.
    ///
    /// The iterator is lazy and restartable: calling `keys` again yields a
    /// fresh pass over the current state. Iteration has no frequency or
    /// recency effects.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.table.keys()
    }

    /// Iterates over `(key, value)` pairs in unspecified order, with no
    /// frequency or recency effects.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.table.iter()
    }

    /// Removes and returns the current eviction candidate: the least
    /// recently used entry among those with the lowest frequency. `None` if
    /// the cache is empty.
    ///
    /// Counts as an explicit removal in the metrics; only the overflow path
    /// of [`insert`](Self::insert) records evictions.
    pub fn pop(&mut self) -> Option<(K, V)> {
        let victim = self.index.pop_candidate()?;
        let entry = self
            .table
            .remove(&victim)
            .expect("popped key missing from entry table");
        self.metrics.core.record_removal();
        self.refresh_gauges();
        Some((victim, entry.value))
    }

    /// Removes every entry. Metrics counters are preserved.
    pub fn clear(&mut self) {
        self.table.clear();
        self.index.clear();
        self.refresh_gauges();
    }

    /// Copies the frequency gauges out of the index.
    fn refresh_gauges(&mut self) {
        let min = self.index.smallest_frequency();
        let max = self.index.max_frequency();
        let levels = self.index.active_levels();
        self.metrics.update_frequency_gauges(min, max, levels);
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LfruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LFRU"
    }
}

// Manual Debug: the entry table holds raw pointers
impl<K, V, S> fmt::Debug for LfruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfruCache")
            .field("capacity", &self.config.capacity)
            .field("len", &self.table.len())
            .field("index", &self.index)
            .finish()
    }
}
