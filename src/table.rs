//! Key-value storage for the cache.
//!
//! The entry table is the leaf component of the engine: a point-lookup map
//! from key to [`CacheEntry`]. It is pure storage. It never decides eviction
//! and never reorders anything; frequency-bucket membership is the frequency
//! index's job.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

use crate::list::Node;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// The per-key record held by the entry table.
///
/// `frequency` is the single source of truth for how often the key has been
/// accessed (always >= 1 for a live entry); `node` is the key's position in
/// the frequency bucket mirroring that count.
pub(crate) struct CacheEntry<K, V> {
    /// The cached value.
    pub(crate) value: V,
    /// Access count for the key. Starts at 1 on insertion, incremented by
    /// every get and every update of an existing key.
    pub(crate) frequency: usize,
    /// The key's node in its current frequency bucket.
    pub(crate) node: *mut Node<K>,
}

impl<K, V> CacheEntry<K, V> {
    /// Creates a fresh entry at frequency 1 pointing at `node`.
    pub(crate) fn new(value: V, node: *mut Node<K>) -> Self {
        CacheEntry {
            value,
            frequency: 1,
            node,
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for CacheEntry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("value", &self.value)
            .field("frequency", &self.frequency)
            .finish()
    }
}

/// Point-lookup storage mapping each live key to its [`CacheEntry`].
pub(crate) struct EntryTable<K, V, S> {
    map: HashMap<K, CacheEntry<K, V>, S>,
}

impl<K: Hash + Eq, V, S: BuildHasher> EntryTable<K, V, S> {
    /// Creates an empty table sized for `capacity` entries.
    pub(crate) fn with_hasher(capacity: usize, hash_builder: S) -> Self {
        EntryTable {
            map: HashMap::with_capacity_and_hasher(capacity, hash_builder),
        }
    }

    /// Returns the entry for `key`, if present.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&CacheEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key)
    }

    /// Returns the entry for `key` mutably, if present.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut CacheEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get_mut(key)
    }

    /// Stores `entry` under `key`, returning the previous entry if one
    /// existed.
    pub(crate) fn insert(&mut self, key: K, entry: CacheEntry<K, V>) -> Option<CacheEntry<K, V>> {
        self.map.insert(key, entry)
    }

    /// Removes and returns the entry for `key`, if present.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<CacheEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(key)
    }

    /// Returns true if `key` has a live entry.
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Iterates over the live keys in unspecified order.
    pub(crate) fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    /// Iterates over `(key, value)` pairs in unspecified order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.map.iter().map(|(k, e)| (k, &e.value))
    }

    /// Drops every entry.
    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }
}

// Unbounded: len and is_empty never touch the hasher, and the Debug impls
// (here and on the cache) need them without the lookup bounds.
impl<K, V, S> EntryTable<K, V, S> {
    /// Number of live entries.
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the table holds no entries.
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K, V, S> fmt::Debug for EntryTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryTable")
            .field("len", &self.map.len())
            .finish()
    }
}
