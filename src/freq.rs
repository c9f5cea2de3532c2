//! Frequency bucket index.
//!
//! Organizes every live key into buckets keyed by access frequency, each
//! bucket ordering its keys by recency of touch. Together with the tracked
//! minimum frequency this yields the eviction candidate in O(1): the
//! least-recently-touched key of the lowest-frequency bucket.
//!
//! The `min_frequency` bookkeeping rules are deliberately minimal:
//!
//! - A fresh registration always resets it to 1 (a new key is by definition
//!   at the lowest possible frequency).
//! - A bump or unregistration that vacates the minimum bucket advances it by
//!   one. After an unregistration this can leave the value stale, but that is
//!   harmless: the minimum is only read during eviction, and eviction only
//!   happens immediately after a registration has reset it to 1. No rescan is
//!   ever performed.

extern crate alloc;

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::fmt;

use crate::list::{Node, RecencyList};

/// Buckets of keys grouped by access frequency, each ordered by recency.
pub(crate) struct FrequencyIndex<K> {
    /// Map from frequency to the bucket of keys currently at that frequency.
    /// Empty buckets are removed the moment their last key leaves.
    buckets: BTreeMap<usize, RecencyList<K>>,
    /// The lowest frequency with a non-empty bucket, valid whenever an
    /// eviction can occur (see the module docs for the staleness rule).
    min_frequency: usize,
}

impl<K> FrequencyIndex<K> {
    /// Creates an empty index.
    pub(crate) fn new() -> Self {
        FrequencyIndex {
            buckets: BTreeMap::new(),
            min_frequency: 1,
        }
    }

    /// Places a brand-new key into the frequency-1 bucket at the most-recent
    /// end and returns its node.
    ///
    /// Resets `min_frequency` to 1 unconditionally: a fresh insertion always
    /// becomes an eviction candidate.
    pub(crate) fn register_new(&mut self, key: K) -> *mut Node<K> {
        self.min_frequency = 1;
        self.buckets.entry(1).or_default().push_back(key)
    }

    /// Moves a key's node from the `old_frequency` bucket to the tail of the
    /// `old_frequency + 1` bucket, returning the node's (unchanged) address.
    ///
    /// If the old bucket is vacated it is deleted, and if it was the minimum
    /// bucket the minimum advances to `old_frequency + 1`.
    ///
    /// # Safety
    ///
    /// `node` must be the live node registered for a key currently held in
    /// the `old_frequency` bucket.
    pub(crate) unsafe fn bump(&mut self, node: *mut Node<K>, old_frequency: usize) -> *mut Node<K> {
        let new_frequency = old_frequency + 1;

        let bucket = self
            .buckets
            .get_mut(&old_frequency)
            .expect("frequency bucket missing for live key");
        // SAFETY: caller guarantees node lives in this bucket
        let detached = unsafe { bucket.remove(node) }.expect("node missing from its bucket");

        if bucket.is_empty() {
            self.buckets.remove(&old_frequency);
            // The minimum can only rise when its own bucket is vacated
            if old_frequency == self.min_frequency {
                self.min_frequency = new_frequency;
            }
        }

        let ptr = Box::into_raw(detached);
        // SAFETY: ptr was just detached from the old bucket and is unlinked
        unsafe {
            self.buckets
                .entry(new_frequency)
                .or_default()
                .attach_back(ptr);
        }
        ptr
    }

    /// Removes a key's node from its bucket on explicit deletion.
    ///
    /// Applies the same empty-and-was-minimum rule as [`bump`](Self::bump);
    /// the resulting `min_frequency` may be stale, which self-heals before
    /// the next eviction (module docs).
    ///
    /// # Safety
    ///
    /// `node` must be the live node registered for a key currently held in
    /// the `frequency` bucket. The node is freed; the pointer must not be
    /// used afterwards.
    pub(crate) unsafe fn unregister(&mut self, node: *mut Node<K>, frequency: usize) {
        let bucket = self
            .buckets
            .get_mut(&frequency)
            .expect("frequency bucket missing for live key");
        // SAFETY: caller guarantees node lives in this bucket
        let detached = unsafe { bucket.remove(node) }.expect("node missing from its bucket");
        // SAFETY: detached nodes always hold an initialized key
        drop(unsafe { detached.into_value() });

        if bucket.is_empty() {
            self.buckets.remove(&frequency);
            if frequency == self.min_frequency {
                self.min_frequency = frequency + 1;
            }
        }
    }

    /// Removes and returns the eviction candidate: the least-recently-touched
    /// key of the minimum-frequency bucket.
    ///
    /// `min_frequency` is left as-is; the next registration resets it before
    /// any further eviction can read it.
    ///
    /// # Panics
    ///
    /// Panics if the index is empty. Calling this without a live entry is an
    /// invariant violation in the engine, not a recoverable condition.
    pub(crate) fn evict_one(&mut self) -> K {
        let bucket = self
            .buckets
            .get_mut(&self.min_frequency)
            .expect("eviction requested on empty frequency index");
        let node = bucket
            .pop_front()
            .expect("minimum-frequency bucket is empty");
        let is_bucket_empty = bucket.is_empty();
        // SAFETY: pop_front only yields non-sentinel nodes
        let key = unsafe { node.into_value() };

        if is_bucket_empty {
            self.buckets.remove(&self.min_frequency);
        }

        key
    }

    /// Removes and returns the eviction candidate, tolerating a stale
    /// minimum: the minimum is re-anchored on the smallest non-empty bucket
    /// first. `None` if the index is empty.
    ///
    /// This is the entry point for caller-driven candidate removal, which can
    /// run at any time; [`evict_one`](Self::evict_one) serves the overflow
    /// path, where a preceding registration has already reset the minimum.
    pub(crate) fn pop_candidate(&mut self) -> Option<K> {
        self.min_frequency = self.smallest_frequency()?;
        Some(self.evict_one())
    }

    /// Number of distinct frequency levels currently in use.
    pub(crate) fn active_levels(&self) -> usize {
        self.buckets.len()
    }

    /// The highest frequency with a non-empty bucket, if any key is live.
    pub(crate) fn max_frequency(&self) -> Option<usize> {
        self.buckets.keys().next_back().copied()
    }

    /// The lowest frequency with a non-empty bucket, if any key is live.
    ///
    /// Unlike the tracked `min_frequency` this is never stale; it is used for
    /// reporting, not eviction.
    pub(crate) fn smallest_frequency(&self) -> Option<usize> {
        self.buckets.keys().next().copied()
    }

    /// Drops every bucket and resets the minimum.
    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
        self.min_frequency = 1;
    }

    #[cfg(test)]
    pub(crate) fn min_frequency(&self) -> usize {
        self.min_frequency
    }

    /// Asserts the structural invariants: no empty bucket is retained, and
    /// `min_frequency` matches the smallest non-empty bucket when one exists.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self, min_may_be_stale: bool) {
        for (frequency, bucket) in &self.buckets {
            assert!(!bucket.is_empty(), "empty bucket retained at {frequency}");
        }
        if !min_may_be_stale {
            if let Some(&smallest) = self.buckets.keys().next() {
                assert_eq!(self.min_frequency, smallest, "min_frequency out of sync");
            }
        }
    }
}

impl<K> Default for FrequencyIndex<K> {
    fn default() -> Self {
        FrequencyIndex::new()
    }
}

impl<K> fmt::Debug for FrequencyIndex<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequencyIndex")
            .field("levels", &self.buckets.len())
            .field("min_frequency", &self.min_frequency)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_sets_min_to_one() {
        let mut index = FrequencyIndex::new();
        let node = index.register_new("a");
        assert_eq!(index.min_frequency(), 1);
        assert_eq!(index.active_levels(), 1);

        // Push the only key up, then register again: the min must drop back
        unsafe { index.bump(node, 1) };
        assert_eq!(index.min_frequency(), 2);
        index.register_new("b");
        assert_eq!(index.min_frequency(), 1);
        index.assert_invariants(false);
    }

    #[test]
    fn test_bump_moves_between_buckets() {
        let mut index = FrequencyIndex::new();
        let a = index.register_new("a");
        index.register_new("b");

        let a = unsafe { index.bump(a, 1) };
        assert_eq!(index.active_levels(), 2);
        assert_eq!(index.min_frequency(), 1);
        assert_eq!(index.max_frequency(), Some(2));

        let _a = unsafe { index.bump(a, 2) };
        assert_eq!(index.max_frequency(), Some(3));
        index.assert_invariants(false);
    }

    #[test]
    fn test_bump_vacating_min_bucket_advances_min() {
        let mut index = FrequencyIndex::new();
        let a = index.register_new("a");

        let a = unsafe { index.bump(a, 1) };
        assert_eq!(index.min_frequency(), 2);
        let _a = unsafe { index.bump(a, 2) };
        assert_eq!(index.min_frequency(), 3);
        assert_eq!(index.active_levels(), 1);
        index.assert_invariants(false);
    }

    #[test]
    fn test_evict_one_prefers_least_recent_at_min() {
        let mut index = FrequencyIndex::new();
        index.register_new("old");
        index.register_new("new");

        assert_eq!(index.evict_one(), "old");
        assert_eq!(index.evict_one(), "new");
        assert_eq!(index.active_levels(), 0);
    }

    #[test]
    fn test_evict_one_skips_higher_buckets() {
        let mut index = FrequencyIndex::new();
        let hot = index.register_new("hot");
        unsafe { index.bump(hot, 1) };
        index.register_new("cold");

        assert_eq!(index.evict_one(), "cold");
        index.assert_invariants(true);
    }

    #[test]
    #[should_panic(expected = "eviction requested on empty frequency index")]
    fn test_evict_one_on_empty_index_panics() {
        let mut index: FrequencyIndex<&str> = FrequencyIndex::new();
        index.evict_one();
    }

    #[test]
    fn test_unregister_deletes_empty_bucket() {
        let mut index = FrequencyIndex::new();
        let a = index.register_new("a");
        let b = index.register_new("b");
        unsafe { index.unregister(a, 1) };
        assert_eq!(index.active_levels(), 1);
        unsafe { index.unregister(b, 1) };
        assert_eq!(index.active_levels(), 0);
    }

    #[test]
    fn test_stale_min_self_heals_on_next_registration() {
        let mut index = FrequencyIndex::new();
        let hot = index.register_new("hot");
        let hot = unsafe { index.bump(hot, 1) };
        let _hot = unsafe { index.bump(hot, 2) };
        let cold = index.register_new("cold");

        // Deleting the sole minimum-frequency key leaves the min pointing at
        // frequency 2, where no bucket exists
        unsafe { index.unregister(cold, 1) };
        assert_eq!(index.min_frequency(), 2);
        index.assert_invariants(true);

        // The next registration resets the min before any eviction can
        // observe the stale value
        index.register_new("fresh");
        assert_eq!(index.min_frequency(), 1);
        assert_eq!(index.evict_one(), "fresh");
    }

    #[test]
    fn test_clear_resets_state() {
        let mut index = FrequencyIndex::new();
        let a = index.register_new("a");
        unsafe { index.bump(a, 1) };
        index.register_new("b");

        index.clear();
        assert_eq!(index.active_levels(), 0);
        assert_eq!(index.min_frequency(), 1);
        assert_eq!(index.max_frequency(), None);
    }
}
