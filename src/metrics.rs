//! Cache metrics.
//!
//! Metrics are reported through a `BTreeMap` rather than a hash map so the
//! output ordering is deterministic: reproducible test assertions, stable
//! serialization, readable logs. With a dozen keys the O(log n) lookups are
//! irrelevant.
//!
//! Because capacity is an entry count, the counters here are count-based as
//! well; there is no byte accounting.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Counters common to any cache policy.
#[derive(Debug, Default, Clone)]
pub struct CoreCacheMetrics {
    /// Total number of lookups made against the cache.
    pub requests: u64,
    /// Lookups that found the key.
    pub hits: u64,
    /// Entries inserted (new keys only, not value updates).
    pub insertions: u64,
    /// Entries removed by the eviction policy.
    pub evictions: u64,
    /// Entries removed by explicit deletion.
    pub removals: u64,
}

impl CoreCacheMetrics {
    /// Records a lookup that found its key.
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.hits += 1;
    }

    /// Records a lookup that missed.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records the insertion of a new key.
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records a policy eviction.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records an explicit deletion.
    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Fraction of lookups that hit, or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of lookups that missed, or 0.0 before any lookup.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            (self.requests - self.hits) as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Converts the core counters into a deterministic report.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("hits".to_string(), self.hits as f64);
        metrics.insert("misses".to_string(), (self.requests - self.hits) as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("removals".to_string(), self.removals as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Metrics for the LFU-with-LRU-tie-break policy.
///
/// Extends [`CoreCacheMetrics`] with gauges over the frequency distribution
/// of the live entry set.
#[derive(Debug, Default, Clone)]
pub struct LfruCacheMetrics {
    /// Counters common to all policies.
    pub core: CoreCacheMetrics,
    /// Lowest frequency among live entries (0 while empty).
    pub min_frequency: u64,
    /// Highest frequency among live entries (0 while empty).
    pub max_frequency: u64,
    /// Number of distinct frequency levels currently in use.
    pub active_frequency_levels: u64,
    /// Total frequency increments: every hit and every update of an existing
    /// key raises some entry's frequency by one.
    pub total_frequency_increments: u64,
}

impl LfruCacheMetrics {
    /// Creates a zeroed metrics block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frequency increment.
    pub fn record_frequency_increment(&mut self) {
        self.total_frequency_increments += 1;
    }

    /// Refreshes the frequency gauges from the index state.
    pub(crate) fn update_frequency_gauges(
        &mut self,
        min_frequency: Option<usize>,
        max_frequency: Option<usize>,
        active_levels: usize,
    ) {
        self.min_frequency = min_frequency.unwrap_or(0) as u64;
        self.max_frequency = max_frequency.unwrap_or(0) as u64;
        self.active_frequency_levels = active_levels as u64;
    }

    /// Converts the full metrics block into a deterministic report.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        metrics.insert("min_frequency".to_string(), self.min_frequency as f64);
        metrics.insert("max_frequency".to_string(), self.max_frequency as f64);
        metrics.insert(
            "active_frequency_levels".to_string(),
            self.active_frequency_levels as f64,
        );
        metrics.insert(
            "total_frequency_increments".to_string(),
            self.total_frequency_increments as f64,
        );

        metrics
    }
}

/// Uniform metrics-reporting interface implemented by the cache.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Policy name for identification.
    fn algorithm_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_miss_rates() {
        let mut core = CoreCacheMetrics::default();
        assert_eq!(core.hit_rate(), 0.0);

        core.record_hit();
        core.record_hit();
        core.record_miss();

        assert_eq!(core.requests, 3);
        assert_eq!(core.hits, 2);
        assert!((core.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
        assert!((core.miss_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_keys_are_deterministic() {
        let metrics = LfruCacheMetrics::new();
        let report = metrics.to_btreemap();

        let keys: alloc::vec::Vec<_> = report.keys().cloned().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert!(report.contains_key("hit_rate"));
        assert!(report.contains_key("active_frequency_levels"));
    }

    #[test]
    fn test_frequency_gauges() {
        let mut metrics = LfruCacheMetrics::new();
        metrics.update_frequency_gauges(Some(1), Some(7), 3);
        assert_eq!(metrics.min_frequency, 1);
        assert_eq!(metrics.max_frequency, 7);
        assert_eq!(metrics.active_frequency_levels, 3);

        metrics.update_frequency_gauges(None, None, 0);
        assert_eq!(metrics.min_frequency, 0);
        assert_eq!(metrics.max_frequency, 0);
    }
}
