//! Smoke tests exercising the cache from a `no_std` consumer, with only
//! `alloc` available.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::{format, vec::Vec};
use lfru_cache::config::LfruCacheConfig;
use lfru_cache::LfruCache;

fn make_cache<K: core::hash::Hash + Eq + Clone, V>(capacity: usize) -> LfruCache<K, V> {
    LfruCache::init(LfruCacheConfig { capacity })
}

#[test]
fn test_cache_works_without_std() {
    let mut cache: LfruCache<String, u32> = make_cache(4);

    for i in 0..8u32 {
        cache.insert(format!("key{i}"), i);
    }
    assert_eq!(cache.len(), 4);

    let keys: Vec<String> = cache.keys().cloned().collect();
    assert_eq!(keys.len(), 4);
}

#[test]
fn test_eviction_without_std() {
    let mut cache: LfruCache<u32, u32> = make_cache(2);
    cache.insert(1, 10);
    cache.insert(2, 20);
    cache.get(&1).unwrap();

    let evicted = cache.insert(3, 30);
    assert_eq!(evicted, Some((2, 20)));
    assert_eq!(cache.get(&1), Ok(&10));
}
