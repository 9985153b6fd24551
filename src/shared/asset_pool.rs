//! Asset id interning pool
//!
//! Orders for the same asset arrive as separate strings; interning them here
//! means every order, queue key and transaction of that asset shares one
//! `Arc<str>`, so hashing and cloning stay cheap in the matching loop.
//!
//! - 首次访问：写锁 + 堆分配
//! - 后续访问：读锁 + Arc克隆

use crate::domain::entities::AssetId;
use parking_lot::RwLock;
use std::collections::HashMap;

pub struct AssetPool {
    assets: RwLock<HashMap<String, AssetId>>,
}

impl AssetPool {
    pub fn new() -> Self {
        Self {
            assets: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            assets: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }

    /// Returns the shared id for `asset`, creating it on first sight.
    #[inline]
    pub fn intern(&self, asset: &str) -> AssetId {
        {
            let read_guard = self.assets.read();
            if let Some(id) = read_guard.get(asset) {
                return id.clone();
            }
        }

        // 可能在获取写锁期间其他线程已插入
        let mut write_guard = self.assets.write();
        write_guard
            .entry(asset.to_string())
            .or_insert_with(|| AssetId::new(asset))
            .clone()
    }

    /// Warms the pool with known assets so the hot path never takes the write lock.
    pub fn preload(&self, assets: &[&str]) {
        let mut write_guard = self.assets.write();
        for &asset in assets {
            write_guard
                .entry(asset.to_string())
                .or_insert_with(|| AssetId::new(asset));
        }
    }

    pub fn len(&self) -> usize {
        self.assets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.read().is_empty()
    }
}

impl Default for AssetPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_intern_shares_allocation() {
        let pool = AssetPool::new();
        let a = pool.intern("PETR4");
        let b = pool.intern("PETR4");
        assert!(a.ptr_eq(&b));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_distinct_assets() {
        let pool = AssetPool::new();
        let petr = pool.intern("PETR4");
        let vale = pool.intern("VALE3");
        assert_ne!(petr, vale);
        assert_eq!(vale.as_str(), "VALE3");
    }

    #[test]
    fn test_preload_then_intern() {
        let pool = AssetPool::with_capacity(4);
        pool.preload(&["PETR4", "VALE3", "ITUB4"]);
        assert_eq!(pool.len(), 3);
        let first = pool.intern("ITUB4");
        assert!(first.ptr_eq(&pool.intern("ITUB4")));
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_concurrent_intern() {
        let pool = Arc::new(AssetPool::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = pool.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        let _ = pool.intern("PETR4");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(pool.len(), 1);
    }
}
