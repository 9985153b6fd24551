//! 时间戳工具
//!
//! `get_fast_timestamp` refreshes a shared cache only every `UPDATE_INTERVAL`
//! calls per thread and serves the cached value in between; transactions are
//! stamped with it. `get_precise_timestamp` reads the clock every time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TIMESTAMP_CACHE: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static UPDATE_COUNTER: std::cell::Cell<u32> = const { std::cell::Cell::new(0) };
}

const UPDATE_INTERVAL: u32 = 100;

/// Unix nanoseconds, possibly up to `UPDATE_INTERVAL` calls stale.
#[inline]
pub fn get_fast_timestamp() -> u64 {
    UPDATE_COUNTER.with(|counter| {
        let count = counter.get();
        let cached = TIMESTAMP_CACHE.load(Ordering::Relaxed);
        if count >= UPDATE_INTERVAL || cached == 0 {
            let now = get_precise_timestamp();
            // 多线程下只前进不后退
            TIMESTAMP_CACHE.fetch_max(now, Ordering::Relaxed);
            counter.set(0);
            TIMESTAMP_CACHE.load(Ordering::Relaxed)
        } else {
            counter.set(count + 1);
            cached
        }
    })
}

/// Unix nanoseconds, read from the system clock on every call.
#[inline]
pub fn get_precise_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
