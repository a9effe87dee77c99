//! Timing behavior of the background sweep, with real sleeps.

#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use std::convert::Infallible;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use parsley_conncache::{CacheConfig, ConnectionCache};
use pretty_assertions::assert_eq;

fn recording_cache(
    ttl: Duration,
    sweep_interval: Duration,
) -> (ConnectionCache<u32, Infallible>, Arc<Mutex<Vec<u32>>>) {
    let closed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&closed);
    let cache = ConnectionCache::new(
        CacheConfig {
            capacity: 10,
            ttl,
            sweep_interval,
        },
        |_: &u32| Ok(()),
        move |conn: u32| {
            sink.lock().push(conn);
            Ok(())
        },
    );
    (cache, closed)
}

#[test]
fn ttl_expiry_without_access() {
    let (cache, closed) =
        recording_cache(Duration::from_millis(100), Duration::from_millis(20));
    cache.put("db", 7);
    assert!(cache.contains("db"));

    thread::sleep(Duration::from_millis(150) + Duration::from_millis(20) * 3);
    assert!(!cache.contains("db"), "sweep should have evicted the entry");
    assert_eq!(*closed.lock(), [7]);
}

#[test]
fn fresh_entries_survive_the_sweep() {
    let (cache, closed) = recording_cache(Duration::from_secs(60), Duration::from_millis(10));
    cache.put("db", 1);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(cache.get("db"), Some(1));
    assert!(closed.lock().is_empty());
}

#[test]
fn close_stops_the_sweep_and_drains() {
    let (cache, closed) = recording_cache(Duration::from_secs(60), Duration::from_millis(10));
    cache.put("a", 1);
    cache.put("b", 2);
    cache.close().unwrap();
    let mut seen = closed.lock().clone();
    seen.sort_unstable();
    assert_eq!(seen, [1, 2]);
}

#[test]
fn concurrent_access() {
    let (cache, _) = recording_cache(Duration::from_secs(60), Duration::from_millis(10));
    let cache = Arc::new(cache);
    let workers: Vec<_> = (0..4u32)
        .map(|n| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..50u32 {
                    let key = format!("k{}", (n * 50 + i) % 12);
                    cache.put(key.clone(), i);
                    let _ = cache.get(&key);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    assert!(cache.len() <= 10);
}
