#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use std::io;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::*;

/// Records closed handles and lets a test mark handles unhealthy.
#[derive(Clone, Default)]
struct Probe {
    closed: Arc<Mutex<Vec<String>>>,
    unhealthy: Arc<Mutex<Vec<String>>>,
    failing_close: Arc<Mutex<Vec<String>>>,
}

impl Probe {
    fn cache(&self, config: CacheConfig) -> ConnectionCache<String, io::Error> {
        let unhealthy = Arc::clone(&self.unhealthy);
        let closed = Arc::clone(&self.closed);
        let failing = Arc::clone(&self.failing_close);
        ConnectionCache::new(
            config,
            move |conn: &String| {
                if unhealthy.lock().contains(conn) {
                    Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
                } else {
                    Ok(())
                }
            },
            move |conn: String| {
                let fail = failing.lock().contains(&conn);
                closed.lock().push(conn.clone());
                if fail {
                    Err(io::Error::other(format!("cannot close {conn}")))
                } else {
                    Ok(())
                }
            },
        )
    }

    fn closed(&self) -> Vec<String> {
        let mut closed = self.closed.lock().clone();
        closed.sort();
        closed
    }
}

fn small(capacity: usize) -> CacheConfig {
    CacheConfig {
        capacity,
        ttl: Duration::from_secs(60),
        sweep_interval: Duration::from_secs(60),
    }
}

mod config {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn presets() {
        let default = CacheConfig::default();
        assert_eq!(default.capacity, 100);
        assert_eq!(default.ttl, Duration::from_secs(1800));
        assert_eq!(default.sweep_interval, Duration::from_secs(300));
        assert_eq!(CacheConfig::db(), default);

        let sftp = CacheConfig::sftp();
        assert_eq!(sftp.capacity, 50);
        assert_eq!(sftp.ttl, Duration::from_secs(900));
    }
}

mod lookups {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hit_and_miss() {
        let probe = Probe::default();
        let cache = probe.cache(small(3));
        assert_eq!(cache.get("db"), None);
        cache.put("db", "conn-1".to_string());
        assert_eq!(cache.get("db"), Some("conn-1".to_string()));
        assert!(cache.contains("db"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn unhealthy_handles_are_evicted_and_closed() {
        let probe = Probe::default();
        let cache = probe.cache(small(3));
        cache.put("db", "conn-1".to_string());
        probe.unhealthy.lock().push("conn-1".to_string());

        assert_eq!(cache.get("db"), None);
        assert!(!cache.contains("db"));
        assert_eq!(probe.closed(), ["conn-1"]);
    }

    #[test]
    fn replacing_a_key_closes_the_old_handle() {
        let probe = Probe::default();
        let cache = probe.cache(small(3));
        cache.put("db", "old".to_string());
        cache.put("db", "new".to_string());
        assert_eq!(cache.get("db"), Some("new".to_string()));
        assert_eq!(cache.len(), 1);
        assert_eq!(probe.closed(), ["old"]);
    }
}

mod eviction {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn least_recently_used_goes_first() {
        let probe = Probe::default();
        let cache = probe.cache(small(3));
        cache.put("k1", "c1".to_string());
        cache.put("k2", "c2".to_string());
        cache.put("k3", "c3".to_string());
        assert!(cache.get("k1").is_some());
        cache.put("k4", "c4".to_string());

        assert!(!cache.contains("k2"));
        for key in ["k1", "k3", "k4"] {
            assert!(cache.contains(key), "{key} should survive");
        }
        assert_eq!(probe.closed(), ["c2"]);
    }

    #[test]
    fn zero_capacity_still_holds_one() {
        let probe = Probe::default();
        let cache = probe.cache(small(0));
        cache.put("a", "1".to_string());
        cache.put("b", "2".to_string());
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("b"));
    }

    #[test]
    fn expired_entries_miss_on_get() {
        let probe = Probe::default();
        let cache = probe.cache(CacheConfig {
            ttl: Duration::ZERO,
            ..small(3)
        });
        cache.put("db", "conn".to_string());
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get("db"), None);
        assert_eq!(probe.closed(), ["conn"]);
    }

    #[test]
    fn evict_stale_reports_count() {
        let probe = Probe::default();
        let cache = probe.cache(CacheConfig {
            ttl: Duration::ZERO,
            ..small(3)
        });
        cache.put("a", "1".to_string());
        cache.put("b", "2".to_string());
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.evict_stale(), 2);
        assert!(cache.is_empty());
    }
}

mod closing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn close_closes_everything() {
        let probe = Probe::default();
        let cache = probe.cache(small(3));
        cache.put("a", "1".to_string());
        cache.put("b", "2".to_string());
        cache.close().unwrap();
        assert!(cache.is_empty());
        assert_eq!(probe.closed(), ["1", "2"]);
    }

    #[test]
    fn close_reports_a_failure_but_closes_the_rest() {
        let probe = Probe::default();
        let cache = probe.cache(small(3));
        probe.failing_close.lock().push("2".to_string());
        cache.put("a", "1".to_string());
        cache.put("b", "2".to_string());
        cache.put("c", "3".to_string());

        let err = cache.close().unwrap_err();
        let CacheError::Close { key, source } = &err;
        assert_eq!(key, "b");
        assert_eq!(source.to_string(), "cannot close 2");
        assert_eq!(err.to_string(), "failed to close connection `b`: cannot close 2");
        assert_eq!(probe.closed(), ["1", "2", "3"]);
    }

    #[test]
    fn cache_is_usable_after_close() {
        let probe = Probe::default();
        let cache = probe.cache(small(3));
        cache.put("a", "1".to_string());
        cache.close().unwrap();
        cache.put("a", "2".to_string());
        assert_eq!(cache.get("a"), Some("2".to_string()));
    }

    #[test]
    fn dropping_the_cache_closes_remaining_handles() {
        let probe = Probe::default();
        probe.failing_close.lock().push("1".to_string());
        let cache = probe.cache(small(3));
        cache.put("a", "1".to_string());
        cache.put("b", "2".to_string());
        drop(cache);
        assert_eq!(probe.closed(), ["1", "2"]);
    }

    #[test]
    fn dropping_a_closed_cache_closes_nothing_twice() {
        let probe = Probe::default();
        let cache = probe.cache(small(3));
        cache.put("a", "1".to_string());
        cache.close().unwrap();
        drop(cache);
        assert_eq!(probe.closed(), ["1"]);
    }
}

mod sweeping {
    use super::*;

    #[test]
    fn first_put_starts_the_sweep_and_close_stops_it() {
        let cache = Probe::default().cache(small(3));
        assert!(matches!(*cache.sweeper.lock(), SweepState::Idle));
        cache.put("a", "1".to_string());
        assert!(matches!(*cache.sweeper.lock(), SweepState::Running(_)));
        cache.close().unwrap();
        assert!(matches!(*cache.sweeper.lock(), SweepState::Idle));
    }

    #[test]
    fn a_failed_spawn_is_not_retried() {
        let cache = Probe::default().cache(small(3));
        *cache.sweeper.lock() = SweepState::Unavailable;
        cache.put("a", "1".to_string());
        cache.put("b", "2".to_string());
        assert!(matches!(*cache.sweeper.lock(), SweepState::Unavailable));
        cache.close().unwrap();
        assert!(matches!(*cache.sweeper.lock(), SweepState::Unavailable));
        assert_eq!(cache.get("b"), None);
    }
}
