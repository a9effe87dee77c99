//! Parsley ConnCache - a shared cache of open connection handles.
//!
//! The cache stores handles the caller has already opened (database pools,
//! SFTP sessions) keyed by a connection string. Opening a handle on a miss
//! is the caller's job.
//!
//! # Eviction
//!
//! - **TTL**: an entry older than [`CacheConfig::ttl`] is evicted on the
//!   next `get`, or by the background sweep, whichever comes first.
//! - **Health**: `get` runs the health check; a failing handle is evicted
//!   and the lookup reports a miss.
//! - **LRU**: `put` at capacity evicts the least recently used entry.
//!
//! Every evicted handle is passed to the close callback. Close failures
//! are logged and otherwise ignored, except in [`ConnectionCache::close`],
//! which returns the first one. Dropping the cache closes whatever it
//! still holds.
//!
//! # Concurrency
//!
//! All entry state sits behind one `parking_lot::RwLock`. Lookups take the
//! read lock; eviction, insertion, and timestamp refresh take the write
//! lock. Callbacks always run with no lock held.

mod sweep;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use sweep::SweepState;

/// Sizing and timing for a [`ConnectionCache`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of cached handles.
    pub capacity: usize,
    /// Age after which a handle is evicted, however recently it was used.
    pub ttl: Duration,
    /// How often the background sweep looks for expired handles.
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            capacity: 100,
            ttl: Duration::from_secs(30 * 60),
            sweep_interval: Duration::from_secs(5 * 60),
        }
    }
}

impl CacheConfig {
    /// Database connection pools.
    pub fn db() -> Self {
        CacheConfig::default()
    }

    /// SFTP sessions: fewer, shorter-lived.
    pub fn sftp() -> Self {
        CacheConfig {
            capacity: 50,
            ttl: Duration::from_secs(15 * 60),
            ..CacheConfig::default()
        }
    }
}

/// Failure surfaced by [`ConnectionCache::close`].
#[derive(Debug, thiserror::Error)]
pub enum CacheError<E> {
    #[error("failed to close connection `{key}`: {source}")]
    Close {
        key: String,
        #[source]
        source: E,
    },
}

/// Why an entry left the cache.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum EvictReason {
    Expired,
    Unhealthy,
    LeastRecentlyUsed,
    Replaced,
}

impl EvictReason {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Unhealthy => "unhealthy",
            Self::LeastRecentlyUsed => "lru",
            Self::Replaced => "replaced",
        }
    }
}

type HealthCheck<T, E> = Box<dyn Fn(&T) -> Result<(), E> + Send + Sync>;
type Closer<T, E> = Box<dyn Fn(T) -> Result<(), E> + Send + Sync>;

struct CachedConnection<T> {
    conn: T,
    created_at: Instant,
    last_used: Instant,
    /// Tie-breaker for LRU when two `last_used` readings are equal.
    recency: u64,
}

/// State shared with the sweep thread.
pub(crate) struct Shared<T, E> {
    config: CacheConfig,
    entries: RwLock<FxHashMap<String, CachedConnection<T>>>,
    clock: AtomicU64,
    health: HealthCheck<T, E>,
    close: Closer<T, E>,
}

impl<T, E: std::fmt::Display> Shared<T, E> {
    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn is_expired(&self, entry: &CachedConnection<T>, now: Instant) -> bool {
        now.saturating_duration_since(entry.created_at) > self.config.ttl
    }

    /// Close a handle that is no longer in the map, logging failure.
    fn discard(&self, key: &str, conn: T, reason: EvictReason) {
        debug!(key, reason = reason.as_str(), "evicting connection");
        if let Err(error) = (self.close)(conn) {
            warn!(key, %error, "failed to close evicted connection");
        }
    }

    /// Remove and close every entry past its TTL. Returns how many went.
    pub(crate) fn evict_stale(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<(String, T)> = {
            let mut entries = self.entries.write();
            let keys: Vec<String> = entries
                .iter()
                .filter(|(_, entry)| self.is_expired(entry, now))
                .map(|(key, _)| key.clone())
                .collect();
            keys.into_iter()
                .filter_map(|key| entries.remove(&key).map(|entry| (key, entry.conn)))
                .collect()
        };
        let count = expired.len();
        for (key, conn) in expired {
            self.discard(&key, conn, EvictReason::Expired);
        }
        if count > 0 {
            debug!(count, "sweep evicted expired connections");
        }
        count
    }
}

/// A thread-safe cache of connection handles of type `T`.
///
/// `E` is the error type of the health and close callbacks.
pub struct ConnectionCache<T, E: std::fmt::Display> {
    shared: Arc<Shared<T, E>>,
    sweeper: Mutex<SweepState>,
}

impl<T, E> ConnectionCache<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: std::fmt::Display + Send + 'static,
{
    /// A cache that checks handles with `health` and releases them with
    /// `close`. Neither can be changed afterwards.
    pub fn new(
        config: CacheConfig,
        health: impl Fn(&T) -> Result<(), E> + Send + Sync + 'static,
        close: impl Fn(T) -> Result<(), E> + Send + Sync + 'static,
    ) -> Self {
        ConnectionCache {
            shared: Arc::new(Shared {
                config,
                entries: RwLock::new(FxHashMap::default()),
                clock: AtomicU64::new(0),
                health: Box::new(health),
                close: Box::new(close),
            }),
            sweeper: Mutex::new(SweepState::Idle),
        }
    }

    pub fn config(&self) -> CacheConfig {
        self.shared.config
    }

    /// The handle cached under `key`, if it is fresh and healthy.
    ///
    /// An expired or unhealthy handle is evicted and closed, and the
    /// lookup reports a miss. A hit refreshes the entry's last-used time.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = Instant::now();
        let (conn, created_at, expired) = {
            let entries = self.shared.entries.read();
            let Some(entry) = entries.get(key) else {
                trace!(key, "connection cache miss");
                return None;
            };
            (
                entry.conn.clone(),
                entry.created_at,
                self.shared.is_expired(entry, now),
            )
        };

        if expired {
            self.evict_if_same(key, created_at, EvictReason::Expired);
            return None;
        }
        if let Err(error) = (self.shared.health)(&conn) {
            debug!(key, %error, "health check failed");
            self.evict_if_same(key, created_at, EvictReason::Unhealthy);
            return None;
        }

        let recency = self.shared.tick();
        if let Some(entry) = self.shared.entries.write().get_mut(key) {
            entry.last_used = Instant::now();
            entry.recency = recency;
        }
        trace!(key, "connection cache hit");
        Some(conn)
    }

    /// Remove `key` only if it still holds the entry created at
    /// `created_at`; a concurrent `put` may have replaced it.
    fn evict_if_same(&self, key: &str, created_at: Instant, reason: EvictReason) {
        let removed = {
            let mut entries = self.shared.entries.write();
            match entries.get(key) {
                Some(entry) if entry.created_at == created_at => entries.remove(key),
                _ => None,
            }
        };
        if let Some(entry) = removed {
            self.shared.discard(key, entry.conn, reason);
        }
    }

    /// Cache `conn` under `key`.
    ///
    /// At capacity, the least recently used entry is evicted first. A
    /// handle already cached under `key` is replaced and closed. The first
    /// `put` starts the background sweep.
    pub fn put(&self, key: impl Into<String>, conn: T) {
        self.ensure_sweeper();
        let key = key.into();
        let now = Instant::now();
        let entry = CachedConnection {
            conn,
            created_at: now,
            last_used: now,
            recency: self.shared.tick(),
        };

        let mut evicted = Vec::new();
        {
            let mut entries = self.shared.entries.write();
            if let Some(old) = entries.remove(&key) {
                evicted.push((key.clone(), old.conn, EvictReason::Replaced));
            }
            while entries.len() >= self.shared.config.capacity.max(1) {
                let Some(lru) = entries
                    .iter()
                    .min_by_key(|(_, e)| (e.last_used, e.recency))
                    .map(|(k, _)| k.clone())
                else {
                    break;
                };
                if let Some(old) = entries.remove(&lru) {
                    evicted.push((lru, old.conn, EvictReason::LeastRecentlyUsed));
                }
            }
            entries.insert(key, entry);
        }
        for (key, conn, reason) in evicted {
            self.shared.discard(&key, conn, reason);
        }
    }

    /// Evict and close every expired entry now. The sweep calls this on
    /// each tick.
    pub fn evict_stale(&self) -> usize {
        self.shared.evict_stale()
    }

    /// Whether `key` is cached. Does not check health or refresh the entry.
    pub fn contains(&self, key: &str) -> bool {
        self.shared.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.shared.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.entries.read().is_empty()
    }

    /// Stop the sweep and close every cached handle.
    ///
    /// Every handle is closed even if some fail; the first failure is
    /// returned. The cache is empty and still usable afterwards.
    pub fn close(&self) -> Result<(), CacheError<E>> {
        self.sweeper.lock().stop();
        let drained: Vec<(String, CachedConnection<T>)> =
            self.shared.entries.write().drain().collect();
        debug!(count = drained.len(), "closing connection cache");

        let mut first_error = None;
        for (key, entry) in drained {
            if let Err(error) = (self.shared.close)(entry.conn) {
                warn!(key = key.as_str(), %error, "failed to close connection");
                if first_error.is_none() {
                    first_error = Some(CacheError::Close { key, source: error });
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn ensure_sweeper(&self) {
        self.sweeper.lock().ensure_started(&self.shared);
    }
}

/// Dropping the cache stops the sweep and closes every remaining handle.
/// Close failures are logged.
impl<T, E: std::fmt::Display> Drop for ConnectionCache<T, E> {
    fn drop(&mut self) {
        self.sweeper.get_mut().stop();
        let drained: Vec<(String, CachedConnection<T>)> =
            self.shared.entries.write().drain().collect();
        if !drained.is_empty() {
            debug!(count = drained.len(), "closing connections of dropped cache");
        }
        for (key, entry) in drained {
            if let Err(error) = (self.shared.close)(entry.conn) {
                warn!(key = key.as_str(), %error, "failed to close connection");
            }
        }
    }
}

#[cfg(test)]
mod tests;
