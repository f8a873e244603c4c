//! TTL read cache over any key store

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{trace, warn};

use crate::error::Result;
use crate::KeyStore;

/// Cached key with its refresh timestamp
struct CacheEntry {
    key: Vec<u8>,
    refreshed_at: Instant,
}

impl CacheEntry {
    fn new(key: Vec<u8>) -> Self {
        Self {
            key,
            refreshed_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.refreshed_at.elapsed() < ttl
    }
}

/// Decorator adding TTL-based read caching to any [`KeyStore`].
///
/// Lookups within the TTL window are served from memory without touching the
/// backend; expired entries are re-fetched and overwritten. Key creation
/// always goes to the backend and seeds the cache with the new ID.
///
/// Safe for concurrent use if and only if the wrapped backend is, and the
/// backend upholds the key stability contract. Concurrent misses for the same
/// ID are not serialized; a cache stampede costs duplicate backend reads.
pub struct CachedKeyStore<K> {
    inner: K,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl<K: KeyStore> CachedKeyStore<K> {
    /// Wrap `inner` with a read cache holding entries for `ttl`.
    ///
    /// # Panics
    ///
    /// Panics if `ttl` is zero. A non-positive TTL is a programming error,
    /// not a recoverable condition.
    pub fn new(inner: K, ttl: Duration) -> Self {
        assert!(!ttl.is_zero(), "cache TTL must be positive");
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &K {
        &self.inner
    }
}

impl<K: KeyStore> KeyStore for CachedKeyStore<K> {
    fn new_key(&self) -> Result<(String, Vec<u8>)> {
        // Creation can never be served from cache.
        let (id, key) = self.inner.new_key()?;
        self.entries
            .write()
            .insert(id.clone(), CacheEntry::new(key.clone()));
        Ok((id, key))
    }

    fn key_from_id(&self, id: &str) -> Result<Vec<u8>> {
        if let Some(entry) = self.entries.read().get(id) {
            if entry.is_fresh(self.ttl) {
                trace!(id, "key cache hit");
                return Ok(entry.key.clone());
            }
        }

        // Miss or expiry: fetch with no lock held, then install.
        let key = self.inner.key_from_id(id)?;

        let mut entries = self.entries.write();
        if let Some(stale) = entries.get(id) {
            if stale.key != key {
                // Backends must never rebind an ID; surface the violation.
                warn!(id, "backend returned a different key for a cached ID");
            }
        }
        entries.insert(id.to_string(), CacheEntry::new(key.clone()));
        Ok(key)
    }
}
