//! In-process TTL cache for expensive list endpoints.
//!
//! The specials listing and stats queries are the hot read path and their
//! underlying data changes only when a feed is ingested, so short-TTL
//! caching absorbs most of the load. Keys are a SHA-256 digest of the
//! sorted query parameters, so any parameter combination caches
//! independently.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct CacheEntry {
    inserted_at: Instant,
    value: serde_json::Value,
}

/// A TTL cache of serialized response payloads.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
}

impl ResponseCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Builds a cache key from a prefix and name/value parameter pairs.
    /// Pairs are sorted so parameter order never splits the cache.
    #[must_use]
    pub fn key(prefix: &str, params: &[(&str, String)]) -> String {
        let mut sorted: Vec<String> = params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        sorted.sort();

        let mut hasher = Sha256::new();
        hasher.update(sorted.join("&").as_bytes());
        let digest = hasher.finalize();

        // Twelve hex chars is plenty for a process-local cache.
        let short: String = digest
            .iter()
            .take(6)
            .map(|b| format!("{b:02x}"))
            .collect();
        format!("{prefix}:{short}")
    }

    /// Returns the cached value if present and fresh. Expired entries are
    /// removed on access.
    pub async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let mut entries = self.entries.lock().await;

        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores a value under the key.
    pub async fn put(&self, key: String, value: serde_json::Value) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key,
            CacheEntry {
                inserted_at: Instant::now(),
                value,
            },
        );
    }

    /// Drops every entry. Called when an ingest lands new data.
    pub async fn invalidate_all(&self) {
        self.entries.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_fresh_entry() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache
            .put("k".to_string(), serde_json::json!({"total": 3}))
            .await;

        let hit = cache.get("k").await.expect("expected cache hit");
        assert_eq!(hit["total"], 3);
    }

    #[tokio::test]
    async fn get_expires_stale_entry() {
        let cache = ResponseCache::new(Duration::from_millis(0));
        cache.put("k".to_string(), serde_json::json!(1)).await;

        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn invalidate_all_clears_entries() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put("a".to_string(), serde_json::json!(1)).await;
        cache.put("b".to_string(), serde_json::json!(2)).await;

        cache.invalidate_all().await;

        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_none());
    }

    #[test]
    fn key_is_stable_across_param_order() {
        let forward = ResponseCache::key(
            "specials",
            &[("store", "coles".to_string()), ("sort", "name".to_string())],
        );
        let reversed = ResponseCache::key(
            "specials",
            &[("sort", "name".to_string()), ("store", "coles".to_string())],
        );
        assert_eq!(forward, reversed);
    }

    #[test]
    fn key_differs_for_different_params() {
        let coles = ResponseCache::key("specials", &[("store", "coles".to_string())]);
        let aldi = ResponseCache::key("specials", &[("store", "aldi".to_string())]);
        assert_ne!(coles, aldi);
    }
}
