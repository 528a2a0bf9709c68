//! In-memory query cache with per-entry TTL.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct Entry {
    value: serde_json::Value,
    expires_at: Instant,
}

/// Caches decoded API responses by query key. Entries expire after a
/// fixed TTL and are dropped eagerly when a write invalidates them.
pub struct QueryCache {
    entries: RwLock<HashMap<String, Entry>>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Get a cached value if present and not expired.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;
        if Instant::now() >= entry.expires_at {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Store a value under a key.
    pub fn set(&self, key: &str, value: serde_json::Value) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                key.to_string(),
                Entry {
                    value,
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
    }

    /// Drop one key.
    pub fn invalidate(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    /// Drop everything.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        // Short enough that stale reads resolve on their own even if a
        // write happened out of band.
        Self::new(Duration::from_secs(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_invalidate() {
        let cache = QueryCache::new(Duration::from_secs(60));
        assert!(cache.get("me").is_none());

        cache.set("me", serde_json::json!({"id": "u1"}));
        assert_eq!(cache.get("me").unwrap()["id"], "u1");

        cache.invalidate("me");
        assert!(cache.get("me").is_none());
    }

    #[test]
    fn test_expiry() {
        let cache = QueryCache::new(Duration::from_millis(0));
        cache.set("k", serde_json::json!(1));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_clear() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.set("serviceRequest:a", serde_json::json!(1));
        cache.set("me", serde_json::json!(2));

        cache.clear();
        assert!(cache.get("serviceRequest:a").is_none());
        assert!(cache.get("me").is_none());
    }
}
