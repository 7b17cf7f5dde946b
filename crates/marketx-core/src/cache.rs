//! In-memory, time-expiring cache for provider replies.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::data_source::Endpoint;

/// Default time-to-live of a cached reply.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
/// Default maximum number of cached replies.
pub const DEFAULT_CAPACITY: usize = 256;
/// Longest lifetime an entry can get; larger TTLs are clamped to it.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Defines the behavior of the cache for a fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Read from the cache if a non-expired entry is present;
    /// otherwise, fetch from the network and write the reply to the cache. (Default)
    #[default]
    Use,
    /// Always fetch from the network, bypassing any cached entry,
    /// and write the new reply to the cache.
    Refresh,
    /// Always fetch from the network and do not read from or write to the cache.
    Bypass,
}

/// Cache key: the endpoint plus the fetcher's own arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub endpoint: Endpoint,
    pub args: Vec<String>,
}

impl CacheKey {
    pub fn new<I, S>(endpoint: Endpoint, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            endpoint,
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.endpoint, self.args.join(","))
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

#[derive(Debug)]
struct CacheInner {
    map: HashMap<CacheKey, CacheEntry>,
    default_ttl: Duration,
    capacity: usize,
}

impl CacheInner {
    fn new(default_ttl: Duration, capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            default_ttl,
            capacity,
        }
    }

    fn get(&self, key: &CacheKey) -> Option<Value> {
        self.map.get(key).and_then(|entry| {
            if Instant::now() <= entry.expires_at {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    fn put(&mut self, key: CacheKey, value: Value, ttl_override: Option<Duration>) {
        if !self.map.contains_key(&key) && self.map.len() >= self.capacity {
            self.clear_expired();
            if self.map.len() >= self.capacity {
                self.evict_soonest_expiring();
            }
        }

        let now = Instant::now();
        let ttl = ttl_override.unwrap_or(self.default_ttl).min(MAX_TTL);
        let expires_at = now.checked_add(ttl).unwrap_or(now);
        self.map.insert(key, CacheEntry { value, expires_at });
    }

    fn evict_soonest_expiring(&mut self) {
        let victim = self
            .map
            .iter()
            .min_by_key(|(_, entry)| entry.expires_at)
            .map(|(key, _)| key.clone());
        if let Some(key) = victim {
            self.map.remove(&key);
        }
    }

    fn clear_expired(&mut self) {
        let now = Instant::now();
        self.map.retain(|_, entry| entry.expires_at > now);
    }
}

/// Thread-safe, bounded reply cache shared by every render.
///
/// A cache built with a zero TTL or zero capacity is disabled: `put` is a
/// no-op and `get` always misses.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    inner: Arc<tokio::sync::RwLock<CacheInner>>,
}

impl ResponseCache {
    pub fn new(default_ttl: Duration, capacity: usize) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner::new(
                default_ttl,
                capacity,
            ))),
        }
    }

    /// Five-minute TTL, 256 entries.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, 0)
    }

    /// Returns the cached reply unless missing or expired.
    pub async fn get(&self, key: &CacheKey) -> Option<Value> {
        let store = self.inner.read().await;
        store.get(key)
    }

    /// Stores a reply, evicting the soonest-expiring entry when full.
    pub async fn put(&self, key: CacheKey, value: Value, ttl_override: Option<Duration>) {
        let mut store = self.inner.write().await;

        if store.default_ttl == Duration::ZERO || store.capacity == 0 {
            return;
        }

        store.put(key, value, ttl_override);
    }

    pub async fn invalidate(&self, key: &CacheKey) -> bool {
        let mut store = self.inner.write().await;
        store.map.remove(key).is_some()
    }

    pub async fn clear_expired(&self) {
        let mut store = self.inner.write().await;
        store.clear_expired();
    }

    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.map.clear();
    }

    /// Number of entries, expired ones included.
    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn is_disabled(&self) -> bool {
        let store = self.inner.read().await;
        store.default_ttl == Duration::ZERO || store.capacity == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(symbol: &str) -> CacheKey {
        CacheKey::new(Endpoint::PriceTarget, [symbol])
    }

    #[tokio::test]
    async fn test_cache_basic_operations() {
        let cache = ResponseCache::new(Duration::from_secs(1), 8);

        assert!(cache.get(&key("AAPL")).await.is_none());

        cache.put(key("AAPL"), json!({"targetMean": 1.0}), None).await;
        assert_eq!(cache.get(&key("AAPL")).await, Some(json!({"targetMean": 1.0})));

        cache.put(key("AAPL"), json!({"targetMean": 2.0}), None).await;
        assert_eq!(cache.get(&key("AAPL")).await, Some(json!({"targetMean": 2.0})));
    }

    #[tokio::test]
    async fn test_keys_differ_by_arguments() {
        let cache = ResponseCache::new(Duration::from_secs(60), 8);
        let earnings_12 = CacheKey::new(Endpoint::CompanyEarnings, ["AAPL", "12"]);
        let earnings_40 = CacheKey::new(Endpoint::CompanyEarnings, ["AAPL", "40"]);

        cache.put(earnings_12.clone(), json!([1]), None).await;

        assert!(cache.get(&earnings_12).await.is_some());
        assert!(cache.get(&earnings_40).await.is_none());
        assert_eq!(earnings_40.to_string(), "company_earnings(AAPL,40)");
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache = ResponseCache::new(Duration::from_millis(100), 8);

        cache.put(key("AAPL"), json!(1), None).await;
        assert!(cache.get(&key("AAPL")).await.is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.get(&key("AAPL")).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_ttl_override() {
        let cache = ResponseCache::new(Duration::from_secs(60), 8);

        cache
            .put(key("AAPL"), json!(1), Some(Duration::from_millis(100)))
            .await;

        assert!(cache.get(&key("AAPL")).await.is_some());
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(cache.get(&key("AAPL")).await.is_none());
    }

    #[tokio::test]
    async fn test_huge_ttl_is_clamped() {
        let cache = ResponseCache::new(Duration::from_secs(u64::MAX), 8);

        cache.put(key("AAPL"), json!(1), None).await;
        cache
            .put(key("MSFT"), json!(2), Some(Duration::MAX))
            .await;

        assert_eq!(cache.get(&key("AAPL")).await, Some(json!(1)));
        assert_eq!(cache.get(&key("MSFT")).await, Some(json!(2)));
    }

    #[tokio::test]
    async fn test_capacity_evicts_soonest_expiring() {
        let cache = ResponseCache::new(Duration::from_secs(60), 2);

        cache
            .put(key("SHORT"), json!(1), Some(Duration::from_secs(5)))
            .await;
        cache.put(key("LONG"), json!(2), None).await;
        cache.put(key("NEW"), json!(3), None).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.get(&key("SHORT")).await.is_none());
        assert!(cache.get(&key("LONG")).await.is_some());
        assert!(cache.get(&key("NEW")).await.is_some());
    }

    #[tokio::test]
    async fn test_capacity_prefers_purging_expired() {
        let cache = ResponseCache::new(Duration::from_secs(60), 2);

        cache
            .put(key("STALE"), json!(1), Some(Duration::from_millis(50)))
            .await;
        cache.put(key("FRESH"), json!(2), None).await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        cache.put(key("NEW"), json!(3), None).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.get(&key("FRESH")).await.is_some());
        assert!(cache.get(&key("NEW")).await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache = ResponseCache::new(Duration::from_secs(60), 8);

        cache.put(key("AAPL"), json!(1), None).await;
        cache.put(key("MSFT"), json!(2), None).await;

        assert!(cache.invalidate(&key("AAPL")).await);
        assert!(!cache.invalidate(&key("AAPL")).await);
        assert_eq!(cache.len().await, 1);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_cache_clear_expired() {
        let cache = ResponseCache::new(Duration::from_millis(100), 8);

        cache.put(key("AAPL"), json!(1), None).await;
        cache.put(key("MSFT"), json!(2), None).await;
        assert_eq!(cache.len().await, 2);

        tokio::time::sleep(Duration::from_millis(150)).await;
        cache.clear_expired().await;

        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_cache_disabled() {
        let cache = ResponseCache::disabled();

        assert!(cache.is_disabled().await);

        cache.put(key("AAPL"), json!(1), None).await;
        assert!(cache.get(&key("AAPL")).await.is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[test]
    fn test_cache_mode_default() {
        let mode: CacheMode = Default::default();
        assert_eq!(mode, CacheMode::Use);
    }
}
