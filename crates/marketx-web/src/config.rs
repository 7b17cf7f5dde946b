//! Command-line and environment configuration for the `marketx` server.
//!
//! | Option | Env | Default |
//! |--------|-----|---------|
//! | `--listen` | `MARKETX_LISTEN` | `127.0.0.1:8501` |
//! | `--api-key` | `MARKETX_FINNHUB_API_KEY` | required |
//! | `--base-url` | `MARKETX_FINNHUB_BASE_URL` | Finnhub v1 |
//! | `--cache-ttl-secs` | `MARKETX_CACHE_TTL_SECS` | `300` |
//! | `--cache-capacity` | `MARKETX_CACHE_CAPACITY` | `256` |
//! | `--timeout-ms` | `MARKETX_TIMEOUT_MS` | `10000` |
//!
//! A `.env` file in the working directory is loaded before parsing.

use std::fmt::{Debug, Formatter};
use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use marketx_core::{CacheMode, FinnhubClient, MarketData, ResponseCache, DEFAULT_BASE_URL};

/// Market Explorer: stock, ETF and index dashboard backed by Finnhub.
#[derive(Clone, Parser)]
#[command(name = "marketx", author, version, about = "Market Explorer dashboard server")]
pub struct Config {
    /// Address the HTTP server binds to.
    #[arg(long, env = "MARKETX_LISTEN", default_value = "127.0.0.1:8501")]
    pub listen: SocketAddr,

    /// Finnhub API key, sent as the `X-Finnhub-Token` header.
    #[arg(long, env = "MARKETX_FINNHUB_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Provider base URL.
    #[arg(long, env = "MARKETX_FINNHUB_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Seconds a provider reply stays cached; 0 disables caching.
    #[arg(long, env = "MARKETX_CACHE_TTL_SECS", default_value_t = 300)]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached replies.
    #[arg(long, env = "MARKETX_CACHE_CAPACITY", default_value_t = 256)]
    pub cache_capacity: usize,

    /// Per-request provider timeout in milliseconds.
    #[arg(long, env = "MARKETX_TIMEOUT_MS", default_value_t = 10_000)]
    pub timeout_ms: u64,
}

impl Config {
    pub fn cache(&self) -> ResponseCache {
        ResponseCache::new(Duration::from_secs(self.cache_ttl_secs), self.cache_capacity)
    }

    pub fn cache_mode(&self) -> CacheMode {
        if self.cache_ttl_secs == 0 || self.cache_capacity == 0 {
            CacheMode::Bypass
        } else {
            CacheMode::Use
        }
    }

    pub fn client(&self) -> FinnhubClient {
        FinnhubClient::new(self.api_key.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout_ms(self.timeout_ms)
    }

    pub fn market_data(&self) -> MarketData {
        MarketData::new(self.client(), self.cache()).with_cache_mode(self.cache_mode())
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("listen", &self.listen)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("cache_capacity", &self.cache_capacity)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketx_core::{CacheKey, Endpoint};

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("marketx").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults_apply() {
        let config = parse(&["--api-key", "k"]);
        assert_eq!(config.listen, "127.0.0.1:8501".parse::<SocketAddr>().expect("addr"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.cache_capacity, 256);
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.cache_mode(), CacheMode::Use);
    }

    #[test]
    fn zero_ttl_bypasses_cache() {
        let config = parse(&["--api-key", "k", "--cache-ttl-secs", "0"]);
        assert_eq!(config.cache_mode(), CacheMode::Bypass);
    }

    #[tokio::test]
    async fn never_expiring_ttl_still_caches() {
        let config = parse(&["--api-key", "k", "--cache-ttl-secs", "18446744073709551615"]);
        let cache = config.cache();
        let key = CacheKey::new(Endpoint::PriceTarget, ["AAPL"]);

        cache.put(key.clone(), serde_json::json!({"targetMean": 1.0}), None).await;

        assert_eq!(config.cache_mode(), CacheMode::Use);
        assert!(cache.get(&key).await.is_some());
    }

    #[test]
    fn debug_hides_api_key() {
        let config = parse(&["--api-key", "very-secret"]);
        assert!(!format!("{config:?}").contains("very-secret"));
    }
}
