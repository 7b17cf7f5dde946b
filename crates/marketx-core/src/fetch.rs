//! Cached fetchers: one method per provider endpoint.
//!
//! Each fetcher memoizes the raw reply under a [`CacheKey`] built from the
//! endpoint and the fetcher's own arguments. Date windows computed from
//! "today" are not part of the key, so a reply fetched just before midnight
//! is served until it expires. Only successful replies are cached; errors
//! propagate unchanged and are never retried.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use time::macros::date;
use tracing::debug;

use crate::adapters::FinnhubClient;
use crate::cache::{CacheKey, CacheMode, ResponseCache};
use crate::data_source::{Endpoint, FetchError, ProviderRequest};
use crate::domain::{
    today_utc, BasicFinancials, CountryExposure, DateWindow, Dividends, EarningsCalendar,
    EarningsSurprise, EpsEstimates, EstimateFrequency, EtfHoldings, EtfProfile, GradeChange,
    IndexConstituents, PriceTarget, RecommendationTrend, RevenueEstimates, SectorExposure,
    Split, Symbol,
};

const EARNINGS_CALENDAR_DAYS_BACK: i64 = 365;
const EARNINGS_CALENDAR_DAYS_AHEAD: i64 = 180;
const UPGRADE_DOWNGRADE_DAYS_BACK: i64 = 730;

/// Provider handle plus reply cache.
#[derive(Debug, Clone)]
pub struct MarketData {
    client: FinnhubClient,
    cache: ResponseCache,
    mode: CacheMode,
}

impl MarketData {
    pub fn new(client: FinnhubClient, cache: ResponseCache) -> Self {
        Self {
            client,
            cache,
            mode: CacheMode::Use,
        }
    }

    pub fn with_cache_mode(mut self, mode: CacheMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub async fn basic_financials(&self, symbol: &Symbol) -> Result<BasicFinancials, FetchError> {
        let request = symbol_request(Endpoint::BasicFinancials, symbol).param("metric", "all");
        self.fetch(key(Endpoint::BasicFinancials, symbol, &[]), request)
            .await
    }

    pub async fn recommendation_trends(
        &self,
        symbol: &Symbol,
    ) -> Result<Vec<RecommendationTrend>, FetchError> {
        let request = symbol_request(Endpoint::RecommendationTrends, symbol);
        self.fetch(key(Endpoint::RecommendationTrends, symbol, &[]), request)
            .await
    }

    pub async fn price_target(&self, symbol: &Symbol) -> Result<PriceTarget, FetchError> {
        let request = symbol_request(Endpoint::PriceTarget, symbol);
        self.fetch(key(Endpoint::PriceTarget, symbol, &[]), request)
            .await
    }

    /// Most recent `limit` quarterly earnings surprises.
    pub async fn company_earnings(
        &self,
        symbol: &Symbol,
        limit: usize,
    ) -> Result<Vec<EarningsSurprise>, FetchError> {
        if limit == 0 {
            return Err(FetchError::invalid_request(
                "earnings limit must be greater than zero",
            ));
        }
        let request =
            symbol_request(Endpoint::CompanyEarnings, symbol).param("limit", limit.to_string());
        self.fetch(
            key(Endpoint::CompanyEarnings, symbol, &[limit.to_string().as_str()]),
            request,
        )
        .await
    }

    /// Earnings releases from a year back to six months ahead.
    pub async fn earnings_calendar(&self, symbol: &Symbol) -> Result<EarningsCalendar, FetchError> {
        let window = DateWindow::around(
            today_utc(),
            EARNINGS_CALENDAR_DAYS_BACK,
            EARNINGS_CALENDAR_DAYS_AHEAD,
        );
        let request = windowed(symbol_request(Endpoint::EarningsCalendar, symbol), window);
        self.fetch(key(Endpoint::EarningsCalendar, symbol, &[]), request)
            .await
    }

    /// Splits since 2000-01-01.
    pub async fn stock_splits(&self, symbol: &Symbol) -> Result<Vec<Split>, FetchError> {
        let window = DateWindow::since(date!(2000 - 01 - 01), today_utc());
        let request = windowed(symbol_request(Endpoint::StockSplits, symbol), window);
        self.fetch(key(Endpoint::StockSplits, symbol, &[]), request)
            .await
    }

    pub async fn basic_dividends(&self, symbol: &Symbol) -> Result<Dividends, FetchError> {
        let request = symbol_request(Endpoint::BasicDividends, symbol);
        self.fetch(key(Endpoint::BasicDividends, symbol, &[]), request)
            .await
    }

    /// Rating changes over the last two years.
    pub async fn upgrade_downgrade(&self, symbol: &Symbol) -> Result<Vec<GradeChange>, FetchError> {
        let window = DateWindow::around(today_utc(), UPGRADE_DOWNGRADE_DAYS_BACK, 0);
        let request = windowed(symbol_request(Endpoint::UpgradeDowngrade, symbol), window);
        self.fetch(key(Endpoint::UpgradeDowngrade, symbol, &[]), request)
            .await
    }

    pub async fn revenue_estimates(
        &self,
        symbol: &Symbol,
        freq: EstimateFrequency,
    ) -> Result<RevenueEstimates, FetchError> {
        let request = symbol_request(Endpoint::RevenueEstimates, symbol).param("freq", freq.as_str());
        self.fetch(
            key(Endpoint::RevenueEstimates, symbol, &[freq.as_str()]),
            request,
        )
        .await
    }

    pub async fn eps_estimates(
        &self,
        symbol: &Symbol,
        freq: EstimateFrequency,
    ) -> Result<EpsEstimates, FetchError> {
        let request = symbol_request(Endpoint::EpsEstimates, symbol).param("freq", freq.as_str());
        self.fetch(key(Endpoint::EpsEstimates, symbol, &[freq.as_str()]), request)
            .await
    }

    pub async fn etf_profile(&self, symbol: &Symbol) -> Result<EtfProfile, FetchError> {
        let request = symbol_request(Endpoint::EtfProfile, symbol);
        self.fetch(key(Endpoint::EtfProfile, symbol, &[]), request)
            .await
    }

    pub async fn etf_holdings(&self, symbol: &Symbol) -> Result<EtfHoldings, FetchError> {
        let request = symbol_request(Endpoint::EtfHoldings, symbol);
        self.fetch(key(Endpoint::EtfHoldings, symbol, &[]), request)
            .await
    }

    pub async fn etf_sector_exposure(&self, symbol: &Symbol) -> Result<SectorExposure, FetchError> {
        let request = symbol_request(Endpoint::EtfSectorExposure, symbol);
        self.fetch(key(Endpoint::EtfSectorExposure, symbol, &[]), request)
            .await
    }

    pub async fn etf_country_exposure(
        &self,
        symbol: &Symbol,
    ) -> Result<CountryExposure, FetchError> {
        let request = symbol_request(Endpoint::EtfCountryExposure, symbol);
        self.fetch(key(Endpoint::EtfCountryExposure, symbol, &[]), request)
            .await
    }

    pub async fn index_constituents(
        &self,
        symbol: &Symbol,
    ) -> Result<IndexConstituents, FetchError> {
        let request = symbol_request(Endpoint::IndexConstituents, symbol);
        self.fetch(key(Endpoint::IndexConstituents, symbol, &[]), request)
            .await
    }

    async fn fetch<T>(&self, key: CacheKey, request: ProviderRequest) -> Result<T, FetchError>
    where
        T: DeserializeOwned + Default,
    {
        let endpoint = key.endpoint;
        let value = self.cached(key, request).await?;
        decode(endpoint, value)
    }

    async fn cached(&self, key: CacheKey, request: ProviderRequest) -> Result<Value, FetchError> {
        if self.mode == CacheMode::Use {
            if let Some(value) = self.cache.get(&key).await {
                debug!(key = %key, "cache hit");
                return Ok(value);
            }
            debug!(key = %key, "cache miss");
        }

        let value = self.client.get(request).await?;

        if self.mode != CacheMode::Bypass {
            self.cache.put(key, value.clone(), None).await;
        }

        Ok(value)
    }
}

fn key(endpoint: Endpoint, symbol: &Symbol, extra: &[&str]) -> CacheKey {
    CacheKey::new(
        endpoint,
        std::iter::once(symbol.as_str()).chain(extra.iter().copied()),
    )
}

fn symbol_request(endpoint: Endpoint, symbol: &Symbol) -> ProviderRequest {
    ProviderRequest::new(endpoint).param("symbol", symbol.as_str())
}

fn windowed(request: ProviderRequest, window: DateWindow) -> ProviderRequest {
    request
        .param("from", window.from_param())
        .param("to", window.to_param())
}

/// `null` replies decode as the type's empty value.
fn decode<T>(endpoint: Endpoint, value: Value) -> Result<T, FetchError>
where
    T: DeserializeOwned + Default,
{
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value).map_err(|e| FetchError::decode(endpoint, e))
}
