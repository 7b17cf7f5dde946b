//! Provider endpoints, request payloads and the fetch error contract.
//!
//! # Endpoints
//!
//! | Endpoint | Path | Reply |
//! |----------|------|-------|
//! | [`Endpoint::BasicFinancials`] | `stock/metric` | [`BasicFinancials`](crate::BasicFinancials) |
//! | [`Endpoint::RecommendationTrends`] | `stock/recommendation` | `Vec<`[`RecommendationTrend`](crate::RecommendationTrend)`>` |
//! | [`Endpoint::PriceTarget`] | `stock/price-target` | [`PriceTarget`](crate::PriceTarget) |
//! | [`Endpoint::CompanyEarnings`] | `stock/earnings` | `Vec<`[`EarningsSurprise`](crate::EarningsSurprise)`>` |
//! | [`Endpoint::EarningsCalendar`] | `calendar/earnings` | [`EarningsCalendar`](crate::EarningsCalendar) |
//! | [`Endpoint::StockSplits`] | `stock/split` | `Vec<`[`Split`](crate::Split)`>` |
//! | [`Endpoint::BasicDividends`] | `stock/dividend2` | [`Dividends`](crate::Dividends) |
//! | [`Endpoint::UpgradeDowngrade`] | `stock/upgrade-downgrade` | `Vec<`[`GradeChange`](crate::GradeChange)`>` |
//! | [`Endpoint::RevenueEstimates`] | `stock/revenue-estimate` | [`RevenueEstimates`](crate::RevenueEstimates) |
//! | [`Endpoint::EpsEstimates`] | `stock/eps-estimate` | [`EpsEstimates`](crate::EpsEstimates) |
//! | [`Endpoint::EtfProfile`] | `etf/profile` | [`EtfProfile`](crate::EtfProfile) |
//! | [`Endpoint::EtfHoldings`] | `etf/holdings` | [`EtfHoldings`](crate::EtfHoldings) |
//! | [`Endpoint::EtfSectorExposure`] | `etf/sector` | [`SectorExposure`](crate::SectorExposure) |
//! | [`Endpoint::EtfCountryExposure`] | `etf/country` | [`CountryExposure`](crate::CountryExposure) |
//! | [`Endpoint::IndexConstituents`] | `index/constituents` | [`IndexConstituents`](crate::IndexConstituents) |

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Provider endpoint, used for URL building and cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    BasicFinancials,
    RecommendationTrends,
    PriceTarget,
    CompanyEarnings,
    EarningsCalendar,
    StockSplits,
    BasicDividends,
    UpgradeDowngrade,
    RevenueEstimates,
    EpsEstimates,
    EtfProfile,
    EtfHoldings,
    EtfSectorExposure,
    EtfCountryExposure,
    IndexConstituents,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BasicFinancials => "basic_financials",
            Self::RecommendationTrends => "recommendation_trends",
            Self::PriceTarget => "price_target",
            Self::CompanyEarnings => "company_earnings",
            Self::EarningsCalendar => "earnings_calendar",
            Self::StockSplits => "stock_splits",
            Self::BasicDividends => "basic_dividends",
            Self::UpgradeDowngrade => "upgrade_downgrade",
            Self::RevenueEstimates => "revenue_estimates",
            Self::EpsEstimates => "eps_estimates",
            Self::EtfProfile => "etf_profile",
            Self::EtfHoldings => "etf_holdings",
            Self::EtfSectorExposure => "etf_sector_exposure",
            Self::EtfCountryExposure => "etf_country_exposure",
            Self::IndexConstituents => "index_constituents",
        }
    }

    /// Path relative to the provider base URL.
    pub const fn path(self) -> &'static str {
        match self {
            Self::BasicFinancials => "stock/metric",
            Self::RecommendationTrends => "stock/recommendation",
            Self::PriceTarget => "stock/price-target",
            Self::CompanyEarnings => "stock/earnings",
            Self::EarningsCalendar => "calendar/earnings",
            Self::StockSplits => "stock/split",
            Self::BasicDividends => "stock/dividend2",
            Self::UpgradeDowngrade => "stock/upgrade-downgrade",
            Self::RevenueEstimates => "stock/revenue-estimate",
            Self::EpsEstimates => "stock/eps-estimate",
            Self::EtfProfile => "etf/profile",
            Self::EtfHoldings => "etf/holdings",
            Self::EtfSectorExposure => "etf/sector",
            Self::EtfCountryExposure => "etf/country",
            Self::IndexConstituents => "index/constituents",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fetch error classification. The renderer picks a placeholder per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    Unauthorized,
    RateLimited,
    NotFound,
    Unavailable,
    Decode,
    InvalidRequest,
}

/// Structured error returned by every provider fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
}

impl FetchError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Unauthorized, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::RateLimited, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::NotFound, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Unavailable, message)
    }

    pub fn decode(endpoint: Endpoint, source: impl Display) -> Self {
        Self::new(
            FetchErrorKind::Decode,
            format!("unexpected {endpoint} reply: {source}"),
        )
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::InvalidRequest, message)
    }

    fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Maps a non-success HTTP status to an error kind.
    pub fn from_status(endpoint: Endpoint, status: u16) -> Self {
        let message = format!("finnhub {endpoint} returned status {status}");
        match status {
            401 | 403 => Self::unauthorized(message),
            404 => Self::not_found(message),
            429 => Self::rate_limited(message),
            _ => Self::unavailable(message),
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::Unauthorized => "fetch.unauthorized",
            FetchErrorKind::RateLimited => "fetch.rate_limited",
            FetchErrorKind::NotFound => "fetch.not_found",
            FetchErrorKind::Unavailable => "fetch.unavailable",
            FetchErrorKind::Decode => "fetch.decode",
            FetchErrorKind::InvalidRequest => "fetch.invalid_request",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchError {}

/// One provider call: an endpoint plus its query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub endpoint: Endpoint,
    pub query: Vec<(String, String)>,
}

impl ProviderRequest {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            query: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Percent-encoded query string, without the leading `?`.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}
