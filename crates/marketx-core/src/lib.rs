//! # MarketX Core
//!
//! Provider access, caching and chart building for the Market Explorer
//! dashboard.
//!
//! ## Overview
//!
//! - **Transport**: [`HttpClient`] abstracts HTTP so the provider client can
//!   run against reqwest in production and [`StubHttpClient`] in tests.
//! - **Provider**: [`FinnhubClient`] owns the base URL and API key; every
//!   reply funnels through [`FinnhubClient::get`] and failures are typed as
//!   [`FetchError`].
//! - **Cached fetchers**: [`MarketData`] exposes one method per endpoint and
//!   memoizes replies in a [`ResponseCache`] for five minutes.
//! - **Classification**: [`classify`] decides stock / ETF / index.
//! - **Charts**: builders in [`charts`] return [`Chart::Ready`] or
//!   [`Chart::NoData`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marketx_core::{classify, FinnhubClient, MarketData, ResponseCache, Symbol};
//!
//! let market = MarketData::new(FinnhubClient::new(api_key), ResponseCache::with_defaults());
//! let symbol = Symbol::parse("aapl")?;
//! let kind = classify(&market, &symbol).await;
//! let target = market.price_target(&symbol).await?;
//! ```

pub mod adapters;
pub mod cache;
pub mod charts;
pub mod classify;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod format;
pub mod http_client;

pub use adapters::{FinnhubClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
pub use cache::{CacheKey, CacheMode, ResponseCache, DEFAULT_CAPACITY, DEFAULT_TTL};
pub use charts::{Chart, ChartSpec};
pub use classify::classify;
pub use data_source::{Endpoint, FetchError, FetchErrorKind, ProviderRequest};
pub use domain::*;
pub use error::ValidationError;
pub use fetch::MarketData;
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
    StubHttpClient,
};
