//! # Domain Models
//!
//! Typed views of the provider replies plus the symbol types used by the
//! classifier.
//!
//! Every reply field is optional: the provider omits or nulls fields freely
//! and the renderer decides what a missing value looks like. Collections
//! decode `null` as empty.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Normalized ticker, caret-prefixed for indices |
//! | [`SymbolKind`] | Stock / ETF / index classification |
//! | [`BasicFinancials`] | Metric snapshot |
//! | [`RecommendationTrend`] | Analyst buy/hold/sell counts |
//! | [`PriceTarget`] | Price-target consensus |
//! | [`EarningsSurprise`] | Reported vs. estimated EPS |
//! | [`EtfProfile`] | Fund profile |
//! | [`IndexConstituents`] | Index members and weights |

mod dates;
mod models;
mod symbol;

pub use dates::{format_date, format_datetime, today_utc, unix_to_datetime, DateWindow};
pub use models::{
    BasicFinancials, CountryExposure, CountryWeight, Dividend, Dividends, EarningsCalendar,
    EarningsEvent, EarningsSurprise, EpsEstimate, EpsEstimates, EstimateFrequency, EtfHolding,
    EtfHoldings, EtfProfile, EtfProfileDetails, GradeChange, IndexConstituent, IndexConstituents,
    PriceTarget, RecommendationTrend, RevenueEstimate, RevenueEstimates, SectorExposure,
    SectorWeight, Split,
};
pub use symbol::{Symbol, SymbolKind};
