use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Company metric snapshot (`stock/metric`, `metric=all`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicFinancials {
    #[serde(default)]
    pub symbol: Option<String>,
    /// Metric name to value; values are mostly numbers but the provider
    /// also returns strings and nulls.
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric: BTreeMap<String, Value>,
}

impl BasicFinancials {
    /// Metric value, skipping explicit nulls.
    pub fn metric(&self, name: &str) -> Option<&Value> {
        self.metric.get(name).filter(|value| !value.is_null())
    }
}

/// Analyst recommendation counts for one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationTrend {
    pub symbol: Option<String>,
    pub period: Option<String>,
    pub strong_buy: Option<u32>,
    pub buy: Option<u32>,
    pub hold: Option<u32>,
    pub sell: Option<u32>,
    pub strong_sell: Option<u32>,
}

/// Analyst price-target consensus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTarget {
    pub symbol: Option<String>,
    pub target_high: Option<f64>,
    pub target_low: Option<f64>,
    pub target_mean: Option<f64>,
    pub target_median: Option<f64>,
    pub number_analysts: Option<u32>,
    pub last_updated: Option<String>,
}

/// Reported vs. estimated EPS for one quarter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsSurprise {
    pub symbol: Option<String>,
    pub period: Option<String>,
    pub quarter: Option<u32>,
    pub year: Option<i32>,
    pub actual: Option<f64>,
    pub estimate: Option<f64>,
    pub surprise: Option<f64>,
    pub surprise_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsCalendar {
    #[serde(default, deserialize_with = "null_as_default")]
    pub earnings_calendar: Vec<EarningsEvent>,
}

/// Scheduled or past earnings release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsEvent {
    pub symbol: Option<String>,
    pub date: Option<String>,
    /// `bmo`, `amc` or `dmh`.
    pub hour: Option<String>,
    pub quarter: Option<u32>,
    pub year: Option<i32>,
    pub eps_actual: Option<f64>,
    pub eps_estimate: Option<f64>,
    pub revenue_actual: Option<f64>,
    pub revenue_estimate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Split {
    pub symbol: Option<String>,
    pub date: Option<String>,
    pub from_factor: Option<f64>,
    pub to_factor: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dividends {
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Dividend>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dividend {
    pub ex_date: Option<String>,
    pub amount: Option<f64>,
}

/// Broker rating change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeChange {
    pub symbol: Option<String>,
    /// Unix seconds.
    pub grade_time: Option<i64>,
    pub company: Option<String>,
    pub from_grade: Option<String>,
    pub to_grade: Option<String>,
    pub action: Option<String>,
}

/// Estimate period granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateFrequency {
    #[default]
    Quarterly,
    Annual,
}

impl EstimateFrequency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quarterly => "quarterly",
            Self::Annual => "annual",
        }
    }
}

impl Display for EstimateFrequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueEstimates {
    pub symbol: Option<String>,
    pub freq: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<RevenueEstimate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueEstimate {
    pub period: Option<String>,
    pub revenue_avg: Option<f64>,
    pub revenue_high: Option<f64>,
    pub revenue_low: Option<f64>,
    pub number_analysts: Option<u32>,
    pub year: Option<i32>,
    pub quarter: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpsEstimates {
    pub symbol: Option<String>,
    pub freq: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<EpsEstimate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpsEstimate {
    pub period: Option<String>,
    pub eps_avg: Option<f64>,
    pub eps_high: Option<f64>,
    pub eps_low: Option<f64>,
    pub number_analysts: Option<u32>,
    pub year: Option<i32>,
    pub quarter: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

/// The provider returns the profile either as an object or as a list of
/// objects; a list is reduced to its first element.
fn profile_one_or_first<'de, D>(deserializer: D) -> Result<Option<EtfProfileDetails>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<OneOrMany<EtfProfileDetails>>::deserialize(deserializer)? {
            Some(OneOrMany::One(profile)) => Some(profile),
            Some(OneOrMany::Many(profiles)) => profiles.into_iter().next(),
            None => None,
        },
    )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtfProfile {
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "profile_one_or_first")]
    pub profile: Option<EtfProfileDetails>,
}

impl EtfProfile {
    /// Fund name when present and non-empty. Whitespace counts as a name.
    pub fn name(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .and_then(|profile| profile.name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtfProfileDetails {
    pub name: Option<String>,
    pub asset_class: Option<String>,
    pub investment_segment: Option<String>,
    pub expense_ratio: Option<f64>,
    pub aum: Option<f64>,
    pub nav: Option<f64>,
    pub nav_currency: Option<String>,
    pub inception_date: Option<String>,
    pub domicile: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtfHoldings {
    pub symbol: Option<String>,
    pub at_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub holdings: Vec<EtfHolding>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtfHolding {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub isin: Option<String>,
    pub cusip: Option<String>,
    pub share: Option<f64>,
    pub percent: Option<f64>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorExposure {
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sector_exposure: Vec<SectorWeight>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorWeight {
    pub industry: Option<String>,
    pub exposure: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryExposure {
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country_exposure: Vec<CountryWeight>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryWeight {
    pub country: Option<String>,
    pub exposure: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexConstituents {
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub constituents: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub constituents_breakdown: Vec<IndexConstituent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexConstituent {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub isin: Option<String>,
    pub cusip: Option<String>,
    #[serde(rename = "shareClassFIGI")]
    pub share_class_figi: Option<String>,
    pub weight: Option<f64>,
}
