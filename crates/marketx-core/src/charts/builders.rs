use crate::data_source::FetchError;
use crate::domain::{EstimateFrequency, RecommendationTrend, Symbol};
use crate::fetch::MarketData;
use crate::format::usd;

use super::{BarMode, Chart, ChartSpec, Margin, Marker, Trace};

/// Quarters of earnings history plotted by [`eps_surprise_chart`].
pub const EPS_CHART_EARNINGS_LIMIT: usize = 12;
/// Holdings plotted by [`etf_holdings_chart`].
pub const TOP_HOLDINGS: usize = 15;

type Count = fn(&RecommendationTrend) -> Option<u32>;

fn label(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}

pub async fn recommendation_chart(market: &MarketData, symbol: &Symbol) -> Result<Chart, FetchError> {
    let mut trends = market.recommendation_trends(symbol).await?;
    if trends.is_empty() {
        return Ok(Chart::NoData);
    }
    trends.sort_by(|a, b| a.period.cmp(&b.period));

    let periods: Vec<String> = trends.iter().map(|row| label(row.period.as_deref())).collect();
    let mut spec = ChartSpec::new(format!("{symbol} Recommendations"))
        .with_bar_mode(BarMode::Stack)
        .with_horizontal_legend();

    let series: [(&str, &'static str, Count); 5] = [
        ("strongBuy", "#22c55e", |row| row.strong_buy),
        ("buy", "#86efac", |row| row.buy),
        ("hold", "#fbbf24", |row| row.hold),
        ("sell", "#f87171", |row| row.sell),
        ("strongSell", "#dc2626", |row| row.strong_sell),
    ];
    for (name, color, count) in series {
        let values: Vec<Option<f64>> = trends.iter().map(|row| count(row).map(f64::from)).collect();
        if values.iter().all(Option::is_none) {
            continue;
        }
        spec = spec.with_trace(Trace::Bar {
            name: Some(name.to_owned()),
            x: periods.clone(),
            y: values,
            text: None,
            marker: Marker::Solid(color),
        });
    }

    if spec.traces.is_empty() {
        return Ok(Chart::NoData);
    }
    Ok(Chart::Ready(spec))
}

/// Estimated vs. reported EPS over the last twelve quarters.
pub async fn eps_surprise_chart(market: &MarketData, symbol: &Symbol) -> Result<Chart, FetchError> {
    let mut earnings = market
        .company_earnings(symbol, EPS_CHART_EARNINGS_LIMIT)
        .await?;
    if earnings.iter().all(|row| row.actual.is_none()) {
        return Ok(Chart::NoData);
    }
    earnings.sort_by(|a, b| a.period.cmp(&b.period));

    let periods: Vec<String> = earnings.iter().map(|row| label(row.period.as_deref())).collect();
    let spec = ChartSpec::new(format!("{symbol} EPS: Actual vs Est"))
        .with_bar_mode(BarMode::Group)
        .with_horizontal_legend()
        .with_trace(Trace::Bar {
            name: Some(String::from("Estimate")),
            x: periods.clone(),
            y: earnings.iter().map(|row| row.estimate).collect(),
            text: None,
            marker: Marker::Solid("#64748b"),
        })
        .with_trace(Trace::Bar {
            name: Some(String::from("Actual")),
            x: periods,
            y: earnings.iter().map(|row| row.actual).collect(),
            text: None,
            marker: Marker::Solid("#3b82f6"),
        });

    Ok(Chart::Ready(spec))
}

/// Quarterly average revenue estimate in billions of dollars.
pub async fn revenue_estimates_chart(
    market: &MarketData,
    symbol: &Symbol,
) -> Result<Chart, FetchError> {
    let mut estimates = market
        .revenue_estimates(symbol, EstimateFrequency::Quarterly)
        .await?
        .data;
    if estimates.iter().all(|row| row.revenue_avg.is_none()) {
        return Ok(Chart::NoData);
    }
    estimates.sort_by(|a, b| a.period.cmp(&b.period));

    let spec = ChartSpec::new(format!("{symbol} Revenue Est ($B)"))
        .with_y_axis_title("$B")
        .with_trace(Trace::Bar {
            name: None,
            x: estimates.iter().map(|row| label(row.period.as_deref())).collect(),
            y: estimates
                .iter()
                .map(|row| row.revenue_avg.map(|value| value / 1e9))
                .collect(),
            text: None,
            marker: Marker::Solid("#8b5cf6"),
        });

    Ok(Chart::Ready(spec))
}

pub async fn price_target_chart(market: &MarketData, symbol: &Symbol) -> Result<Chart, FetchError> {
    let target = market.price_target(symbol).await?;
    if target.target_mean.is_none() {
        return Ok(Chart::NoData);
    }

    let points: Vec<(&str, f64, &'static str)> = [
        ("Low", target.target_low, "#f87171"),
        ("Mean", target.target_mean, "#3b82f6"),
        ("Median", target.target_median, "#a78bfa"),
        ("High", target.target_high, "#22c55e"),
    ]
    .into_iter()
    .filter_map(|(name, value, color)| value.map(|value| (name, value, color)))
    .collect();

    let analysts = target
        .number_analysts
        .map(|count| count.to_string())
        .unwrap_or_else(|| String::from("?"));

    let spec = ChartSpec::new(format!("{symbol} Price Targets ({analysts} analysts)")).with_trace(
        Trace::Bar {
            name: None,
            x: points.iter().map(|(name, _, _)| (*name).to_owned()).collect(),
            y: points.iter().map(|(_, value, _)| Some(*value)).collect(),
            text: Some(points.iter().map(|(_, value, _)| usd(*value, 1)).collect()),
            marker: Marker::PerBar(points.iter().map(|(_, _, color)| *color).collect()),
        },
    );

    Ok(Chart::Ready(spec))
}

pub async fn etf_sector_chart(market: &MarketData, symbol: &Symbol) -> Result<Chart, FetchError> {
    let mut sectors: Vec<(String, f64)> = market
        .etf_sector_exposure(symbol)
        .await?
        .sector_exposure
        .into_iter()
        .filter_map(|row| {
            row.exposure
                .map(|exposure| (row.industry.unwrap_or_else(|| String::from("Other")), exposure))
        })
        .collect();
    if sectors.is_empty() {
        return Ok(Chart::NoData);
    }
    sectors.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (labels, values): (Vec<String>, Vec<f64>) = sectors.into_iter().unzip();
    let spec = ChartSpec::new(format!("{symbol} Sector Exposure"))
        .with_margin(Margin::PIE)
        .with_trace(Trace::Pie {
            labels,
            values,
            hole: 0.35,
        });

    Ok(Chart::Ready(spec))
}

/// The fifteen largest holdings by portfolio weight.
pub async fn etf_holdings_chart(market: &MarketData, symbol: &Symbol) -> Result<Chart, FetchError> {
    let mut holdings: Vec<(String, f64)> = market
        .etf_holdings(symbol)
        .await?
        .holdings
        .into_iter()
        .filter_map(|row| {
            let name = row.symbol.or(row.name).unwrap_or_default();
            row.percent.map(|percent| (name, percent))
        })
        .collect();
    if holdings.is_empty() {
        return Ok(Chart::NoData);
    }
    holdings.sort_by(|a, b| b.1.total_cmp(&a.1));
    holdings.truncate(TOP_HOLDINGS);

    let spec = ChartSpec::new(format!("{symbol} Top Holdings (%)")).with_trace(Trace::Bar {
        name: None,
        x: holdings.iter().map(|(name, _)| name.clone()).collect(),
        y: holdings.iter().map(|(_, percent)| Some(*percent)).collect(),
        text: None,
        marker: Marker::Scale("Blues"),
    });

    Ok(Chart::Ready(spec))
}
