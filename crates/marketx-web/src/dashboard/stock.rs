use marketx_core::{
    format_date, format_datetime, today_utc, unix_to_datetime, BasicFinancials, Dividends,
    EarningsCalendar, EarningsSurprise, EpsEstimates, EstimateFrequency, GradeChange, MarketData,
    PriceTarget, RecommendationTrend, RevenueEstimates, Split, Symbol,
};

use super::table::{count, desc_by, dollars, metric, number, or_na, text, Fact, Table};
use super::{section, Block, Section};
use crate::view::Tab;

pub const STOCK_EARNINGS_LIMIT: usize = 40;

const KEY_METRICS: [&str; 10] = [
    "marketCapitalization",
    "revenuePerShareTTM",
    "netIncomePerShareTTM",
    "operatingMarginTTM",
    "grossMarginTTM",
    "debtEquityTTM",
    "currentRatioQuarterly",
    "quickRatioQuarterly",
    "10DayAverageTradingVolume",
    "3MonthAverageTradingVolume",
];

pub(super) async fn sections(market: &MarketData, symbol: &Symbol, tab: Option<Tab>) -> Vec<Section> {
    let mut sections = Vec::new();
    let shown = |candidate: Tab| tab.map_or(true, |tab| tab == candidate);

    if shown(Tab::Overview) {
        sections.push(section(
            "Key Financials",
            market.basic_financials(symbol).await,
            key_financials,
        ));
        sections.push(section(
            "Price Target Consensus",
            market.price_target(symbol).await,
            price_target,
        ));
    }
    if shown(Tab::Earnings) {
        sections.push(section(
            "Earnings History",
            market.company_earnings(symbol, STOCK_EARNINGS_LIMIT).await,
            earnings_history,
        ));
        sections.push(section(
            "Upcoming Earnings",
            market.earnings_calendar(symbol).await,
            upcoming_earnings,
        ));
    }
    if shown(Tab::Estimates) {
        sections.push(section(
            "Revenue Estimates (Quarterly)",
            market
                .revenue_estimates(symbol, EstimateFrequency::Quarterly)
                .await,
            revenue_estimates,
        ));
        sections.push(section(
            "EPS Estimates (Quarterly)",
            market
                .eps_estimates(symbol, EstimateFrequency::Quarterly)
                .await,
            eps_estimates,
        ));
    }
    if shown(Tab::Analysts) {
        sections.push(section(
            "Analyst Recommendations",
            market.recommendation_trends(symbol).await,
            recommendations,
        ));
        sections.push(section(
            "Upgrades & Downgrades",
            market.upgrade_downgrade(symbol).await,
            upgrades_downgrades,
        ));
    }
    if shown(Tab::Dividends) {
        sections.push(section(
            "Dividends",
            market.basic_dividends(symbol).await,
            dividends,
        ));
    }
    if shown(Tab::Splits) {
        sections.push(section("Stock Splits", market.stock_splits(symbol).await, splits));
    }

    sections
}

fn key_financials(financials: BasicFinancials) -> Option<Vec<Block>> {
    if financials.metric.is_empty() {
        return None;
    }
    let value = |name: &str| or_na(metric(financials.metric(name)));
    let money = |name: &str| {
        or_na(metric(financials.metric(name)).map(|value| format!("${value}")))
    };
    let percent = |name: &str| {
        or_na(metric(financials.metric(name)).map(|value| format!("{value}%")))
    };

    let headline = vec![
        Fact::new("52-Wk High", money("52WeekHigh")),
        Fact::new("52-Wk Low", money("52WeekLow")),
        Fact::new("Beta", value("beta")),
        Fact::new("P/E (TTM)", value("peTTM")),
    ];
    let ratios = vec![
        Fact::new("P/B (Annual)", value("pbAnnual")),
        Fact::new("Div Yield TTM", percent("currentDividendYieldTTM")),
        Fact::new("ROE TTM", percent("roeTTM")),
        Fact::new("EPS TTM", money("epsTTM")),
    ];

    let mut metrics = Table::new(["Metric", "Value"]);
    for name in KEY_METRICS {
        metrics.push_row(vec![name.to_owned(), value(name)]);
    }

    Some(vec![
        Block::Facts { facts: headline },
        Block::Facts { facts: ratios },
        Block::Table { table: metrics },
    ])
}

fn price_target(target: PriceTarget) -> Option<Vec<Block>> {
    target.target_mean?;
    let money = |value: Option<f64>| or_na(value.map(|value| marketx_core::format::usd(value, 2)));

    let mut facts = vec![
        Fact::new("Low", money(target.target_low)),
        Fact::new("Mean", money(target.target_mean)),
        Fact::new("Median", money(target.target_median)),
        Fact::new("High", money(target.target_high)),
    ];
    if let Some(analysts) = target.number_analysts {
        facts.push(Fact::new("Analysts", analysts.to_string()));
    }
    if let Some(updated) = target.last_updated {
        facts.push(Fact::new("Updated", updated));
    }

    Some(vec![Block::Facts { facts }])
}

pub(super) fn earnings_history(mut earnings: Vec<EarningsSurprise>) -> Option<Vec<Block>> {
    if earnings.is_empty() {
        return None;
    }
    earnings.sort_by(|a, b| desc_by(&a.period, &b.period));

    let mut table = Table::new([
        "Period",
        "Quarter",
        "Year",
        "Actual",
        "Estimate",
        "Surprise",
        "Surprise %",
    ]);
    for row in earnings {
        table.push_row(vec![
            text(row.period.as_deref()),
            count(row.quarter),
            row.year.map(|year| year.to_string()).unwrap_or_default(),
            number(row.actual, 2),
            number(row.estimate, 2),
            number(row.surprise, 4),
            number(row.surprise_percent, 2),
        ]);
    }
    Some(vec![Block::Table { table }])
}

/// Calendar entries dated today or later, soonest first.
fn upcoming_earnings(calendar: EarningsCalendar) -> Option<Vec<Block>> {
    let today = format_date(today_utc());
    let mut events: Vec<_> = calendar
        .earnings_calendar
        .into_iter()
        .filter(|event| event.date.as_deref().is_some_and(|date| date >= today.as_str()))
        .collect();
    if events.is_empty() {
        return None;
    }
    events.sort_by(|a, b| a.date.cmp(&b.date));

    let mut table = Table::new([
        "Date",
        "Hour",
        "Quarter",
        "Year",
        "EPS Estimate",
        "EPS Actual",
        "Revenue Estimate",
        "Revenue Actual",
    ]);
    for event in events {
        table.push_row(vec![
            text(event.date.as_deref()),
            text(event.hour.as_deref()),
            count(event.quarter),
            event.year.map(|year| year.to_string()).unwrap_or_default(),
            number(event.eps_estimate, 2),
            number(event.eps_actual, 2),
            dollars(event.revenue_estimate, 0),
            dollars(event.revenue_actual, 0),
        ]);
    }
    Some(vec![Block::Table { table }])
}

fn revenue_estimates(estimates: RevenueEstimates) -> Option<Vec<Block>> {
    let mut rows = estimates.data;
    if rows.is_empty() {
        return None;
    }
    rows.sort_by(|a, b| desc_by(&a.period, &b.period));

    let mut table = Table::new(["Period", "Average", "High", "Low", "Analysts"]);
    for row in rows {
        table.push_row(vec![
            text(row.period.as_deref()),
            dollars(row.revenue_avg, 0),
            dollars(row.revenue_high, 0),
            dollars(row.revenue_low, 0),
            count(row.number_analysts),
        ]);
    }
    Some(vec![Block::Table { table }])
}

fn eps_estimates(estimates: EpsEstimates) -> Option<Vec<Block>> {
    let mut rows = estimates.data;
    if rows.is_empty() {
        return None;
    }
    rows.sort_by(|a, b| desc_by(&a.period, &b.period));

    let mut table = Table::new(["Period", "Average", "High", "Low", "Analysts"]);
    for row in rows {
        table.push_row(vec![
            text(row.period.as_deref()),
            number(row.eps_avg, 4),
            number(row.eps_high, 4),
            number(row.eps_low, 4),
            count(row.number_analysts),
        ]);
    }
    Some(vec![Block::Table { table }])
}

pub(super) fn recommendations(mut trends: Vec<RecommendationTrend>) -> Option<Vec<Block>> {
    if trends.is_empty() {
        return None;
    }
    trends.sort_by(|a, b| desc_by(&a.period, &b.period));

    let mut table = Table::new(["Period", "Strong Buy", "Buy", "Hold", "Sell", "Strong Sell"]);
    for row in trends {
        table.push_row(vec![
            text(row.period.as_deref()),
            count(row.strong_buy),
            count(row.buy),
            count(row.hold),
            count(row.sell),
            count(row.strong_sell),
        ]);
    }
    Some(vec![Block::Table { table }])
}

/// Rating changes, newest first by their UTC grade time.
fn upgrades_downgrades(changes: Vec<GradeChange>) -> Option<Vec<Block>> {
    if changes.is_empty() {
        return None;
    }
    let mut rows: Vec<_> = changes
        .into_iter()
        .map(|change| (change.grade_time.and_then(unix_to_datetime), change))
        .collect();
    rows.sort_by(|(a, _), (b, _)| desc_by(a, b));

    let mut table = Table::new(["Date (UTC)", "Company", "From", "To", "Action"]);
    for (graded_at, change) in rows {
        table.push_row(vec![
            graded_at.map(format_datetime).unwrap_or_default(),
            text(change.company.as_deref()),
            text(change.from_grade.as_deref()),
            text(change.to_grade.as_deref()),
            text(change.action.as_deref()),
        ]);
    }
    Some(vec![Block::Table { table }])
}

fn dividends(dividends: Dividends) -> Option<Vec<Block>> {
    let mut rows = dividends.data;
    if rows.is_empty() {
        return None;
    }
    rows.sort_by(|a, b| desc_by(&a.ex_date, &b.ex_date));

    let mut table = Table::new(["Ex-Date", "Amount"]);
    for row in rows {
        table.push_row(vec![text(row.ex_date.as_deref()), dollars(row.amount, 4)]);
    }
    Some(vec![Block::Table { table }])
}

fn splits(mut splits: Vec<Split>) -> Option<Vec<Block>> {
    if splits.is_empty() {
        return None;
    }
    splits.sort_by(|a, b| desc_by(&a.date, &b.date));

    let mut table = Table::new(["Date", "From Factor", "To Factor"]);
    for row in splits {
        table.push_row(vec![
            text(row.date.as_deref()),
            number(row.from_factor, 0),
            number(row.to_factor, 0),
        ]);
    }
    Some(vec![Block::Table { table }])
}
