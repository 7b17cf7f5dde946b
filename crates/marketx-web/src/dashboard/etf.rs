use marketx_core::format::usd;
use marketx_core::{CountryExposure, EtfHoldings, EtfProfile, MarketData, SectorExposure, Symbol};

use super::stock::{earnings_history, recommendations};
use super::table::{desc_by_f64, dollars, number, or_na, text, Fact, Table};
use super::{section, Block, Section};
use crate::view::Tab;

pub const ETF_EARNINGS_LIMIT: usize = 20;

pub(super) async fn sections(market: &MarketData, symbol: &Symbol, tab: Option<Tab>) -> Vec<Section> {
    let mut sections = Vec::new();
    let shown = |candidate: Tab| tab.map_or(true, |tab| tab == candidate);

    if shown(Tab::Profile) {
        sections.push(section("Profile", market.etf_profile(symbol).await, profile));
    }
    if shown(Tab::Holdings) {
        sections.push(section("Holdings", market.etf_holdings(symbol).await, holdings));
    }
    if shown(Tab::Exposure) {
        sections.push(section(
            "Sector Exposure",
            market.etf_sector_exposure(symbol).await,
            sector_exposure,
        ));
        sections.push(section(
            "Country Exposure",
            market.etf_country_exposure(symbol).await,
            country_exposure,
        ));
    }
    if shown(Tab::Earnings) {
        sections.push(section(
            "Earnings",
            market.company_earnings(symbol, ETF_EARNINGS_LIMIT).await,
            earnings_history,
        ));
    }
    if shown(Tab::Analysts) {
        sections.push(section(
            "Analyst Recommendations",
            market.recommendation_trends(symbol).await,
            recommendations,
        ));
    }

    sections
}

fn profile(profile: EtfProfile) -> Option<Vec<Block>> {
    let details = profile.profile?;

    let facts = vec![
        Fact::new("Name", or_na(details.name)),
        Fact::new("Asset Class", or_na(details.asset_class)),
        Fact::new(
            "Expense Ratio",
            or_na(details.expense_ratio.map(|ratio| format!("{ratio}%"))),
        ),
        Fact::new("AUM", or_na(details.aum.map(|aum| usd(aum, 0)))),
        Fact::new("NAV", or_na(details.nav.map(|nav| usd(nav, 2)))),
        Fact::new("Inception", or_na(details.inception_date)),
    ];

    let mut blocks = vec![Block::Facts { facts }];
    if let Some(description) = details.description.filter(|text| !text.trim().is_empty()) {
        blocks.push(Block::Paragraph { text: description });
    }
    Some(blocks)
}

fn holdings(holdings: EtfHoldings) -> Option<Vec<Block>> {
    let mut rows = holdings.holdings;
    if rows.is_empty() {
        return None;
    }
    rows.sort_by(|a, b| desc_by_f64(a.percent, b.percent));

    let mut table = Table::new(["Symbol", "Name", "Percent", "Shares", "Value", "ISIN", "CUSIP"]);
    for row in rows {
        table.push_row(vec![
            text(row.symbol.as_deref()),
            text(row.name.as_deref()),
            number(row.percent, 2),
            number(row.share, 0),
            dollars(row.value, 0),
            text(row.isin.as_deref()),
            text(row.cusip.as_deref()),
        ]);
    }

    let mut blocks = Vec::with_capacity(2);
    if let Some(at_date) = holdings.at_date {
        blocks.push(Block::Facts {
            facts: vec![Fact::new("As of", at_date)],
        });
    }
    blocks.push(Block::Table { table });
    Some(blocks)
}

fn sector_exposure(exposure: SectorExposure) -> Option<Vec<Block>> {
    let mut rows = exposure.sector_exposure;
    if rows.is_empty() {
        return None;
    }
    rows.sort_by(|a, b| desc_by_f64(a.exposure, b.exposure));

    let mut table = Table::new(["Industry", "Exposure (%)"]);
    for row in rows {
        table.push_row(vec![text(row.industry.as_deref()), number(row.exposure, 2)]);
    }
    Some(vec![Block::Table { table }])
}

fn country_exposure(exposure: CountryExposure) -> Option<Vec<Block>> {
    let mut rows = exposure.country_exposure;
    if rows.is_empty() {
        return None;
    }
    rows.sort_by(|a, b| desc_by_f64(a.exposure, b.exposure));

    let mut table = Table::new(["Country", "Exposure (%)"]);
    for row in rows {
        table.push_row(vec![text(row.country.as_deref()), number(row.exposure, 2)]);
    }
    Some(vec![Block::Table { table }])
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{market, symbol};
    use super::super::NO_DATA;
    use super::*;
    use marketx_core::StubHttpClient;

    const SPY_PROFILE: &str = r#"{"symbol":"SPY","profile":[{
        "name":"SPDR S&P 500 ETF Trust",
        "assetClass":"Equity",
        "expenseRatio":0.0945,
        "aum":523456789012.4,
        "nav":512.3456,
        "inceptionDate":"1993-01-22",
        "description":"Tracks the S&P 500."
    }]}"#;

    #[tokio::test]
    async fn profile_facts_and_description() {
        let stub = StubHttpClient::new().with_json("etf/profile", SPY_PROFILE);

        let sections = sections(&market(stub), &symbol("SPY"), Some(Tab::Profile)).await;

        assert_eq!(sections.len(), 1);
        match &sections[0].blocks[..] {
            [Block::Facts { facts }, Block::Paragraph { text }] => {
                assert_eq!(facts[0], Fact::new("Name", "SPDR S&P 500 ETF Trust"));
                assert_eq!(facts[2], Fact::new("Expense Ratio", "0.0945%"));
                assert_eq!(facts[3], Fact::new("AUM", "$523,456,789,012"));
                assert_eq!(facts[4], Fact::new("NAV", "$512.35"));
                assert_eq!(text, "Tracks the S&P 500.");
            }
            other => panic!("unexpected blocks {other:?}"),
        }
    }

    #[tokio::test]
    async fn exposure_tables_sorted_descending() {
        let stub = StubHttpClient::new()
            .with_json(
                "etf/sector",
                r#"{"sectorExposure":[{"industry":"Energy","exposure":3.9},{"industry":"Technology","exposure":31.6}]}"#,
            )
            .with_json(
                "etf/country",
                r#"{"countryExposure":[{"country":"Ireland","exposure":1.2},{"country":"United States","exposure":98.8}]}"#,
            );

        let sections = sections(&market(stub), &symbol("SPY"), Some(Tab::Exposure)).await;

        let sector = sections[0].table().expect("sector table");
        assert_eq!(sector.column("Industry"), ["Technology", "Energy"]);
        let country = sections[1].table().expect("country table");
        assert_eq!(country.column("Country"), ["United States", "Ireland"]);
    }

    #[tokio::test]
    async fn holdings_sorted_by_percent() {
        let stub = StubHttpClient::new().with_json(
            "etf/holdings",
            r#"{"atDate":"2024-05-01","holdings":[
                {"symbol":"AMZN","percent":3.8},
                {"symbol":"MSFT","percent":7.1},
                {"symbol":"CASH"}
            ]}"#,
        );

        let sections = sections(&market(stub), &symbol("SPY"), Some(Tab::Holdings)).await;

        let table = sections[0].table().expect("holdings table");
        assert_eq!(table.column("Symbol"), ["MSFT", "AMZN", "CASH"]);
        assert_eq!(
            sections[0].blocks[0],
            Block::Facts {
                facts: vec![Fact::new("As of", "2024-05-01")]
            }
        );
    }

    #[tokio::test]
    async fn every_etf_section_without_tab() {
        let sections = sections(&market(StubHttpClient::new()), &symbol("SPY"), None).await;
        let titles: Vec<&str> = sections.iter().map(|section| section.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "Profile",
                "Holdings",
                "Sector Exposure",
                "Country Exposure",
                "Earnings",
                "Analyst Recommendations",
            ]
        );
        assert_eq!(sections[0].placeholder_message(), Some(NO_DATA));
    }
}
