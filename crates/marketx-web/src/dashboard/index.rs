use marketx_core::{IndexConstituents, MarketData, Symbol};

use super::table::{desc_by_f64, text, Fact, Table};
use super::{section, Block, Section};
use crate::view::Tab;

pub(super) async fn sections(market: &MarketData, symbol: &Symbol, tab: Option<Tab>) -> Vec<Section> {
    let shown = |candidate: Tab| tab.map_or(true, |tab| tab == candidate);
    // Both tabs read the same (cached) reply.
    let constituents = market.index_constituents(symbol).await;

    let mut sections = Vec::new();
    if shown(Tab::Constituents) {
        sections.push(section("Constituents", constituents.clone(), breakdown));
    }
    if shown(Tab::Details) {
        sections.push(section("Details", constituents, details));
    }
    sections
}

/// Members with weights, heaviest first.
fn breakdown(index: IndexConstituents) -> Option<Vec<Block>> {
    let mut rows = index.constituents_breakdown;
    if rows.is_empty() {
        return None;
    }
    rows.sort_by(|a, b| desc_by_f64(a.weight, b.weight));

    let mut table = Table::new(["Symbol", "Name", "Weight", "ISIN", "CUSIP"]);
    for row in rows {
        table.push_row(vec![
            text(row.symbol.as_deref()),
            text(row.name.as_deref()),
            row.weight
                .map(|weight| format!("{weight:.4}%"))
                .unwrap_or_default(),
            text(row.isin.as_deref()),
            text(row.cusip.as_deref()),
        ]);
    }
    Some(vec![Block::Table { table }])
}

fn details(index: IndexConstituents) -> Option<Vec<Block>> {
    if index.constituents.is_empty() && index.constituents_breakdown.is_empty() {
        return None;
    }

    let mut blocks = vec![Block::Facts {
        facts: vec![Fact::new(
            "Total Constituents",
            index.constituents.len().to_string(),
        )],
    }];
    if index.constituents_breakdown.is_empty() {
        blocks.push(Block::Paragraph {
            text: index.constituents.join(", "),
        });
    }
    Some(blocks)
}
