//! # Dashboard view model
//!
//! [`build_dashboard`] runs the whole pipeline for one request: validate the
//! symbol, classify it, build the chart strip and the sections of the
//! selected tab. The result is plain data handed to the template.
//!
//! Every section renders independently. A failed fetch turns only that
//! section into a placeholder chosen by [`placeholder_for`].

mod etf;
mod index;
mod stock;
pub mod table;

use marketx_core::charts::{self, Chart};
use marketx_core::{classify, FetchError, FetchErrorKind, MarketData, Symbol, SymbolKind};
use serde::Serialize;
use tracing::{debug, warn};

use crate::view::{Layout, Tab, ViewState};

pub use table::{Fact, Table};

pub const APP_TITLE: &str = "Market Explorer";
pub const WELCOME_HINT: &str = "Type a symbol in the search bar below to begin";
pub const SEARCH_PLACEHOLDER: &str = "Search a symbol, ETF, or index  (e.g. AAPL, SPY, ^GSPC)";
pub const NO_CHARTS_CAPTION: &str = "No chart data available for this symbol.";
pub const NO_DATA: &str = "No data available.";

/// Full view model for one page render.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: &'static str,
    pub welcome_hint: &'static str,
    pub search_placeholder: &'static str,
    pub state: ViewState,
    pub symbol: Option<String>,
    pub kind: Option<SymbolKind>,
    pub kind_label: Option<&'static str>,
    pub validation_error: Option<String>,
    pub toggle: Option<Link>,
    pub tabs: Vec<TabLink>,
    pub charts: Vec<ChartView>,
    pub charts_caption: Option<&'static str>,
    pub sections: Vec<Section>,
    pub layout: Layout,
}

impl Dashboard {
    fn empty(state: &ViewState) -> Self {
        Self {
            title: APP_TITLE,
            welcome_hint: WELCOME_HINT,
            search_placeholder: SEARCH_PLACEHOLDER,
            state: state.clone(),
            symbol: None,
            kind: None,
            kind_label: None,
            validation_error: None,
            toggle: None,
            tabs: Vec::new(),
            charts: Vec::new(),
            charts_caption: None,
            sections: Vec::new(),
            layout: Layout::for_state(state, 0),
        }
    }

    /// Nothing searched yet.
    pub fn is_welcome(&self) -> bool {
        self.symbol.is_none() && self.validation_error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabLink {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// One chart of the strip; `figure` is Plotly JSON safe to embed in a
/// `<script>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartView {
    pub id: String,
    pub title: String,
    pub figure: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(title: impl Into<String>, blocks: Vec<Block>) -> Self {
        let title = title.into();
        Self {
            id: slugify(&title),
            title,
            blocks,
        }
    }

    /// Section whose body is a single placeholder line.
    pub fn placeholder(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            title,
            vec![Block::Placeholder {
                message: message.into(),
            }],
        )
    }

    /// Placeholder text, if the section has no content.
    pub fn placeholder_message(&self) -> Option<&str> {
        match self.blocks.as_slice() {
            [Block::Placeholder { message }] => Some(message),
            _ => None,
        }
    }

    pub fn table(&self) -> Option<&Table> {
        self.blocks.iter().find_map(|block| match block {
            Block::Table { table } => Some(table),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Facts { facts: Vec<Fact> },
    Table { table: Table },
    Paragraph { text: String },
    Placeholder { message: String },
}

/// Text shown in place of a section whose fetch failed.
pub fn placeholder_for(section: &str, error: &FetchError) -> String {
    match error.kind() {
        FetchErrorKind::Unauthorized => String::from("Not available with the configured API key."),
        FetchErrorKind::RateLimited => {
            String::from("Provider rate limit reached. Try again shortly.")
        }
        FetchErrorKind::NotFound => String::from(NO_DATA),
        FetchErrorKind::Unavailable | FetchErrorKind::Decode | FetchErrorKind::InvalidRequest => {
            format!("Could not load {section}: {}", error.message())
        }
    }
}

/// Turns a fetch outcome into a section. `render` returns `None` when the
/// reply holds nothing to show.
pub(crate) fn section<T>(
    title: &str,
    result: Result<T, FetchError>,
    render: impl FnOnce(T) -> Option<Vec<Block>>,
) -> Section {
    match result {
        Ok(data) => match render(data) {
            Some(blocks) if !blocks.is_empty() => Section::new(title, blocks),
            _ => Section::placeholder(title, NO_DATA),
        },
        Err(error) => {
            warn!(section = title, error = %error, "section fetch failed");
            Section::placeholder(title, placeholder_for(&title.to_ascii_lowercase(), &error))
        }
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_owned()
}

/// Runs the render pipeline for `state`.
pub async fn build_dashboard(market: &MarketData, state: &ViewState) -> Dashboard {
    let mut dashboard = Dashboard::empty(state);

    let Some(raw) = state.symbol.as_deref() else {
        return dashboard;
    };

    let symbol = match Symbol::parse(raw) {
        Ok(symbol) => symbol,
        Err(error) => {
            debug!(input = raw, error = %error, "rejected symbol");
            dashboard.validation_error = Some(format!("\"{raw}\" is not a valid symbol: {error}"));
            return dashboard;
        }
    };

    let kind = classify(market, &symbol).await;
    let available = Tab::for_kind(kind);
    let active = state.tab.filter(|tab| available.contains(tab));

    dashboard.symbol = Some(symbol.to_string());
    dashboard.kind = Some(kind);
    dashboard.kind_label = Some(kind.label());
    dashboard.toggle = Some(Link {
        label: String::from(if state.show_charts {
            "Hide Charts"
        } else {
            "Show Charts"
        }),
        href: state.toggled_charts().href(),
    });
    dashboard.tabs = tab_links(state, available, active);

    if state.show_charts {
        dashboard.charts = chart_strip(market, &symbol, kind).await;
        if dashboard.charts.is_empty() {
            dashboard.charts_caption = Some(NO_CHARTS_CAPTION);
        }
    }

    dashboard.sections = match kind {
        SymbolKind::Stock => stock::sections(market, &symbol, active).await,
        SymbolKind::Etf => etf::sections(market, &symbol, active).await,
        SymbolKind::Index => index::sections(market, &symbol, active).await,
    };
    dashboard.layout = Layout::for_state(state, dashboard.charts.len());

    dashboard
}

fn tab_links(state: &ViewState, available: &[Tab], active: Option<Tab>) -> Vec<TabLink> {
    let all = TabLink {
        label: "All",
        href: state.with_tab(None).href(),
        active: active.is_none(),
    };
    std::iter::once(all)
        .chain(available.iter().map(|tab| TabLink {
            label: tab.label(),
            href: state.with_tab(Some(*tab)).href(),
            active: active == Some(*tab),
        }))
        .collect()
}

/// Charts for the strip, in display order. Builders without data or with a
/// failed fetch are skipped.
async fn chart_strip(market: &MarketData, symbol: &Symbol, kind: SymbolKind) -> Vec<ChartView> {
    if kind == SymbolKind::Index {
        return Vec::new();
    }

    let mut outcomes = vec![
        ("recommendations", charts::recommendation_chart(market, symbol).await),
        ("eps", charts::eps_surprise_chart(market, symbol).await),
        ("revenue", charts::revenue_estimates_chart(market, symbol).await),
        ("price-target", charts::price_target_chart(market, symbol).await),
    ];
    if kind == SymbolKind::Etf {
        outcomes.push(("sectors", charts::etf_sector_chart(market, symbol).await));
        outcomes.push(("holdings", charts::etf_holdings_chart(market, symbol).await));
    }

    outcomes
        .into_iter()
        .filter_map(|(name, outcome)| match outcome {
            Ok(Chart::Ready(spec)) => Some(ChartView {
                id: format!("chart-{name}"),
                figure: embeddable_json(&spec.to_plotly()),
                title: spec.title,
            }),
            Ok(Chart::NoData) => None,
            Err(error) => {
                warn!(chart = name, symbol = %symbol, error = %error, "chart skipped");
                None
            }
        })
        .collect()
}

/// JSON that cannot close the surrounding `<script>` element.
fn embeddable_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use marketx_core::{FinnhubClient, MarketData, ResponseCache, StubHttpClient, Symbol};

    pub fn market(stub: StubHttpClient) -> MarketData {
        MarketData::new(
            FinnhubClient::with_http_client(Arc::new(stub), "test-key"),
            ResponseCache::with_defaults(),
        )
    }

    pub fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("valid symbol")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::test_support::market;
    use super::*;
    use crate::view::ViewQuery;
    use marketx_core::{FinnhubClient, ResponseCache, StubHttpClient};

    fn state(symbol: Option<&str>, charts: Option<&str>, tab: Option<&str>) -> ViewState {
        ViewState::from_query(&ViewQuery {
            symbol: symbol.map(str::to_owned),
            charts: charts.map(str::to_owned),
            tab: tab.map(str::to_owned),
        })
    }

    #[test]
    fn placeholder_per_error_kind() {
        assert_eq!(
            placeholder_for("price target", &FetchError::unauthorized("403")),
            "Not available with the configured API key."
        );
        assert_eq!(
            placeholder_for("price target", &FetchError::rate_limited("429")),
            "Provider rate limit reached. Try again shortly."
        );
        assert_eq!(
            placeholder_for("price target", &FetchError::not_found("404")),
            NO_DATA
        );
        assert_eq!(
            placeholder_for("price target", &FetchError::unavailable("connection reset")),
            "Could not load price target: connection reset"
        );
    }

    #[test]
    fn slugs_are_url_safe() {
        assert_eq!(slugify("Upgrades & Downgrades"), "upgrades-downgrades");
        assert_eq!(slugify("EPS Estimates (Quarterly)"), "eps-estimates-quarterly");
    }

    #[test]
    fn embedded_json_cannot_close_script() {
        let value = serde_json::json!({ "title": "</script><script>alert(1)</script>" });
        assert!(!embeddable_json(&value).contains("</"));
    }

    #[tokio::test]
    async fn welcome_without_symbol() {
        let stub = Arc::new(StubHttpClient::new());
        let market = MarketData::new(
            FinnhubClient::with_http_client(stub.clone(), "test-key"),
            ResponseCache::with_defaults(),
        );

        let dashboard = build_dashboard(&market, &state(None, None, None)).await;

        assert!(dashboard.is_welcome());
        assert!(!dashboard.layout.show_scroll_buttons);
        assert!(dashboard.sections.is_empty());
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn invalid_symbol_reports_validation_error() {
        let dashboard = build_dashboard(
            &market(StubHttpClient::new()),
            &state(Some("AA PL"), None, None),
        )
        .await;

        assert!(!dashboard.is_welcome());
        assert!(dashboard
            .validation_error
            .as_deref()
            .is_some_and(|message| message.contains("AA PL")));
        assert!(dashboard.sections.is_empty());
    }

    #[tokio::test]
    async fn index_symbol_has_no_charts_and_index_tabs() {
        let stub = Arc::new(StubHttpClient::new().with_json(
            "index/constituents",
            r#"{"symbol":"^GSPC","constituents":["AAPL","MSFT"]}"#,
        ));
        let market = MarketData::new(
            FinnhubClient::with_http_client(stub.clone(), "test-key"),
            ResponseCache::with_defaults(),
        );

        let dashboard = build_dashboard(&market, &state(Some("^gspc"), None, None)).await;

        assert_eq!(dashboard.kind, Some(SymbolKind::Index));
        assert!(dashboard.charts.is_empty());
        assert_eq!(dashboard.charts_caption, Some(NO_CHARTS_CAPTION));
        assert!(!dashboard.layout.show_scroll_buttons);
        let labels: Vec<&str> = dashboard.tabs.iter().map(|tab| tab.label).collect();
        assert_eq!(labels, ["All", "Constituents", "Details"]);
        assert_eq!(stub.requests_to("etf/profile"), 0);
        assert_eq!(stub.requests_to("index/constituents"), 1);
    }

    #[tokio::test]
    async fn hidden_charts_skip_chart_fetches() {
        let stub = Arc::new(StubHttpClient::new());
        let market = MarketData::new(
            FinnhubClient::with_http_client(stub.clone(), "test-key"),
            ResponseCache::with_defaults(),
        );

        let dashboard =
            build_dashboard(&market, &state(Some("AAPL"), Some("hide"), Some("splits"))).await;

        assert!(dashboard.charts.is_empty());
        assert_eq!(dashboard.charts_caption, None);
        assert_eq!(dashboard.layout.chart_strip_height, 0);
        assert_eq!(
            dashboard.toggle.as_ref().map(|link| link.label.as_str()),
            Some("Show Charts")
        );
        assert_eq!(stub.requests_to("stock/recommendation"), 0);
        assert_eq!(stub.requests_to("stock/split"), 1);
        assert_eq!(dashboard.sections.len(), 1);
    }

    #[tokio::test]
    async fn stock_chart_strip_collects_ready_charts() {
        let stub = StubHttpClient::new()
            .with_json(
                "stock/price-target",
                r#"{"targetMean":200.0,"targetLow":150.0,"numberAnalysts":30}"#,
            )
            .with_status("stock/recommendation", 429, "")
            .with_json("stock/earnings", "[]");

        let dashboard = build_dashboard(&market(stub), &state(Some("AAPL"), None, Some("splits"))).await;

        assert_eq!(dashboard.kind, Some(SymbolKind::Stock));
        assert_eq!(dashboard.charts.len(), 1);
        assert_eq!(dashboard.charts[0].id, "chart-price-target");
        assert!(dashboard.layout.show_scroll_buttons);
        assert_eq!(dashboard.charts_caption, None);
    }

    #[tokio::test]
    async fn tab_outside_kind_shows_all_sections() {
        let stub = StubHttpClient::new().with_json(
            "index/constituents",
            r#"{"constituents":["AAPL"]}"#,
        );

        let dashboard =
            build_dashboard(&market(stub), &state(Some("^NDX"), None, Some("earnings"))).await;

        assert!(dashboard.tabs[0].active);
        assert_eq!(dashboard.sections.len(), 2);
    }

    #[tokio::test]
    async fn failed_section_does_not_hide_others() {
        let stub = StubHttpClient::new()
            .with_status("stock/metric", 403, "")
            .with_json("stock/price-target", r#"{"targetMean":200.0}"#);

        let dashboard = build_dashboard(
            &market(stub),
            &state(Some("AAPL"), Some("hide"), Some("overview")),
        )
        .await;

        assert_eq!(dashboard.sections.len(), 2);
        assert_eq!(
            dashboard.sections[0].placeholder_message(),
            Some("Not available with the configured API key.")
        );
        assert_eq!(dashboard.sections[1].placeholder_message(), None);
    }
}
