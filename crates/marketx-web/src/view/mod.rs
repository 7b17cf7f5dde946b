//! Display state carried in the query string, the tabs each symbol kind
//! offers, and the fixed-region page geometry.

use std::fmt::{Display, Formatter};

use marketx_core::SymbolKind;
use serde::{Deserialize, Serialize};

/// Header height in pixels: symbol title plus the chart toggle.
pub const HEADER_HEIGHT: u32 = 100;
/// Chart strip height in pixels while charts are visible.
pub const CHART_STRIP_HEIGHT: u32 = 300;
/// Fixed bottom search bar height in pixels.
pub const BOTTOM_BAR_HEIGHT: u32 = 70;
const MID_GAP: u32 = 8;
const SCROLL_BUTTON_SIZE: u32 = 36;

/// Raw query parameters of `GET /`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ViewQuery {
    pub symbol: Option<String>,
    pub charts: Option<String>,
    pub tab: Option<String>,
}

/// Everything needed to re-render the page. Lives only in the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    /// Trimmed, uppercased user input; not yet validated.
    pub symbol: Option<String>,
    pub show_charts: bool,
    pub tab: Option<Tab>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            symbol: None,
            show_charts: true,
            tab: None,
        }
    }
}

impl ViewState {
    /// Unknown tab slugs and `charts` values fall back to the defaults.
    pub fn from_query(query: &ViewQuery) -> Self {
        let symbol = query
            .symbol
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(str::to_ascii_uppercase);
        let show_charts = !matches!(query.charts.as_deref(), Some("hide"));
        let tab = query.tab.as_deref().and_then(Tab::from_slug);

        Self {
            symbol,
            show_charts,
            tab,
        }
    }

    pub fn toggled_charts(&self) -> Self {
        Self {
            show_charts: !self.show_charts,
            ..self.clone()
        }
    }

    pub fn with_tab(&self, tab: Option<Tab>) -> Self {
        Self {
            tab,
            ..self.clone()
        }
    }

    /// Relative URL that reproduces this state.
    pub fn href(&self) -> String {
        let mut params = Vec::new();
        if let Some(symbol) = &self.symbol {
            params.push(format!("symbol={}", urlencoding::encode(symbol)));
        }
        if !self.show_charts {
            params.push(String::from("charts=hide"));
        }
        if let Some(tab) = self.tab {
            params.push(format!("tab={}", tab.slug()));
        }

        if params.is_empty() {
            String::from("/")
        } else {
            format!("/?{}", params.join("&"))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Overview,
    Earnings,
    Estimates,
    Analysts,
    Dividends,
    Splits,
    Profile,
    Holdings,
    Exposure,
    Constituents,
    Details,
}

const STOCK_TABS: [Tab; 6] = [
    Tab::Overview,
    Tab::Earnings,
    Tab::Estimates,
    Tab::Analysts,
    Tab::Dividends,
    Tab::Splits,
];
const ETF_TABS: [Tab; 5] = [
    Tab::Profile,
    Tab::Holdings,
    Tab::Exposure,
    Tab::Earnings,
    Tab::Analysts,
];
const INDEX_TABS: [Tab; 2] = [Tab::Constituents, Tab::Details];

impl Tab {
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Earnings => "earnings",
            Self::Estimates => "estimates",
            Self::Analysts => "analysts",
            Self::Dividends => "dividends",
            Self::Splits => "splits",
            Self::Profile => "profile",
            Self::Holdings => "holdings",
            Self::Exposure => "exposure",
            Self::Constituents => "constituents",
            Self::Details => "details",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Earnings => "Earnings",
            Self::Estimates => "Estimates",
            Self::Analysts => "Analysts",
            Self::Dividends => "Dividends",
            Self::Splits => "Splits",
            Self::Profile => "Profile",
            Self::Holdings => "Holdings",
            Self::Exposure => "Exposure",
            Self::Constituents => "Constituents",
            Self::Details => "Details",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim();
        [STOCK_TABS.as_slice(), ETF_TABS.as_slice(), INDEX_TABS.as_slice()]
            .into_iter()
            .flatten()
            .copied()
            .find(|tab| tab.slug().eq_ignore_ascii_case(slug))
    }

    /// Tabs offered for a symbol kind, in display order.
    pub fn for_kind(kind: SymbolKind) -> &'static [Tab] {
        match kind {
            SymbolKind::Stock => &STOCK_TABS,
            SymbolKind::Etf => &ETF_TABS,
            SymbolKind::Index => &INDEX_TABS,
        }
    }
}

impl Display for Tab {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Pixel geometry of the fixed page regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub header_height: u32,
    pub chart_strip_height: u32,
    pub mid_top: u32,
    pub bottom_bar_height: u32,
    pub show_scroll_buttons: bool,
    /// Vertical position of the scroll arrows, centered on the strip.
    pub scroll_button_top: u32,
}

impl Layout {
    pub fn for_state(state: &ViewState, charts_built: usize) -> Self {
        let chart_strip_height = if state.show_charts {
            CHART_STRIP_HEIGHT
        } else {
            0
        };

        Self {
            header_height: HEADER_HEIGHT,
            chart_strip_height,
            mid_top: HEADER_HEIGHT + chart_strip_height + MID_GAP,
            bottom_bar_height: BOTTOM_BAR_HEIGHT,
            show_scroll_buttons: state.show_charts && charts_built > 0,
            scroll_button_top: (HEADER_HEIGHT + chart_strip_height / 2).saturating_sub(SCROLL_BUTTON_SIZE / 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(symbol: Option<&str>, charts: Option<&str>, tab: Option<&str>) -> ViewQuery {
        ViewQuery {
            symbol: symbol.map(str::to_owned),
            charts: charts.map(str::to_owned),
            tab: tab.map(str::to_owned),
        }
    }

    #[test]
    fn defaults_show_charts_without_symbol() {
        let state = ViewState::from_query(&ViewQuery::default());
        assert_eq!(state, ViewState::default());
        assert!(state.show_charts);
        assert_eq!(state.href(), "/");
    }

    #[test]
    fn normalizes_symbol_and_parses_tab() {
        let state = ViewState::from_query(&query(Some("  brk.b "), Some("hide"), Some("Earnings")));
        assert_eq!(state.symbol.as_deref(), Some("BRK.B"));
        assert!(!state.show_charts);
        assert_eq!(state.tab, Some(Tab::Earnings));
    }

    #[test]
    fn blank_symbol_and_unknown_tab_are_dropped() {
        let state = ViewState::from_query(&query(Some("   "), Some("bogus"), Some("nope")));
        assert_eq!(state.symbol, None);
        assert!(state.show_charts);
        assert_eq!(state.tab, None);
    }

    #[test]
    fn href_round_trips_state() {
        let state = ViewState::from_query(&query(Some("^gspc"), Some("hide"), Some("details")));
        assert_eq!(state.href(), "/?symbol=%5EGSPC&charts=hide&tab=details");
    }

    #[test]
    fn toggling_twice_restores_layout() {
        let state = ViewState::from_query(&query(Some("AAPL"), None, None));
        let original = Layout::for_state(&state, 4);

        let hidden = state.toggled_charts();
        let hidden_layout = Layout::for_state(&hidden, 4);
        assert_eq!(hidden_layout.chart_strip_height, 0);
        assert_eq!(hidden_layout.mid_top, HEADER_HEIGHT + MID_GAP);
        assert!(!hidden_layout.show_scroll_buttons);

        let restored = hidden.toggled_charts();
        assert_eq!(restored, state);
        assert_eq!(Layout::for_state(&restored, 4), original);
    }

    #[test]
    fn visible_layout_geometry() {
        let layout = Layout::for_state(&ViewState::default(), 1);
        assert_eq!(layout.header_height, 100);
        assert_eq!(layout.chart_strip_height, 300);
        assert_eq!(layout.mid_top, 408);
        assert_eq!(layout.bottom_bar_height, 70);
        assert!(layout.show_scroll_buttons);
    }

    #[test]
    fn no_scroll_buttons_without_charts() {
        let layout = Layout::for_state(&ViewState::default(), 0);
        assert!(!layout.show_scroll_buttons);
        assert_eq!(layout.chart_strip_height, 300);
    }

    #[test]
    fn tabs_per_kind() {
        assert_eq!(Tab::for_kind(SymbolKind::Stock).len(), 6);
        assert_eq!(Tab::for_kind(SymbolKind::Etf)[0], Tab::Profile);
        assert_eq!(
            Tab::for_kind(SymbolKind::Index),
            &[Tab::Constituents, Tab::Details]
        );
    }
}
