//! # Charts
//!
//! Chart builders turn cached provider data into a renderer-agnostic
//! [`ChartSpec`]. A builder that finds nothing worth plotting returns
//! [`Chart::NoData`]; provider failures surface as `Err(FetchError)`.
//!
//! [`ChartSpec::to_plotly`] produces a Plotly figure (`data` + `layout`) for
//! the browser.
//!
//! | Builder | Chart |
//! |---------|-------|
//! | [`recommendation_chart`] | Stacked analyst-rating bars per period |
//! | [`eps_surprise_chart`] | Estimate vs. actual EPS |
//! | [`revenue_estimates_chart`] | Average revenue estimate in $B |
//! | [`price_target_chart`] | Low / mean / median / high price targets |
//! | [`etf_sector_chart`] | Sector exposure donut |
//! | [`etf_holdings_chart`] | Top holdings by weight |

mod builders;

use serde::Serialize;
use serde_json::{json, Value};

pub use builders::{
    eps_surprise_chart, etf_holdings_chart, etf_sector_chart, price_target_chart,
    recommendation_chart, revenue_estimates_chart, EPS_CHART_EARNINGS_LIMIT, TOP_HOLDINGS,
};

/// Figure height in pixels; the chart strip is sized around it.
pub const CHART_HEIGHT: u32 = 260;
const TEMPLATE: &str = "plotly_dark";

/// Outcome of a chart builder.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Ready(ChartSpec),
    NoData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Stack,
    Group,
}

/// Bar fill: one color for the trace, one color per bar, or a continuous
/// scale driven by the bar values.
#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    Solid(&'static str),
    PerBar(Vec<&'static str>),
    Scale(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Trace {
    Bar {
        name: Option<String>,
        x: Vec<String>,
        y: Vec<Option<f64>>,
        text: Option<Vec<String>>,
        marker: Marker,
    },
    Pie {
        labels: Vec<String>,
        values: Vec<f64>,
        hole: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margin {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Margin {
    pub const BARS: Margin = Margin {
        left: 30,
        right: 10,
        top: 35,
        bottom: 25,
    };
    pub const PIE: Margin = Margin {
        left: 10,
        right: 10,
        top: 35,
        bottom: 10,
    };
}

/// Renderer-agnostic chart description.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub traces: Vec<Trace>,
    pub bar_mode: Option<BarMode>,
    pub y_axis_title: Option<String>,
    pub horizontal_legend: bool,
    pub margin: Margin,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            traces: Vec::new(),
            bar_mode: None,
            y_axis_title: None,
            horizontal_legend: false,
            margin: Margin::BARS,
        }
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    pub fn with_bar_mode(mut self, mode: BarMode) -> Self {
        self.bar_mode = Some(mode);
        self
    }

    pub fn with_y_axis_title(mut self, title: impl Into<String>) -> Self {
        self.y_axis_title = Some(title.into());
        self
    }

    pub fn with_horizontal_legend(mut self) -> Self {
        self.horizontal_legend = true;
        self
    }

    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Plotly figure JSON: `{"data": [...], "layout": {...}}`.
    pub fn to_plotly(&self) -> Value {
        let data: Vec<Value> = self.traces.iter().map(trace_to_plotly).collect();

        let mut layout = json!({
            "title": { "text": self.title },
            "template": TEMPLATE,
            "height": CHART_HEIGHT,
            "margin": {
                "l": self.margin.left,
                "r": self.margin.right,
                "t": self.margin.top,
                "b": self.margin.bottom,
            },
            "paper_bgcolor": "rgba(0,0,0,0)",
            "plot_bgcolor": "rgba(0,0,0,0)",
            "font": { "color": "#e5e7eb" },
        });
        if let Some(mode) = self.bar_mode {
            layout["barmode"] = json!(mode);
        }
        if let Some(title) = &self.y_axis_title {
            layout["yaxis"] = json!({ "title": { "text": title } });
        }
        if self.horizontal_legend {
            layout["legend"] = json!({ "orientation": "h", "y": -0.2, "font": { "size": 9 } });
        }

        json!({ "data": data, "layout": layout })
    }
}

fn trace_to_plotly(trace: &Trace) -> Value {
    match trace {
        Trace::Bar {
            name,
            x,
            y,
            text,
            marker,
        } => {
            let mut value = json!({ "type": "bar", "x": x, "y": y });
            if let Some(name) = name {
                value["name"] = json!(name);
            }
            if let Some(text) = text {
                value["text"] = json!(text);
                value["textposition"] = json!("outside");
            }
            value["marker"] = match marker {
                Marker::Solid(color) => json!({ "color": color }),
                Marker::PerBar(colors) => json!({ "color": colors }),
                Marker::Scale(scale) => json!({
                    "color": y,
                    "colorscale": scale,
                    "showscale": true,
                }),
            };
            value
        }
        Trace::Pie {
            labels,
            values,
            hole,
        } => json!({
            "type": "pie",
            "labels": labels,
            "values": values,
            "hole": hole,
            "textposition": "inside",
            "textinfo": "percent+label",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plotly_figure_carries_layout_options() {
        let spec = ChartSpec::new("AAPL Recommendations")
            .with_bar_mode(BarMode::Stack)
            .with_horizontal_legend()
            .with_trace(Trace::Bar {
                name: Some(String::from("buy")),
                x: vec![String::from("2024-01-01")],
                y: vec![Some(12.0)],
                text: None,
                marker: Marker::Solid("#86efac"),
            });

        let figure = spec.to_plotly();
        assert_eq!(figure["layout"]["barmode"], "stack");
        assert_eq!(figure["layout"]["height"], 260);
        assert_eq!(figure["layout"]["template"], "plotly_dark");
        assert_eq!(figure["layout"]["title"]["text"], "AAPL Recommendations");
        assert_eq!(figure["layout"]["legend"]["orientation"], "h");
        assert_eq!(figure["data"][0]["type"], "bar");
        assert_eq!(figure["data"][0]["marker"]["color"], "#86efac");
    }

    #[test]
    fn missing_values_serialize_as_gaps() {
        let spec = ChartSpec::new("gaps").with_trace(Trace::Bar {
            name: None,
            x: vec![String::from("a"), String::from("b")],
            y: vec![Some(1.0), None],
            text: None,
            marker: Marker::Scale("Blues"),
        });

        let figure = spec.to_plotly();
        assert_eq!(figure["data"][0]["y"][1], Value::Null);
        assert_eq!(figure["data"][0]["marker"]["colorscale"], "Blues");
        assert!(figure["data"][0].get("name").is_none());
    }

    #[test]
    fn pie_trace_uses_hole_and_inside_labels() {
        let spec = ChartSpec::new("SPY Sector Exposure")
            .with_margin(Margin::PIE)
            .with_trace(Trace::Pie {
                labels: vec![String::from("Technology")],
                values: vec![31.2],
                hole: 0.35,
            });

        let figure = spec.to_plotly();
        assert_eq!(figure["data"][0]["hole"], 0.35);
        assert_eq!(figure["data"][0]["textinfo"], "percent+label");
        assert_eq!(figure["layout"]["margin"]["b"], 10);
        assert!(figure["layout"].get("barmode").is_none());
    }
}
