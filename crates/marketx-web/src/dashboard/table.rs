//! Table and fact-line shaping for section bodies.

use std::cmp::Ordering;

use marketx_core::format::{thousands, usd};
use serde::Serialize;
use serde_json::Value;

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Vec<&str> {
        let Some(index) = self.columns.iter().position(|column| column == name) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.get(index).map(String::as_str))
            .collect()
    }
}

/// Label / value pair rendered inline, e.g. `Beta: 1.24`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fact {
    pub label: String,
    pub value: String,
}

impl Fact {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

pub fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}

pub fn number(value: Option<f64>, decimals: usize) -> String {
    value.map(|value| thousands(value, decimals)).unwrap_or_default()
}

pub fn dollars(value: Option<f64>, decimals: usize) -> String {
    value.map(|value| usd(value, decimals)).unwrap_or_default()
}

pub fn count(value: Option<u32>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

/// Fact value; `N/A` when absent.
pub fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| String::from(NOT_AVAILABLE))
}

/// Provider metric as shown to the user: numbers and strings verbatim.
pub fn metric(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

/// Descending order with missing values last.
pub fn desc_by<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    b.cmp(a)
}

/// Descending order for floats with missing values last.
pub fn desc_by_f64(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
