//! Provider-agnostic report tree.
//!
//! Both QuickBooks and Xero reports are normalized into a [`ReportTree`]: an
//! ordered list of [`Section`]s whose bodies are either flat [`Cell`] rows or
//! one level of nested child sections.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportTree {
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: Option<String>,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionBody {
    Rows(Vec<Cell>),
    Nested(Vec<Section>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub label: String,
    /// `None` when the source value was absent or not numeric.
    pub value: Option<f64>,
}

impl ReportTree {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }
}

impl Section {
    pub fn rows(title: Option<String>, cells: Vec<Cell>) -> Self {
        Self {
            title,
            body: SectionBody::Rows(cells),
        }
    }

    pub fn nested(title: Option<String>, children: Vec<Section>) -> Self {
        Self {
            title,
            body: SectionBody::Nested(children),
        }
    }

    /// The section's flat cells, or an empty slice for nested sections.
    pub fn cells(&self) -> &[Cell] {
        match &self.body {
            SectionBody::Rows(cells) => cells,
            SectionBody::Nested(_) => &[],
        }
    }

    pub fn children(&self) -> &[Section] {
        match &self.body {
            SectionBody::Rows(_) => &[],
            SectionBody::Nested(children) => children,
        }
    }

    pub fn has_title(&self, title: &str) -> bool {
        self.title.as_deref() == Some(title)
    }
}

impl Cell {
    pub fn new(label: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    /// Lenient-zero read: a missing value counts as `0`.
    pub fn amount(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }
}

/// Reads a report amount from a JSON number or numeric string.
///
/// Accounting exports write amounts as strings (`"1,234.50"`), sometimes empty.
/// Anything that does not parse to a finite number is treated as missing.
pub fn parse_amount(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                None
            } else {
                cleaned.parse::<f64>().ok()
            }
        }
        _ => None,
    };

    parsed.filter(|v| v.is_finite())
}

/// Collapses an overflowed or undefined total to `0`, the same as a missing amount.
pub fn finite_or_zero(total: f64) -> f64 {
    if total.is_finite() {
        total
    } else {
        0.0
    }
}

/// Reads a label from a JSON string, trimming nothing: labels compare exactly.
pub fn parse_label(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}
