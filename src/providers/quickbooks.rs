//! QuickBooks Online report shapes.
//!
//! QuickBooks nests report rows under `Rows.Row`. Data rows carry a `ColData`
//! array (`[label, amount, ...]`); section rows carry a `Header.ColData`, their
//! own `Rows.Row`, and usually a `Summary.ColData` total line.

use crate::config::ReportLabels;
use crate::extractor::ExtractionStrategy;
use crate::providers::PeriodTotals;
use crate::report::{parse_amount, parse_label, Cell, ReportTree, Section};
use serde_json::Value;

pub fn profit_and_loss_tree(raw: &Value) -> ReportTree {
    let cells = rows_of(raw).iter().flat_map(row_cells).collect();
    ReportTree::new(vec![Section::rows(None, cells)])
}

pub fn balance_sheet_tree(raw: &Value) -> ReportTree {
    let sections = rows_of(raw)
        .iter()
        .filter_map(|row| {
            if is_section(row) {
                let title = row
                    .pointer("/Header/ColData/0/value")
                    .and_then(parse_label);
                let children: Vec<Cell> = rows_of(row).iter().filter_map(child_cell).collect();
                Some(Section::nested(title, vec![Section::rows(None, children)]))
            } else {
                col_data_cell(row.get("ColData")?).map(|cell| Section::rows(None, vec![cell]))
            }
        })
        .collect();

    ReportTree::new(sections)
}

/// Applies the QuickBooks first-match strategies with the configured labels.
#[derive(Debug, Clone)]
pub struct QuickBooksAdapter {
    labels: ReportLabels,
}

impl QuickBooksAdapter {
    pub fn new(labels: ReportLabels) -> Self {
        Self { labels }
    }

    pub fn period_totals(&self, raw_pnl: &Value) -> PeriodTotals {
        let tree = profit_and_loss_tree(raw_pnl);
        let strategy = ExtractionStrategy::FirstMatchFlat;
        PeriodTotals {
            revenue: strategy.extract(&tree, &self.labels.quickbooks_revenue),
            expenses: strategy.extract(&tree, &self.labels.quickbooks_expenses),
        }
    }

    pub fn cash_balance(&self, raw_balance_sheet: &Value) -> f64 {
        let tree = balance_sheet_tree(raw_balance_sheet);
        ExtractionStrategy::FirstMatchNested.extract(&tree, &self.labels.quickbooks_cash)
    }
}

impl Default for QuickBooksAdapter {
    fn default() -> Self {
        Self::new(ReportLabels::default())
    }
}

fn rows_of(node: &Value) -> &[Value] {
    node.pointer("/Rows/Row")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn is_section(row: &Value) -> bool {
    row.get("Header").is_some() || row.get("Rows").is_some()
}

fn col_data_cell(col_data: &Value) -> Option<Cell> {
    let label = col_data.pointer("/0/value").and_then(parse_label)?;
    let value = col_data.pointer("/1/value").and_then(parse_amount);
    Some(Cell::new(label, value))
}

/// Top-level P&L row: the header (or data) pair, then the summary pair if any.
///
/// Section headers leave their amount blank, so a header label takes the
/// section's summary amount.
fn row_cells(row: &Value) -> Vec<Cell> {
    let summary = row.pointer("/Summary/ColData").and_then(col_data_cell);
    let primary = row
        .pointer("/Header/ColData")
        .or_else(|| row.get("ColData"))
        .and_then(col_data_cell)
        .map(|mut cell| {
            if cell.value.is_none() {
                cell.value = summary.as_ref().and_then(|s| s.value);
            }
            cell
        });

    primary.into_iter().chain(summary).collect()
}

/// Child of a balance-sheet section: its own data pair, or its summary line
/// when it is itself a section.
fn child_cell(row: &Value) -> Option<Cell> {
    row.get("ColData")
        .or_else(|| row.pointer("/Summary/ColData"))
        .and_then(col_data_cell)
}
