//! Xero report shapes.
//!
//! Xero returns `Reports[0].Rows`, a list of rows tagged by `RowType`
//! (`Header`, `Section`, `Row`, `SummaryRow`). Sections carry a `Title` and
//! child rows whose `Cells` are `[label, amount, ...]`. Cash is not read from
//! the balance sheet but from the bank-account listing.

use crate::config::ReportLabels;
use crate::extractor::ExtractionStrategy;
use crate::providers::PeriodTotals;
use crate::report::{finite_or_zero, parse_amount, parse_label, Cell, ReportTree, Section};
use log::debug;
use serde_json::Value;

const SUMMARY_ROW: &str = "SummaryRow";

pub fn report_tree(raw: &Value) -> ReportTree {
    let rows = raw
        .pointer("/Reports/0/Rows")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let sections = rows
        .iter()
        .filter_map(|row| match row_type(row) {
            Some("Section") => {
                let title = row
                    .get("Title")
                    .and_then(parse_label)
                    .filter(|t| !t.is_empty());
                let cells: Vec<Cell> = row
                    .get("Rows")
                    .and_then(Value::as_array)
                    .map(|children| {
                        children
                            .iter()
                            .filter(|child| row_type(child) != Some(SUMMARY_ROW))
                            .filter_map(row_cell)
                            .collect()
                    })
                    .unwrap_or_default();
                Some(Section::rows(title, cells))
            }
            Some("Row") => row_cell(row).map(|cell| Section::rows(None, vec![cell])),
            _ => None,
        })
        .collect();

    ReportTree::new(sections)
}

/// Sum of `BankAccountBalance` across every account in a bank-account listing.
///
/// Accepts a bare array or an object wrapping it in `BankAccounts` or `Accounts`.
pub fn total_bank_balance(raw: &Value) -> f64 {
    let accounts = raw
        .as_array()
        .or_else(|| raw.get("BankAccounts").and_then(Value::as_array))
        .or_else(|| raw.get("Accounts").and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let total: f64 = accounts
        .iter()
        .filter_map(|account| account.get("BankAccountBalance").and_then(parse_amount))
        .sum();
    let total = finite_or_zero(total);
    debug!("Summed {} Xero bank accounts -> {}", accounts.len(), total);
    total
}

/// Applies the Xero section-sum strategy with the configured section titles.
#[derive(Debug, Clone)]
pub struct XeroAdapter {
    labels: ReportLabels,
}

impl XeroAdapter {
    pub fn new(labels: ReportLabels) -> Self {
        Self { labels }
    }

    pub fn period_totals(&self, raw_pnl: &Value) -> PeriodTotals {
        let tree = report_tree(raw_pnl);
        let strategy = ExtractionStrategy::SectionSum;
        PeriodTotals {
            revenue: strategy.extract(&tree, &self.labels.xero_revenue),
            expenses: strategy.extract(&tree, &self.labels.xero_expenses),
        }
    }

    pub fn cash_balance(&self, raw_bank_accounts: &Value) -> f64 {
        total_bank_balance(raw_bank_accounts)
    }
}

impl Default for XeroAdapter {
    fn default() -> Self {
        Self::new(ReportLabels::default())
    }
}

fn row_type(row: &Value) -> Option<&str> {
    row.get("RowType").and_then(Value::as_str)
}

fn row_cell(row: &Value) -> Option<Cell> {
    let cells = row.get("Cells")?;
    let label = cells
        .pointer("/0/Value")
        .and_then(parse_label)
        .unwrap_or_default();
    let value = cells.pointer("/1/Value").and_then(parse_amount);
    Some(Cell::new(label, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{extract_flat, sum_section};
    use serde_json::json;

    fn data_row(label: &str, value: &str) -> Value {
        json!({"RowType": "Row", "Cells": [{"Value": label}, {"Value": value}]})
    }

    fn summary_row(label: &str, value: &str) -> Value {
        json!({"RowType": "SummaryRow", "Cells": [{"Value": label}, {"Value": value}]})
    }

    fn pnl_fixture() -> Value {
        json!({
            "Reports": [{
                "ReportName": "Profit and Loss",
                "Rows": [
                    {"RowType": "Header", "Cells": [{"Value": ""}, {"Value": "30 Apr 24"}]},
                    {
                        "RowType": "Section",
                        "Title": "Income",
                        "Rows": [
                            data_row("Sales", "8000.00"),
                            data_row("Consulting", "2000.00"),
                            summary_row("Total Income", "10000.00")
                        ]
                    },
                    {
                        "RowType": "Section",
                        "Title": "Less Operating Expenses",
                        "Rows": [
                            data_row("Rent", "3000.00"),
                            data_row("Wages", "4000.00"),
                            data_row("Bank Fees", ""),
                            summary_row("Total Operating Expenses", "7000.00")
                        ]
                    },
                    {"RowType": "Section", "Title": "", "Rows": [data_row("Net Profit", "3000.00")]}
                ]
            }]
        })
    }

    #[test]
    fn test_section_rows_are_summed_without_summary_row() {
        let totals = XeroAdapter::default().period_totals(&pnl_fixture());
        assert_eq!(totals.revenue, 10000.0);
        assert_eq!(totals.expenses, 7000.0);
    }

    #[test]
    fn test_revenue_section_sum_versus_first_match() {
        let raw = json!({
            "Reports": [{"Rows": [{
                "RowType": "Section",
                "Title": "Revenue",
                "Rows": [
                    data_row("Revenue", "1000"),
                    data_row("Revenue", "2000"),
                    data_row("Revenue", "500")
                ]
            }]}]
        });
        let tree = report_tree(&raw);
        assert_eq!(sum_section(&tree, "Revenue"), 3500.0);
        assert_eq!(extract_flat(&tree, "Revenue"), 1000.0);
    }

    #[test]
    fn test_untitled_section_and_header_rows() {
        let tree = report_tree(&pnl_fixture());
        assert_eq!(tree.sections.len(), 3);
        assert_eq!(tree.sections[2].title, None);
        assert_eq!(extract_flat(&tree, "Net Profit"), 3000.0);
    }

    #[test]
    fn test_bank_balance_sums_all_accounts() {
        let raw = json!({"BankAccounts": [
            {"Name": "Cheque", "BankAccountBalance": 12500.5},
            {"Name": "Savings", "BankAccountBalance": "30000"},
            {"Name": "Card", "BankAccountBalance": -500.5},
            {"Name": "Closed"}
        ]});
        assert_eq!(total_bank_balance(&raw), 42000.0);

        let bare = json!([{"BankAccountBalance": 10}, {"BankAccountBalance": 5}]);
        assert_eq!(XeroAdapter::default().cash_balance(&bare), 15.0);
    }

    #[test]
    fn test_malformed_payloads_extract_zero() {
        for raw in [json!(null), json!({"Reports": []}), json!({"Reports": [{"Rows": 4}]})] {
            assert_eq!(
                XeroAdapter::default().period_totals(&raw),
                PeriodTotals::default()
            );
        }
        assert_eq!(total_bank_balance(&json!({"Accounts": "none"})), 0.0);
    }

    #[test]
    fn test_bank_balance_overflow_is_zero() {
        let raw = json!([
            {"BankAccountBalance": "1.7e308"},
            {"BankAccountBalance": "1.7e308"}
        ]);
        assert_eq!(total_bank_balance(&raw), 0.0);
    }
}
