//! Label lookups over a [`ReportTree`].
//!
//! Every function here is total: a missing label or section yields `0.0`.

use crate::report::{finite_or_zero, ReportTree};
use log::debug;
use serde::{Deserialize, Serialize};

/// How a provider turns a report section into a single number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// First row whose label matches, at the top level (QuickBooks P&L).
    FirstMatchFlat,
    /// First row whose label matches, one level inside each section (QuickBooks balance sheet).
    FirstMatchNested,
    /// Sum of all rows in the section whose title matches (Xero).
    SectionSum,
}

impl ExtractionStrategy {
    pub fn extract(self, tree: &ReportTree, label: &str) -> f64 {
        let value = match self {
            ExtractionStrategy::FirstMatchFlat => extract_flat(tree, label),
            ExtractionStrategy::FirstMatchNested => extract_nested(tree, label),
            ExtractionStrategy::SectionSum => sum_section(tree, label),
        };
        debug!("{:?} lookup for '{}' -> {}", self, label, value);
        value
    }
}

pub fn extract_flat(tree: &ReportTree, label: &str) -> f64 {
    tree.sections
        .iter()
        .flat_map(|section| section.cells())
        .find(|cell| cell.label == label)
        .map(|cell| cell.amount())
        .unwrap_or(0.0)
}

pub fn extract_nested(tree: &ReportTree, label: &str) -> f64 {
    tree.sections
        .iter()
        .flat_map(|section| section.children())
        .flat_map(|child| child.cells())
        .find(|cell| cell.label == label)
        .map(|cell| cell.amount())
        .unwrap_or(0.0)
}

/// Sums the rows of the first top-level section titled `title`.
///
/// Section-summed reports are flat, so nested sections are never searched. A
/// sum that overflows reads as `0`.
pub fn sum_section(tree: &ReportTree, title: &str) -> f64 {
    tree.sections
        .iter()
        .find(|s| s.has_title(title))
        .map(|s| finite_or_zero(s.cells().iter().map(|cell| cell.amount()).sum()))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Cell, Section};

    fn revenue_rows() -> Vec<Cell> {
        vec![
            Cell::new("Revenue", Some(1000.0)),
            Cell::new("Revenue", Some(2000.0)),
            Cell::new("Revenue", Some(500.0)),
        ]
    }

    #[test]
    fn test_flat_first_match_wins() {
        let tree = ReportTree::new(vec![Section::rows(None, revenue_rows())]);
        assert_eq!(extract_flat(&tree, "Revenue"), 1000.0);
    }

    #[test]
    fn test_flat_ignores_nested_rows() {
        let tree = ReportTree::new(vec![Section::nested(
            Some("ASSETS".to_string()),
            vec![Section::rows(None, vec![Cell::new("Cash", Some(5.0))])],
        )]);
        assert_eq!(extract_flat(&tree, "Cash"), 0.0);
        assert_eq!(extract_nested(&tree, "Cash"), 5.0);
    }

    #[test]
    fn test_nested_first_match_across_sections() {
        let tree = ReportTree::new(vec![
            Section::nested(
                Some("ASSETS".to_string()),
                vec![Section::rows(
                    Some("Current".to_string()),
                    vec![Cell::new("Other", Some(1.0)), Cell::new("Cash", Some(42.0))],
                )],
            ),
            Section::nested(
                Some("MORE".to_string()),
                vec![Section::rows(None, vec![Cell::new("Cash", Some(99.0))])],
            ),
        ]);
        assert_eq!(extract_nested(&tree, "Cash"), 42.0);
    }

    #[test]
    fn test_missing_label_is_zero() {
        let empty = ReportTree::default();
        assert_eq!(extract_flat(&empty, "Total Income"), 0.0);
        assert_eq!(extract_nested(&empty, "Total Income"), 0.0);
        assert_eq!(sum_section(&empty, "Income"), 0.0);

        let tree = ReportTree::new(vec![Section::rows(None, vec![Cell::new("Sales", Some(3.0))])]);
        assert_eq!(extract_flat(&tree, "sales"), 0.0);
        assert_eq!(extract_nested(&tree, "Sales"), 0.0);
    }

    #[test]
    fn test_matched_row_without_value_is_zero() {
        let tree = ReportTree::new(vec![Section::rows(
            None,
            vec![Cell::new("Total Income", None), Cell::new("Total Income", Some(7.0))],
        )]);
        assert_eq!(extract_flat(&tree, "Total Income"), 0.0);
    }

    #[test]
    fn test_section_sum_differs_from_first_match() {
        let tree = ReportTree::new(vec![Section::rows(
            Some("Revenue".to_string()),
            revenue_rows(),
        )]);
        assert_eq!(ExtractionStrategy::SectionSum.extract(&tree, "Revenue"), 3500.0);
        assert_eq!(ExtractionStrategy::FirstMatchFlat.extract(&tree, "Revenue"), 1000.0);
    }

    #[test]
    fn test_section_sum_only_reads_top_level_titles() {
        let tree = ReportTree::new(vec![
            Section::nested(
                Some("Assets".to_string()),
                vec![Section::rows(
                    Some("Bank".to_string()),
                    vec![Cell::new("Cheque", Some(10.0))],
                )],
            ),
            Section::rows(
                Some("Bank".to_string()),
                vec![Cell::new("Cheque", Some(4.0)), Cell::new("Savings", None)],
            ),
        ]);
        assert_eq!(sum_section(&tree, "Bank"), 4.0);
        assert_eq!(sum_section(&tree, "Assets"), 0.0);
    }

    #[test]
    fn test_section_sum_overflow_is_zero() {
        let tree = ReportTree::new(vec![Section::rows(
            Some("Income".to_string()),
            vec![Cell::new("Sales", Some(f64::MAX)), Cell::new("Grants", Some(f64::MAX))],
        )]);
        assert_eq!(sum_section(&tree, "Income"), 0.0);
    }
}
