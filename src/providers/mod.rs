//! Provider adapters and the fetch capability they are fed by.
//!
//! Each adapter is a set of pure functions turning a provider's raw JSON into a
//! [`ReportTree`](crate::report::ReportTree), plus a small struct that applies
//! the provider's extraction strategy with the configured labels.

pub mod quickbooks;
pub mod xero;

#[cfg(feature = "http")]
pub mod http;

pub use quickbooks::QuickBooksAdapter;
pub use xero::XeroAdapter;

use crate::error::FetchError;
use crate::utils::DateRange;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    QuickBooks,
    Xero,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::QuickBooks => write!(f, "quickbooks"),
            Provider::Xero => write!(f, "xero"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    ProfitAndLoss,
    BalanceSheet,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::ProfitAndLoss => write!(f, "profit and loss"),
            ReportKind::BalanceSheet => write!(f, "balance sheet"),
        }
    }
}

/// Revenue and expenses read from one P&L report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub revenue: f64,
    pub expenses: f64,
}

/// Source of raw provider reports.
///
/// Implementations own transport, authorization and retries. Any error they
/// return is treated as fatal for the metrics build that requested it.
#[async_trait]
pub trait ReportFetcher: Send + Sync {
    async fn fetch_report(
        &self,
        kind: ReportKind,
        account_id: &str,
        range: DateRange,
    ) -> Result<Value, FetchError>;

    /// Bank-account listing. Only Xero exposes cash this way.
    async fn fetch_bank_accounts(&self, _account_id: &str) -> Result<Value, FetchError> {
        Err(FetchError::Unsupported("bank account listing".to_string()))
    }
}
