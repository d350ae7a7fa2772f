//! Canonical metrics: the three numbers every insight is computed from.

use crate::config::ReportLabels;
use crate::error::{FetchError, InsightError, Result};
use crate::providers::{
    PeriodTotals, Provider, QuickBooksAdapter, ReportFetcher, ReportKind, XeroAdapter,
};
use crate::utils::DateRange;
use chrono::NaiveDate;
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMetrics {
    pub cash_balance: f64,
    pub monthly_revenue: f64,
    pub monthly_expenses: f64,
}

/// Canonical metrics plus the windows and month-to-date figures they came from.
///
/// Month-to-date totals are context only; derivations read `metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub provider: Provider,
    pub metrics: CanonicalMetrics,
    pub month_to_date: PeriodTotals,
    pub prior_month: DateRange,
    pub current_month: DateRange,
    pub as_of: NaiveDate,
}

impl MetricsSnapshot {
    /// Wraps metrics that were obtained elsewhere, with windows relative to `today`.
    pub fn from_metrics(provider: Provider, metrics: CanonicalMetrics, today: NaiveDate) -> Self {
        Self {
            provider,
            metrics,
            month_to_date: PeriodTotals::default(),
            prior_month: DateRange::prior_month(today),
            current_month: DateRange::month_to_date(today),
            as_of: today,
        }
    }
}

/// Fetches a provider's reports concurrently and reduces them to a
/// [`MetricsSnapshot`].
pub struct MetricsBuilder<'a, F: ReportFetcher + ?Sized> {
    fetcher: &'a F,
    labels: ReportLabels,
}

impl<'a, F: ReportFetcher + ?Sized> MetricsBuilder<'a, F> {
    pub fn new(fetcher: &'a F, labels: ReportLabels) -> Self {
        Self { fetcher, labels }
    }

    /// Revenue and expenses come from the prior complete month; cash is read
    /// as of `today`. Any failed fetch fails the whole build.
    pub async fn build(
        &self,
        provider: Provider,
        account_id: &str,
        today: NaiveDate,
    ) -> Result<MetricsSnapshot> {
        let prior_month = DateRange::prior_month(today);
        let current_month = DateRange::month_to_date(today);

        info!(
            "Building {} metrics for account {} (prior month {}, as of {})",
            provider, account_id, prior_month, today
        );

        let (prior, month_to_date, cash_balance) = match provider {
            Provider::QuickBooks => {
                let adapter = QuickBooksAdapter::new(self.labels.clone());
                let (prior_raw, current_raw, balance_raw) = futures::try_join!(
                    self.fetch(ReportKind::ProfitAndLoss, account_id, prior_month),
                    self.fetch(ReportKind::ProfitAndLoss, account_id, current_month),
                    self.fetch(ReportKind::BalanceSheet, account_id, DateRange::as_of(today)),
                )?;
                (
                    adapter.period_totals(&prior_raw),
                    adapter.period_totals(&current_raw),
                    adapter.cash_balance(&balance_raw),
                )
            }
            Provider::Xero => {
                let adapter = XeroAdapter::new(self.labels.clone());
                let (prior_raw, current_raw, accounts_raw) = futures::try_join!(
                    self.fetch(ReportKind::ProfitAndLoss, account_id, prior_month),
                    self.fetch(ReportKind::ProfitAndLoss, account_id, current_month),
                    self.fetch_bank_accounts(account_id),
                )?;
                (
                    adapter.period_totals(&prior_raw),
                    adapter.period_totals(&current_raw),
                    adapter.cash_balance(&accounts_raw),
                )
            }
        };

        let metrics = CanonicalMetrics {
            cash_balance,
            monthly_revenue: prior.revenue,
            monthly_expenses: prior.expenses,
        };
        debug!("Canonical metrics for {}: {:?}", account_id, metrics);

        Ok(MetricsSnapshot {
            provider,
            metrics,
            month_to_date,
            prior_month,
            current_month,
            as_of: today,
        })
    }

    async fn fetch(
        &self,
        kind: ReportKind,
        account_id: &str,
        range: DateRange,
    ) -> Result<serde_json::Value> {
        self.fetcher
            .fetch_report(kind, account_id, range)
            .await
            .map_err(|error| source_unavailable(format!("{} {}", kind, range), error))
    }

    async fn fetch_bank_accounts(&self, account_id: &str) -> Result<serde_json::Value> {
        self.fetcher
            .fetch_bank_accounts(account_id)
            .await
            .map_err(|error| source_unavailable("bank accounts".to_string(), error))
    }
}

fn source_unavailable(source_name: String, error: FetchError) -> InsightError {
    warn!("Fetching {} failed: {}", source_name, error);
    InsightError::SourceUnavailable { source_name, error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct RecordingFetcher {
        calls: Mutex<Vec<(ReportKind, DateRange)>>,
        fail_balance_sheet: bool,
    }

    impl RecordingFetcher {
        fn new(fail_balance_sheet: bool) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_balance_sheet,
            }
        }
    }

    fn qb_pnl(income: &str, expenses: &str) -> Value {
        json!({"Rows": {"Row": [
            {"Summary": {"ColData": [{"value": "Total Income"}, {"value": income}]}},
            {"Summary": {"ColData": [{"value": "Total Expenses"}, {"value": expenses}]}}
        ]}})
    }

    #[async_trait]
    impl ReportFetcher for RecordingFetcher {
        async fn fetch_report(
            &self,
            kind: ReportKind,
            _account_id: &str,
            range: DateRange,
        ) -> std::result::Result<Value, FetchError> {
            self.calls.lock().unwrap().push((kind, range));
            match kind {
                ReportKind::BalanceSheet if self.fail_balance_sheet => {
                    Err(FetchError::Unauthorized("token expired".to_string()))
                }
                ReportKind::BalanceSheet => Ok(json!({"Rows": {"Row": [{
                    "Header": {"ColData": [{"value": "ASSETS"}]},
                    "Rows": {"Row": [{"ColData": [
                        {"value": "Cash and cash equivalents"},
                        {"value": "90000"}
                    ]}]}
                }]}})),
                ReportKind::ProfitAndLoss if range == DateRange::prior_month(today()) => {
                    Ok(qb_pnl("20000", "26000"))
                }
                ReportKind::ProfitAndLoss => Ok(qb_pnl("1000", "400")),
            }
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    #[tokio::test]
    async fn test_quickbooks_reads_prior_month_and_cash_as_of_today() {
        let fetcher = RecordingFetcher::new(false);
        let snapshot = MetricsBuilder::new(&fetcher, ReportLabels::default())
            .build(Provider::QuickBooks, "realm-1", today())
            .await
            .unwrap();

        assert_eq!(
            snapshot.metrics,
            CanonicalMetrics {
                cash_balance: 90_000.0,
                monthly_revenue: 20_000.0,
                monthly_expenses: 26_000.0,
            }
        );
        assert_eq!(snapshot.month_to_date.revenue, 1_000.0);
        assert_eq!(snapshot.prior_month.start, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());

        let calls = fetcher.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert!(calls.contains(&(ReportKind::BalanceSheet, DateRange::as_of(today()))));
        assert!(calls.contains(&(ReportKind::ProfitAndLoss, DateRange::prior_month(today()))));
        assert!(calls.contains(&(ReportKind::ProfitAndLoss, DateRange::month_to_date(today()))));
    }

    #[tokio::test]
    async fn test_failed_fetch_fails_whole_build() {
        let fetcher = RecordingFetcher::new(true);
        let err = MetricsBuilder::new(&fetcher, ReportLabels::default())
            .build(Provider::QuickBooks, "realm-1", today())
            .await
            .unwrap_err();

        match err {
            InsightError::SourceUnavailable { source_name, error } => {
                assert!(source_name.starts_with("balance sheet"));
                assert!(matches!(error, FetchError::Unauthorized(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_xero_without_bank_listing_is_unavailable() {
        let fetcher = RecordingFetcher::new(false);
        let err = MetricsBuilder::new(&fetcher, ReportLabels::default())
            .build(Provider::Xero, "tenant-1", today())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InsightError::SourceUnavailable {
                error: FetchError::Unsupported(_),
                ..
            }
        ));
    }
}
