//! `reqwest`-backed report fetchers.
//!
//! Access tokens are obtained by the caller; these clients only attach them.

use crate::config::{QuickBooksConfig, XeroConfig};
use crate::error::FetchError;
use crate::providers::{ReportFetcher, ReportKind};
use crate::utils::DateRange;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

async fn send_json(request: RequestBuilder) -> Result<Value, FetchError> {
    let res = request
        .header("Accept", "application/json")
        .send()
        .await?;
    let status = res.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        let body = res.text().await.unwrap_or_default();
        return Err(FetchError::Unauthorized(body));
    }
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(FetchError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(res.json().await?)
}

/// QuickBooks Online reports API. An empty `account_id` falls back to the
/// configured realm.
#[derive(Clone)]
pub struct QuickBooksClient {
    client: Client,
    config: QuickBooksConfig,
    access_token: String,
}

impl QuickBooksClient {
    pub fn new(config: QuickBooksConfig, access_token: String) -> Self {
        Self {
            client: Client::new(),
            config,
            access_token,
        }
    }

    fn report_url(&self, kind: ReportKind, realm_id: &str) -> String {
        let report = match kind {
            ReportKind::ProfitAndLoss => "ProfitAndLoss",
            ReportKind::BalanceSheet => "BalanceSheet",
        };
        format!(
            "{}/v3/company/{}/reports/{}",
            self.config.base_url.trim_end_matches('/'),
            realm_id,
            report
        )
    }
}

#[async_trait]
impl ReportFetcher for QuickBooksClient {
    async fn fetch_report(
        &self,
        kind: ReportKind,
        account_id: &str,
        range: DateRange,
    ) -> Result<Value, FetchError> {
        let realm_id = if account_id.is_empty() {
            self.config.realm_id.as_str()
        } else {
            account_id
        };
        let url = self.report_url(kind, realm_id);
        debug!("GET {} ({})", url, range);

        let request = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("start_date", range.start.format("%Y-%m-%d").to_string()),
                ("end_date", range.end.format("%Y-%m-%d").to_string()),
                ("minorversion", self.config.minor_version.to_string()),
            ]);

        send_json(request).await
    }
}

/// Xero accounting API. `account_id` overrides the configured tenant when set.
#[derive(Clone)]
pub struct XeroClient {
    client: Client,
    config: XeroConfig,
    access_token: String,
}

impl XeroClient {
    pub fn new(config: XeroConfig, access_token: String) -> Self {
        Self {
            client: Client::new(),
            config,
            access_token,
        }
    }

    fn get(&self, path: &str, account_id: &str) -> RequestBuilder {
        let tenant_id = if account_id.is_empty() {
            self.config.tenant_id.as_str()
        } else {
            account_id
        };
        let url = format!(
            "{}/api.xro/2.0/{}",
            self.config.base_url.trim_end_matches('/'),
            path
        );
        debug!("GET {}", url);

        self.client
            .get(url)
            .bearer_auth(&self.access_token)
            .header("Xero-tenant-id", tenant_id)
    }
}

#[async_trait]
impl ReportFetcher for XeroClient {
    async fn fetch_report(
        &self,
        kind: ReportKind,
        account_id: &str,
        range: DateRange,
    ) -> Result<Value, FetchError> {
        let request = match kind {
            ReportKind::ProfitAndLoss => self.get("Reports/ProfitAndLoss", account_id).query(&[
                ("fromDate", range.start.format("%Y-%m-%d").to_string()),
                ("toDate", range.end.format("%Y-%m-%d").to_string()),
            ]),
            ReportKind::BalanceSheet => self
                .get("Reports/BalanceSheet", account_id)
                .query(&[("date", range.end.format("%Y-%m-%d").to_string())]),
        };

        send_json(request).await
    }

    async fn fetch_bank_accounts(&self, account_id: &str) -> Result<Value, FetchError> {
        let request = self
            .get("Accounts", account_id)
            .query(&[("where", "Type==\"BANK\"")]);
        send_json(request).await
    }
}
