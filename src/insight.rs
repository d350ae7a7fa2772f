//! Insight requests, results and the orchestrator that produces them.
//!
//! A request moves through `Received -> MetricsBuilt -> Derived -> Narrated ->
//! Packaged`. Validation happens on receipt, before any report is fetched.

use crate::config::{EngineConfig, ReportLabels};
use crate::derivation::{hiring_impact, DerivedIndicators, HiringImpact, Runway};
use crate::error::{InsightError, Result};
use crate::llm::narrator::{narrate, NarrativeGenerator};
use crate::llm::prompts::build_prompt;
use crate::metrics::{CanonicalMetrics, MetricsBuilder, MetricsSnapshot};
use crate::providers::{Provider, ReportFetcher};
use chrono::NaiveDate;
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    CashRunway,
    BurnRate,
    ProfitMargin,
    HiringImpact,
    Custom,
    All,
}

impl InsightKind {
    /// Kinds produced, in this order, for an `all` request.
    pub const OVERVIEW: [InsightKind; 3] = [
        InsightKind::CashRunway,
        InsightKind::BurnRate,
        InsightKind::ProfitMargin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InsightKind::CashRunway => "cash_runway",
            InsightKind::BurnRate => "burn_rate",
            InsightKind::ProfitMargin => "profit_margin",
            InsightKind::HiringImpact => "hiring_impact",
            InsightKind::Custom => "custom",
            InsightKind::All => "all",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            InsightKind::CashRunway => "Cash Runway",
            InsightKind::BurnRate => "Burn Rate",
            InsightKind::ProfitMargin => "Profit Margin",
            InsightKind::HiringImpact => "Hiring Impact",
            InsightKind::Custom => "Custom Insight",
            InsightKind::All => "Financial Overview",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cash_runway" => Ok(InsightKind::CashRunway),
            "burn_rate" => Ok(InsightKind::BurnRate),
            "profit_margin" => Ok(InsightKind::ProfitMargin),
            "hiring_impact" => Ok(InsightKind::HiringImpact),
            "custom" => Ok(InsightKind::Custom),
            "all" => Ok(InsightKind::All),
            other => Err(InsightError::InvalidRequest(format!(
                "unknown insight kind '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    #[schemars(description = "Insight to generate; `all` covers runway, burn and margin")]
    pub kind: InsightKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Annual salary of the prospective hire. Required for hiring_impact.")]
    pub annual_salary: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Free-form question from the owner. Required for custom.")]
    pub question: Option<String>,
}

impl InsightRequest {
    pub fn new(kind: InsightKind) -> Self {
        Self {
            kind,
            annual_salary: None,
            question: None,
        }
    }

    pub fn hiring(annual_salary: f64) -> Self {
        Self {
            annual_salary: Some(annual_salary),
            ..Self::new(InsightKind::HiringImpact)
        }
    }

    pub fn custom(question: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            ..Self::new(InsightKind::Custom)
        }
    }

    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(InsightRequest)
    }

    fn plan(&self) -> Result<Plan> {
        let scenario = match self.kind {
            InsightKind::All => return Ok(Plan::Overview),
            InsightKind::CashRunway => Scenario::CashRunway,
            InsightKind::BurnRate => Scenario::BurnRate,
            InsightKind::ProfitMargin => Scenario::ProfitMargin,
            InsightKind::HiringImpact => {
                let annual_salary = self.annual_salary.ok_or_else(|| {
                    InsightError::InvalidRequest(
                        "annualSalary is required for hiring_impact".to_string(),
                    )
                })?;
                if !annual_salary.is_finite() || annual_salary < 0.0 {
                    return Err(InsightError::InvalidRequest(format!(
                        "annualSalary must be a non-negative number, got {}",
                        annual_salary
                    )));
                }
                Scenario::Hiring { annual_salary }
            }
            InsightKind::Custom => match &self.question {
                Some(question) if !question.trim().is_empty() => Scenario::Custom {
                    question: question.clone(),
                },
                _ => {
                    return Err(InsightError::InvalidRequest(
                        "question is required for custom insights".to_string(),
                    ))
                }
            },
        };
        Ok(Plan::Single(scenario))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashRunwayPayload {
    pub cash_balance: f64,
    pub net_burn: f64,
    pub runway_months: Runway,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BurnRatePayload {
    pub monthly_revenue: f64,
    pub monthly_expenses: f64,
    pub net_burn: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfitMarginPayload {
    pub monthly_revenue: f64,
    pub monthly_expenses: f64,
    pub profit_margin_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomPayload {
    pub question: String,
    pub metrics: CanonicalMetrics,
    pub indicators: DerivedIndicators,
}

/// The exact numbers a narrative is allowed to reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum NumericPayload {
    CashRunway(CashRunwayPayload),
    BurnRate(BurnRatePayload),
    ProfitMargin(ProfitMarginPayload),
    HiringImpact(HiringImpact),
    Custom(CustomPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightResult {
    pub kind: InsightKind,
    pub title: String,
    pub narrative_text: String,
    pub numeric_payload: NumericPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Received,
    MetricsBuilt,
    Derived,
    Narrated,
    Packaged,
}

enum Plan {
    Single(Scenario),
    Overview,
}

#[derive(Debug, Clone)]
enum Scenario {
    CashRunway,
    BurnRate,
    ProfitMargin,
    Hiring { annual_salary: f64 },
    Custom { question: String },
}

impl Scenario {
    fn kind(&self) -> InsightKind {
        match self {
            Scenario::CashRunway => InsightKind::CashRunway,
            Scenario::BurnRate => InsightKind::BurnRate,
            Scenario::ProfitMargin => InsightKind::ProfitMargin,
            Scenario::Hiring { .. } => InsightKind::HiringImpact,
            Scenario::Custom { .. } => InsightKind::Custom,
        }
    }

    fn derive(&self, metrics: &CanonicalMetrics) -> NumericPayload {
        let indicators = DerivedIndicators::from_metrics(metrics);
        match self {
            Scenario::CashRunway => NumericPayload::CashRunway(CashRunwayPayload {
                cash_balance: metrics.cash_balance,
                net_burn: indicators.net_burn,
                runway_months: indicators.runway_months,
            }),
            Scenario::BurnRate => NumericPayload::BurnRate(BurnRatePayload {
                monthly_revenue: metrics.monthly_revenue,
                monthly_expenses: metrics.monthly_expenses,
                net_burn: indicators.net_burn,
            }),
            Scenario::ProfitMargin => NumericPayload::ProfitMargin(ProfitMarginPayload {
                monthly_revenue: metrics.monthly_revenue,
                monthly_expenses: metrics.monthly_expenses,
                profit_margin_pct: indicators.profit_margin_pct,
            }),
            Scenario::Hiring { annual_salary } => {
                NumericPayload::HiringImpact(hiring_impact(metrics, *annual_salary))
            }
            Scenario::Custom { question } => NumericPayload::Custom(CustomPayload {
                question: question.clone(),
                metrics: *metrics,
                indicators,
            }),
        }
    }
}

/// Builds metrics, derives indicators and narrates them for one request.
pub struct InsightOrchestrator<F, N> {
    fetcher: F,
    narrator: N,
    labels: ReportLabels,
}

impl<F: ReportFetcher, N: NarrativeGenerator> InsightOrchestrator<F, N> {
    pub fn new(fetcher: F, narrator: N, config: &EngineConfig) -> Self {
        Self {
            fetcher,
            narrator,
            labels: config.labels.clone(),
        }
    }

    /// Fetches fresh metrics for `account_id` and produces the requested insights.
    ///
    /// Invalid requests fail before any fetch; a failed fetch fails the request.
    pub async fn generate(
        &self,
        provider: Provider,
        account_id: &str,
        request: &InsightRequest,
        today: NaiveDate,
    ) -> Result<Vec<InsightResult>> {
        info!(
            "Insight request '{}' for {} account {}",
            request.kind, provider, account_id
        );
        let plan = request.plan()?;
        log_stage(request.kind, Stage::Received);

        let snapshot = MetricsBuilder::new(&self.fetcher, self.labels.clone())
            .build(provider, account_id, today)
            .await?;
        log_stage(request.kind, Stage::MetricsBuilt);

        Ok(self.execute(plan, &snapshot).await)
    }

    /// Produces insights from an already-built snapshot.
    pub async fn generate_from_snapshot(
        &self,
        snapshot: &MetricsSnapshot,
        request: &InsightRequest,
    ) -> Result<Vec<InsightResult>> {
        let plan = request.plan()?;
        log_stage(request.kind, Stage::Received);
        Ok(self.execute(plan, snapshot).await)
    }

    async fn execute(&self, plan: Plan, snapshot: &MetricsSnapshot) -> Vec<InsightResult> {
        match plan {
            Plan::Single(scenario) => vec![self.produce(&scenario, snapshot).await],
            Plan::Overview => {
                let (runway, burn, margin) = futures::join!(
                    self.produce(&Scenario::CashRunway, snapshot),
                    self.produce(&Scenario::BurnRate, snapshot),
                    self.produce(&Scenario::ProfitMargin, snapshot),
                );
                vec![runway, burn, margin]
            }
        }
    }

    async fn produce(&self, scenario: &Scenario, snapshot: &MetricsSnapshot) -> InsightResult {
        let kind = scenario.kind();

        let numeric_payload = scenario.derive(&snapshot.metrics);
        log_stage(kind, Stage::Derived);

        let prompt = build_prompt(kind, snapshot, &numeric_payload);
        let narrative_text = narrate(&self.narrator, &prompt).await;
        log_stage(kind, Stage::Narrated);

        let result = InsightResult {
            kind,
            title: kind.title().to_string(),
            narrative_text,
            numeric_payload,
        };
        log_stage(kind, Stage::Packaged);
        result
    }
}

fn log_stage(kind: InsightKind, stage: Stage) {
    debug!("Insight '{}' -> {:?}", kind, stage);
}
