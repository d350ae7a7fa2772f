//! Indicators derived from [`CanonicalMetrics`].
//!
//! Everything here is pure: inputs are borrowed, never modified.

use crate::metrics::CanonicalMetrics;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Runway value reported when the business is not burning cash.
pub const RUNWAY_SENTINEL: i64 = 999;

/// Months of runway, or `Profitable` when net burn is zero or negative.
///
/// Serializes as a bare integer, with `Profitable` written as
/// [`RUNWAY_SENTINEL`] for consumers keyed on that value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runway {
    Months(i64),
    Profitable,
}

impl Runway {
    pub fn as_months(self) -> i64 {
        match self {
            Runway::Months(months) => months,
            Runway::Profitable => RUNWAY_SENTINEL,
        }
    }

    pub fn is_profitable(self) -> bool {
        matches!(self, Runway::Profitable)
    }
}

impl From<i64> for Runway {
    fn from(months: i64) -> Self {
        if months == RUNWAY_SENTINEL {
            Runway::Profitable
        } else {
            Runway::Months(months)
        }
    }
}

impl Serialize for Runway {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_months())
    }
}

impl<'de> Deserialize<'de> for Runway {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Runway::from)
    }
}

impl JsonSchema for Runway {
    fn schema_name() -> String {
        "Runway".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        i64::json_schema(gen)
    }
}

/// Net burn, runway and margin for one set of canonical metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DerivedIndicators {
    pub net_burn: f64,
    pub runway_months: Runway,
    pub profit_margin_pct: f64,
}

impl DerivedIndicators {
    pub fn from_metrics(metrics: &CanonicalMetrics) -> Self {
        let burn = net_burn(metrics.monthly_revenue, metrics.monthly_expenses);
        Self {
            net_burn: burn,
            runway_months: runway(metrics.cash_balance, burn),
            profit_margin_pct: profit_margin(metrics.monthly_revenue, metrics.monthly_expenses),
        }
    }
}

/// Positive when the business is losing cash.
pub fn net_burn(revenue: f64, expenses: f64) -> f64 {
    expenses - revenue
}

pub fn runway(cash_balance: f64, net_burn: f64) -> Runway {
    if net_burn > 0.0 {
        Runway::Months((cash_balance / net_burn).floor() as i64)
    } else {
        Runway::Profitable
    }
}

/// Percentage of revenue kept after expenses; `0` without positive revenue.
pub fn profit_margin(revenue: f64, expenses: f64) -> f64 {
    if revenue > 0.0 {
        (revenue - expenses) / revenue * 100.0
    } else {
        0.0
    }
}

/// What-if overlay for adding one salaried hire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HiringImpact {
    pub annual_salary: f64,
    pub monthly_cost: f64,
    pub current_expenses: f64,
    pub new_expenses: f64,
    pub current_net_burn: f64,
    pub new_net_burn: f64,
    pub current_runway: Runway,
    pub new_runway: Runway,
}

pub fn hiring_impact(metrics: &CanonicalMetrics, annual_salary: f64) -> HiringImpact {
    let monthly_cost = annual_salary / 12.0;
    let current = DerivedIndicators::from_metrics(metrics);

    let new_expenses = metrics.monthly_expenses + monthly_cost;
    let new_net_burn = net_burn(metrics.monthly_revenue, new_expenses);

    HiringImpact {
        annual_salary,
        monthly_cost,
        current_expenses: metrics.monthly_expenses,
        new_expenses,
        current_net_burn: current.net_burn,
        new_net_burn,
        current_runway: current.runway_months,
        new_runway: runway(metrics.cash_balance, new_net_burn),
    }
}
