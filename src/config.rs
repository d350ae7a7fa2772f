use crate::error::{InsightError, Result};
use serde::{Deserialize, Serialize};

pub const QUICKBOOKS_BASE_URL: &str = "https://quickbooks.api.intuit.com";
pub const XERO_BASE_URL: &str = "https://api.xero.com";

/// Engine configuration, deserialized from JSON and passed explicitly into
/// adapters and clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub labels: ReportLabels,
    #[serde(default)]
    pub quickbooks: Option<QuickBooksConfig>,
    #[serde(default)]
    pub xero: Option<XeroConfig>,
}

/// Line-item labels and section titles each provider's strategy searches for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLabels {
    pub quickbooks_revenue: String,
    pub quickbooks_expenses: String,
    pub quickbooks_cash: String,
    pub xero_revenue: String,
    pub xero_expenses: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            quickbooks_revenue: "Total Income".to_string(),
            quickbooks_expenses: "Total Expenses".to_string(),
            quickbooks_cash: "Cash and cash equivalents".to_string(),
            xero_revenue: "Income".to_string(),
            xero_expenses: "Less Operating Expenses".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickBooksConfig {
    #[serde(default = "default_quickbooks_base_url")]
    pub base_url: String,
    pub realm_id: String,
    #[serde(default = "default_minor_version")]
    pub minor_version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XeroConfig {
    #[serde(default = "default_xero_base_url")]
    pub base_url: String,
    pub tenant_id: String,
}

fn default_quickbooks_base_url() -> String {
    QUICKBOOKS_BASE_URL.to_string()
}

fn default_xero_base_url() -> String {
    XERO_BASE_URL.to_string()
}

fn default_minor_version() -> u32 {
    65
}

impl EngineConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let labels = [
            ("quickbooks_revenue", &self.labels.quickbooks_revenue),
            ("quickbooks_expenses", &self.labels.quickbooks_expenses),
            ("quickbooks_cash", &self.labels.quickbooks_cash),
            ("xero_revenue", &self.labels.xero_revenue),
            ("xero_expenses", &self.labels.xero_expenses),
        ];
        for (name, value) in labels {
            if value.trim().is_empty() {
                return Err(InsightError::Config(format!("label '{}' is empty", name)));
            }
        }

        if let Some(qb) = &self.quickbooks {
            if qb.realm_id.trim().is_empty() {
                return Err(InsightError::Config(
                    "quickbooks.realm_id is empty".to_string(),
                ));
            }
        }

        if let Some(xero) = &self.xero {
            if xero.tenant_id.trim().is_empty() {
                return Err(InsightError::Config("xero.tenant_id is empty".to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_default_labels() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config.labels, ReportLabels::default());
        assert!(config.quickbooks.is_none());
    }

    #[test]
    fn test_partial_labels_keep_remaining_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{"labels": {"xero_revenue": "Trading Income"},
                "quickbooks": {"realm_id": "9130"}}"#,
        )
        .unwrap();
        assert_eq!(config.labels.xero_revenue, "Trading Income");
        assert_eq!(config.labels.quickbooks_cash, "Cash and cash equivalents");

        let qb = config.quickbooks.unwrap();
        assert_eq!(qb.base_url, QUICKBOOKS_BASE_URL);
        assert_eq!(qb.minor_version, 65);
    }

    #[test]
    fn test_blank_label_is_rejected() {
        let err = EngineConfig::from_json_str(r#"{"labels": {"quickbooks_cash": " "}}"#)
            .unwrap_err();
        assert!(matches!(err, InsightError::Config(_)));
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = EngineConfig::from_json_str("{labels").unwrap_err();
        assert!(matches!(err, InsightError::Serialization(_)));
    }
}
