//! # Financial Insight Engine
//!
//! Reduces QuickBooks and Xero reports to a canonical set of metrics and derives
//! the indicators small-business owners ask about: runway, burn, margin and the
//! cost of a new hire.
//!
//! ## Core Concepts
//!
//! - **Report Tree**: both providers' nested JSON reports normalized into one shape
//! - **Extraction Strategy**: first-match lookup (QuickBooks) or section sum (Xero)
//! - **Canonical Metrics**: cash as of today, revenue and expenses of the prior complete month
//! - **Derived Indicators**: net burn, runway (999 = not burning cash), profit margin
//! - **Insights**: derived numbers packaged with narrative text from an external generator
//!
//! Missing line items read as `0`. Failed report fetches fail the whole request.
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_insight_engine::*;
//! use chrono::Local;
//!
//! let orchestrator = InsightOrchestrator::new(fetcher, narrator, &EngineConfig::default());
//! let results = orchestrator
//!     .generate(
//!         Provider::Xero,
//!         "tenant-id",
//!         &InsightRequest::new(InsightKind::All),
//!         Local::now().date_naive(),
//!     )
//!     .await?;
//!
//! for insight in results {
//!     println!("{}: {}", insight.title, insight.narrative_text);
//! }
//! ```

pub mod config;
pub mod derivation;
pub mod error;
pub mod extractor;
pub mod insight;
pub mod llm;
pub mod metrics;
pub mod providers;
pub mod report;
pub mod utils;

pub use config::{EngineConfig, QuickBooksConfig, ReportLabels, XeroConfig};
pub use derivation::{
    hiring_impact, net_burn, profit_margin, runway, DerivedIndicators, HiringImpact, Runway,
    RUNWAY_SENTINEL,
};
pub use error::{FetchError, InsightError, NarrativeError, Result};
pub use extractor::{extract_flat, extract_nested, sum_section, ExtractionStrategy};
pub use insight::{
    BurnRatePayload, CashRunwayPayload, CustomPayload, InsightKind, InsightOrchestrator,
    InsightRequest, InsightResult, NumericPayload, ProfitMarginPayload,
};
pub use llm::{NarrativeGenerator, PromptContext, FALLBACK_NARRATIVE};
pub use metrics::{CanonicalMetrics, MetricsBuilder, MetricsSnapshot};
pub use providers::{
    PeriodTotals, Provider, QuickBooksAdapter, ReportFetcher, ReportKind, XeroAdapter,
};
pub use report::{Cell, ReportTree, Section, SectionBody};
pub use utils::DateRange;

#[cfg(feature = "http")]
pub use providers::http::{QuickBooksClient, XeroClient};

#[cfg(feature = "gemini")]
pub use llm::GeminiNarrator;
