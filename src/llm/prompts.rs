//! Prompts for the narrative generator, one per insight kind.

use crate::derivation::{HiringImpact, Runway};
use crate::insight::{
    BurnRatePayload, CashRunwayPayload, CustomPayload, InsightKind, NumericPayload,
    ProfitMarginPayload,
};
use crate::llm::narrator::PromptContext;
use crate::metrics::MetricsSnapshot;

pub const SYSTEM_PROMPT: &str = r#"
You are a financial advisor writing for the owner of a small business.

## RULES
- Use ONLY the figures listed under "FIGURES".
- Do not invent, estimate or recompute numbers.
- Amounts are in the business's own currency. Do not add or convert currency symbols.
- A runway marked "(profitable, not burning cash)" means the business is not burning cash.
  Describe it as profitable. Report any other runway in months exactly as given.
- Write 2-4 short sentences of plain prose. No headings, no bullet points, no markdown.
- End with one concrete, practical suggestion.
"#;

pub fn build_prompt(
    kind: InsightKind,
    snapshot: &MetricsSnapshot,
    payload: &NumericPayload,
) -> PromptContext {
    let figures = match payload {
        NumericPayload::CashRunway(p) => cash_runway_figures(p),
        NumericPayload::BurnRate(p) => burn_rate_figures(p),
        NumericPayload::ProfitMargin(p) => profit_margin_figures(p),
        NumericPayload::HiringImpact(p) => hiring_figures(p),
        NumericPayload::Custom(p) => custom_figures(p),
    };

    let task = match payload {
        NumericPayload::Custom(p) => format!(
            "Answer the owner's question using the figures.\nQUESTION: {}",
            p.question
        ),
        _ => task_for(kind).to_string(),
    };

    let user = format!(
        "{}\n\n## FIGURES (prior month {}, cash as of {})\n{}\n\n\
         ## MONTH TO DATE (partial, context only)\n- Revenue: {}\n- Expenses: {}",
        task,
        snapshot.prior_month,
        snapshot.as_of.format("%Y-%m-%d"),
        figures,
        format_amount(snapshot.month_to_date.revenue),
        format_amount(snapshot.month_to_date.expenses),
    );

    PromptContext {
        system: SYSTEM_PROMPT.trim().to_string(),
        user,
    }
}

fn task_for(kind: InsightKind) -> &'static str {
    match kind {
        InsightKind::CashRunway => {
            "Explain how long the business's cash will last at its current burn."
        }
        InsightKind::BurnRate => "Explain the business's monthly net cash burn and what drives it.",
        InsightKind::ProfitMargin => "Explain the business's profit margin for the month.",
        InsightKind::HiringImpact => {
            "Explain how hiring one more employee at the given salary changes the runway."
        }
        InsightKind::Custom | InsightKind::All => "Summarize the business's financial position.",
    }
}

fn runway_line(label: &str, runway: Runway) -> String {
    match runway {
        Runway::Profitable => format!("- {}: profitable, not burning cash", label),
        Runway::Months(months) => format!("- {}: {} months", label, months),
    }
}

fn cash_runway_figures(p: &CashRunwayPayload) -> String {
    [
        format!("- Cash balance: {}", format_amount(p.cash_balance)),
        format!("- Net burn per month: {}", format_amount(p.net_burn)),
        runway_line("Runway", p.runway_months),
    ]
    .join("\n")
}

fn burn_rate_figures(p: &BurnRatePayload) -> String {
    [
        format!("- Monthly revenue: {}", format_amount(p.monthly_revenue)),
        format!("- Monthly expenses: {}", format_amount(p.monthly_expenses)),
        format!("- Net burn per month: {}", format_amount(p.net_burn)),
    ]
    .join("\n")
}

fn profit_margin_figures(p: &ProfitMarginPayload) -> String {
    [
        format!("- Monthly revenue: {}", format_amount(p.monthly_revenue)),
        format!("- Monthly expenses: {}", format_amount(p.monthly_expenses)),
        format!("- Profit margin: {:.1}%", p.profit_margin_pct),
    ]
    .join("\n")
}

fn hiring_figures(p: &HiringImpact) -> String {
    [
        format!("- Annual salary of the new hire: {}", format_amount(p.annual_salary)),
        format!("- Monthly cost of the new hire: {}", format_amount(p.monthly_cost)),
        format!("- Monthly expenses now: {}", format_amount(p.current_expenses)),
        format!("- Monthly expenses after hiring: {}", format_amount(p.new_expenses)),
        format!("- Net burn now: {}", format_amount(p.current_net_burn)),
        format!("- Net burn after hiring: {}", format_amount(p.new_net_burn)),
        runway_line("Runway now", p.current_runway),
        runway_line("Runway after hiring", p.new_runway),
    ]
    .join("\n")
}

fn custom_figures(p: &CustomPayload) -> String {
    [
        format!("- Cash balance: {}", format_amount(p.metrics.cash_balance)),
        format!("- Monthly revenue: {}", format_amount(p.metrics.monthly_revenue)),
        format!("- Monthly expenses: {}", format_amount(p.metrics.monthly_expenses)),
        format!("- Net burn per month: {}", format_amount(p.indicators.net_burn)),
        runway_line("Runway", p.indicators.runway_months),
        format!("- Profit margin: {:.1}%", p.indicators.profit_margin_pct),
    ]
    .join("\n")
}

/// `1234567.891` -> `"1,234,567.89"`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}
