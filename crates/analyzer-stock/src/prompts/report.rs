//! Report brief sent as the user message

use super::render;
use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::snapshot::{BriefInfo, StockSnapshot};
use crate::tables::{self, TableStyle, display_value};
use analyzer_utils::truncate_with_ellipsis;
use serde::Serialize;

/// User message template
pub const REPORT_TEMPLATE: &str = r#"You are an expert financial analyst. Your task is to generate a comprehensive investment report for {{ company_name }} ({{ ticker }}).
Use the provided stock data and recent web search information.

**Provided Stock Data:**
Company: {{ company_name }} ({{ ticker }})
Sector: {{ sector }}
Industry: {{ industry }}
Business Summary: {{ summary }}

Key Financial Info:
{{ brief_info }}

Recent Price Trend (Last {{ recent_rows }} days of {{ history_range }} history):
{{ price_trend }}

Major Holders:
{{ major_holders }}

Analyst Recommendations (Recent):
{{ recommendations }}

Quarterly Financials Summary:
Income Statement (Recent {{ statement_quarters }} Qtrs):
{{ income_statement }}

Balance Sheet (Recent {{ statement_quarters }} Qtrs):
{{ balance_sheet }}

Cash Flow (Recent {{ statement_quarters }} Qtrs):
{{ cash_flow }}

**Recent Web Search Snippets/Information:**
{% for item in web_results %}- {{ item }}
{% endfor %}
**Report Requirements (Please structure your report with these sections in Markdown format):**

1.  **Company Overview:**
    * Brief description of the company, its core business, and market position.
    * Mention its sector and industry.

2.  **Financial Analysis:**
    * Comment on the key financial indicators provided (e.g., P/E ratios, market cap, dividend yield if available).
    * Analyze the recent price trend (from the {{ history_range }} history snapshot).
    * Discuss insights from the quarterly financial statements (income, balance sheet, cash flow).
    * Mention any insights from major holders and analyst recommendations.

3.  **Market Sentiment and News Analysis:**
    * Synthesize insights from the web search snippets.
    * Discuss any recent news, events, or market sentiment that could impact the stock.
    * (If web search snippets are limited, acknowledge this and focus on general market conditions for the sector if possible).

4.  **Risk Assessment:**
    * Identify potential risks associated with investing in this stock (e.g., industry risks, company-specific risks, market volatility).

5.  **Opportunities and Growth Drivers:**
    * Identify potential opportunities or growth drivers for the company.

6.  **Investment Outlook Summary:**
    * Provide a balanced summary of the findings.
    * Conclude with a general outlook for the stock.
    * **Important: Do NOT provide direct financial advice (e.g., "buy," "sell," "hold"). Instead, offer an objective summary of potential upsides and downsides based on the data.**

Please generate a detailed and well-structured report in Markdown.
If some data is "Not available" or "Error fetching", acknowledge it and proceed with the available information."#;

/// Values substituted into [`REPORT_TEMPLATE`]
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext {
    pub company_name: String,
    pub ticker: String,
    pub sector: String,
    pub industry: String,
    pub summary: String,
    pub brief_info: String,
    pub recent_rows: usize,
    pub history_range: String,
    pub price_trend: String,
    pub major_holders: String,
    pub recommendations: String,
    pub statement_quarters: usize,
    pub income_statement: String,
    pub balance_sheet: String,
    pub cash_flow: String,
    pub web_results: Vec<String>,
}

impl ReportContext {
    pub fn new(snapshot: &StockSnapshot, web_results: &[String], config: &AnalyzerConfig) -> Self {
        let recent = snapshot.recent_history(config.recent_rows);
        let price_trend = if recent.is_empty() {
            "Price history not available.".to_string()
        } else {
            tables::price_rows(recent, TableStyle::Plain).to_string()
        };

        Self {
            company_name: snapshot.company_name.clone(),
            ticker: snapshot.ticker.clone(),
            sector: snapshot.sector.clone(),
            industry: snapshot.industry.clone(),
            summary: truncate_with_ellipsis(&snapshot.summary, config.summary_max_chars),
            brief_info: aligned_pairs(&snapshot.info),
            recent_rows: config.recent_rows,
            history_range: config.history_range.clone(),
            price_trend,
            major_holders: tables::major_holders(&snapshot.major_holders, TableStyle::Plain),
            recommendations: tables::recommendations(&snapshot.recommendations, TableStyle::Plain),
            statement_quarters: config.statement_quarters,
            income_statement: tables::statement(
                &snapshot.financials.income_statement,
                TableStyle::Plain,
            ),
            balance_sheet: tables::statement(&snapshot.financials.balance_sheet, TableStyle::Plain),
            cash_flow: tables::statement(&snapshot.financials.cash_flow, TableStyle::Plain),
            web_results: web_results.to_vec(),
        }
    }
}

/// One `key   value` line per field, values aligned
fn aligned_pairs(info: &BriefInfo) -> String {
    let width = info.entries().map(|(k, _)| k.len()).max().unwrap_or(0);
    info.entries()
        .map(|(key, value)| format!("{key:<width$}    {}", display_value(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the user message for a snapshot
pub fn render_report_prompt(
    snapshot: &StockSnapshot,
    web_results: &[String],
    config: &AnalyzerConfig,
) -> Result<String> {
    render(REPORT_TEMPLATE, &ReportContext::new(snapshot, web_results, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Fetched, FinancialsSummary};
    use serde_json::{Map, json};

    fn snapshot(summary: &str) -> StockSnapshot {
        let mut info = Map::new();
        info.insert("symbol".to_string(), json!("MSFT"));
        info.insert("marketCap".to_string(), json!(3_100_000_000_000_u64));
        StockSnapshot {
            ticker: "MSFT".to_string(),
            company_name: "Microsoft Corporation".to_string(),
            info: BriefInfo::from_full_info(&info),
            full_info: info,
            sector: "Technology".to_string(),
            industry: "Software - Infrastructure".to_string(),
            summary: summary.to_string(),
            history: Vec::new(),
            major_holders: Fetched::Empty,
            recommendations: Fetched::Failed("HTTP 500".to_string()),
            financials: FinancialsSummary {
                income_statement: Fetched::Empty,
                balance_sheet: Fetched::Failed("timeout".to_string()),
                cash_flow: Fetched::Empty,
            },
        }
    }

    #[test]
    fn test_prompt_embeds_stock_data() {
        let web = vec!["Earnings beat estimates".to_string(), "New datacenter".to_string()];
        let prompt =
            render_report_prompt(&snapshot("Builds software."), &web, &AnalyzerConfig::default())
                .unwrap();

        assert!(prompt.starts_with(
            "You are an expert financial analyst. Your task is to generate a comprehensive investment report for Microsoft Corporation (MSFT)."
        ));
        assert!(prompt.contains("Sector: Technology"));
        assert!(prompt.contains("Business Summary: Builds software...."));
        assert!(prompt.contains("3100000000000"));
        assert!(prompt.contains("Price history not available."));
        assert!(prompt.contains("Not available or error fetching."));
        assert!(prompt.contains("Error fetching."));
        assert!(prompt.contains("- Earnings beat estimates\n- New datacenter\n"));
        assert!(prompt.contains("6.  **Investment Outlook Summary:**"));
        assert!(prompt.contains("Do NOT provide direct financial advice"));
    }

    #[test]
    fn test_summary_is_truncated() {
        let long = "x".repeat(1500);
        let context = ReportContext::new(&snapshot(&long), &[], &AnalyzerConfig::default());
        assert_eq!(context.summary.chars().count(), 1003);
        assert!(context.summary.ends_with("..."));
    }

    #[test]
    fn test_brief_info_is_aligned() {
        let lines = aligned_pairs(&snapshot("").info);
        let symbol = lines.lines().next().unwrap();
        let opinions = lines.lines().last().unwrap();
        assert!(symbol.starts_with("symbol "));
        assert!(symbol.ends_with("MSFT"));
        assert!(opinions.ends_with("N/A"));
        // Values start in the same column
        assert_eq!(symbol.find("MSFT"), opinions.find("N/A"));
    }

    #[test]
    fn test_no_web_results_leaves_section_empty() {
        let prompt = render_report_prompt(&snapshot(""), &[], &AnalyzerConfig::default()).unwrap();
        assert!(prompt.contains(
            "**Recent Web Search Snippets/Information:**\n\n**Report Requirements"
        ));
    }
}
