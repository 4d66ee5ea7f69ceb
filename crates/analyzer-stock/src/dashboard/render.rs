//! Text rendering of an analysis

use super::chart::line_chart;
use super::{AnalysisView, ReportOutcome, Tab};
use crate::config::AnalyzerConfig;
use crate::snapshot::StatementKind;
use crate::tables::{self, TableStyle};
use std::fmt::Write;

const CHART_WIDTH: usize = 72;
const CHART_HEIGHT: usize = 12;

pub const GROQ_CONSOLE_URL: &str = "https://console.groq.com/keys";
pub const DISCLAIMER: &str =
    "Note: Financial data provided is for informational purposes only and not investment advice.";

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}\n{}", "─".repeat(title.chars().count()));
}

fn tab_banner(out: &mut String, tab: Tab) {
    let title = tab.to_string();
    let _ = writeln!(out, "\n╔══ {title} ══");
}

/// The configuration block shown before any analysis
pub fn status_block(config: &AnalyzerConfig) -> String {
    let mut out = String::from("Configuration\n");
    if config.has_api_key() {
        out.push_str("  ✅ Groq API Key loaded.\n");
        let _ = writeln!(out, "  Model: {} (temperature {})", config.model, config.temperature);
    } else {
        out.push_str(
            "  ⚠️  Groq API Key not found. Please set the `GROQ_API_KEY` environment variable.\n",
        );
        let _ = writeln!(
            out,
            "  You can get a free API key from Groq Console: {GROQ_CONSOLE_URL}"
        );
    }
    out.push('\n');
    out.push_str(DISCLAIMER);
    out.push('\n');
    out
}

/// Title for the price tab, e.g. "1-Year Stock Price History"
fn history_title(range: &str) -> String {
    let label = match range {
        "1d" => "1-Day",
        "5d" => "5-Day",
        "1mo" => "1-Month",
        "3mo" => "3-Month",
        "6mo" => "6-Month",
        "1y" => "1-Year",
        "2y" => "2-Year",
        "5y" => "5-Year",
        "10y" => "10-Year",
        "ytd" => "Year-to-Date",
        "max" => "All-Time",
        other => return format!("Stock Price History ({other})"),
    };
    format!("{label} Stock Price History")
}

pub(super) fn header(view: &AnalysisView) -> String {
    let title = format!(
        "Analysis for: {} ({})",
        view.snapshot.company_name, view.snapshot.ticker
    );
    format!("{title}\n{}\n", "═".repeat(title.chars().count()))
}

pub(super) fn tab(view: &AnalysisView, tab: Tab) -> String {
    let mut out = String::new();
    tab_banner(&mut out, tab);
    match tab {
        Tab::Overview => overview(view, &mut out),
        Tab::PriceHistory => price_history(view, &mut out),
        Tab::Financials => financials(view, &mut out),
        Tab::WebSearch => web_search(view, &mut out),
    }
    out
}

fn overview(view: &AnalysisView, out: &mut String) {
    let snapshot = &view.snapshot;
    heading(out, "Company Information");
    let _ = writeln!(out, "{}", tables::brief_info(&snapshot.info, TableStyle::Boxed));
    heading(out, "Business Summary");
    let _ = writeln!(out, "{}", snapshot.summary);
    heading(out, "Sector & Industry");
    let _ = writeln!(out, "Sector: {}", snapshot.sector);
    let _ = writeln!(out, "Industry: {}", snapshot.industry);
}

fn price_history(view: &AnalysisView, out: &mut String) {
    heading(out, &history_title(&view.history_range));
    let closes: Vec<f64> = view.snapshot.history.iter().map(|p| p.close).collect();
    let Some(chart) = line_chart(&closes, CHART_WIDTH, CHART_HEIGHT) else {
        out.push_str("Price history not available.\n");
        return;
    };
    let _ = writeln!(out, "Close\n{chart}\n");
    let recent = view.snapshot.recent_history(view.recent_rows);
    let _ = writeln!(out, "{}", tables::price_rows(recent, TableStyle::Boxed));
}

fn financials(view: &AnalysisView, out: &mut String) {
    let snapshot = &view.snapshot;
    heading(out, "Quarterly Financials Summary");
    for kind in StatementKind::ALL {
        let _ = writeln!(out, "{} (Recent):", kind.title());
        let _ = writeln!(
            out,
            "{}\n",
            tables::statement(snapshot.financials.get(kind), TableStyle::Boxed)
        );
    }
    heading(out, "Major Holders");
    let _ = writeln!(
        out,
        "{}",
        tables::major_holders(&snapshot.major_holders, TableStyle::Boxed)
    );
    heading(out, "Analyst Recommendations (Recent)");
    let _ = writeln!(
        out,
        "{}",
        tables::recommendations(&snapshot.recommendations, TableStyle::Boxed)
    );
}

fn web_search(view: &AnalysisView, out: &mut String) {
    heading(out, "Simulated Web Search Results");
    if view.web_results.is_empty() {
        out.push_str("No web search results to display.\n");
        return;
    }
    for (i, result) in view.web_results.iter().enumerate() {
        let _ = writeln!(out, "Result {}:\n{result}\n---", i + 1);
    }
}

pub(super) fn report(view: &AnalysisView) -> String {
    let mut out = String::new();
    heading(&mut out, "🤖 AI Generated Report");
    match &view.report {
        ReportOutcome::Generated(text) => out.push_str(text),
        ReportOutcome::Failed(reason) => {
            let _ = write!(out, "Failed to generate report: {reason}");
        }
        ReportOutcome::Skipped => out.push_str("Report generation skipped."),
    }
    out.push('\n');
    out
}

pub(super) fn raw_info(view: &AnalysisView) -> String {
    let mut out = String::new();
    heading(&mut out, "Full Raw Stock Info");
    let dump = serde_json::to_string_pretty(&view.snapshot.full_info)
        .unwrap_or_else(|e| format!("<could not serialize: {e}>"));
    out.push_str(&dump);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_block_without_key() {
        let block = status_block(&AnalyzerConfig::default());
        assert!(block.contains("Groq API Key not found"));
        assert!(block.contains(GROQ_CONSOLE_URL));
        assert!(block.contains(DISCLAIMER));
    }

    #[test]
    fn test_status_block_with_key() {
        let config = AnalyzerConfig::builder()
            .groq_api_key("gsk_test")
            .build()
            .unwrap();
        let block = status_block(&config);
        assert!(block.contains("Groq API Key loaded."));
        assert!(block.contains("moonshotai/kimi-k2-instruct"));
        assert!(!block.contains("gsk_test"));
    }

    #[test]
    fn test_history_title() {
        assert_eq!(history_title("1y"), "1-Year Stock Price History");
        assert_eq!(history_title("ytd"), "Year-to-Date Stock Price History");
    }
}
