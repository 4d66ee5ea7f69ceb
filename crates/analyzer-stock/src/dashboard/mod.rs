//! Terminal dashboard
//!
//! One [`Dashboard::analyze`] call is one click of "Analyze Stock": fetch,
//! search, report. The resulting [`AnalysisView`] is rendered per tab or as
//! JSON.

mod chart;
mod render;
mod tabs;

pub use chart::line_chart;
pub use render::{DISCLAIMER, GROQ_CONSOLE_URL, status_block};
pub use tabs::Tab;

use crate::api::YahooFinanceClient;
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::fetcher::StockDataFetcher;
use crate::report::ReportGenerator;
use crate::search::{SimulatedWebSearch, WebSearch};
use crate::snapshot::StockSnapshot;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Per-analysis switches
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Ask the model for a report
    pub generate_report: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            generate_report: true,
        }
    }
}

/// What became of the report request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum ReportOutcome {
    Generated(String),
    /// The error message, shown in place of the report
    Failed(String),
    Skipped,
}

/// Pipeline stage, announced before it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Fetching { ticker: String },
    Searching { company: String },
    Generating,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetching { ticker } => write!(f, "Fetching data for {ticker}..."),
            Stage::Searching { company } => write!(f, "Searching web for {company}..."),
            Stage::Generating => f.write_str("Generating report with LLM... This may take a moment."),
        }
    }
}

/// Everything shown for one analysis
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub snapshot: StockSnapshot,
    pub web_results: Vec<String>,
    pub report: ReportOutcome,
    #[serde(skip)]
    history_range: String,
    #[serde(skip)]
    recent_rows: usize,
}

impl AnalysisView {
    pub fn new(
        snapshot: StockSnapshot,
        web_results: Vec<String>,
        report: ReportOutcome,
        config: &AnalyzerConfig,
    ) -> Self {
        Self {
            snapshot,
            web_results,
            report,
            history_range: config.history_range.clone(),
            recent_rows: config.recent_rows,
        }
    }

    /// Header, the requested tabs (all when empty), the report and optionally
    /// the raw profile dump
    pub fn render(&self, tabs: &[Tab], include_raw: bool) -> String {
        let mut out = render::header(self);
        let tabs = if tabs.is_empty() { &Tab::ALL[..] } else { tabs };
        for tab in tabs {
            out.push_str(&render::tab(self, *tab));
        }
        out.push_str(&render::report(self));
        if include_raw {
            out.push_str(&self.render_raw());
        }
        out
    }

    /// A single tab
    pub fn render_tab(&self, tab: Tab) -> String {
        render::tab(self, tab)
    }

    /// The flattened profile as pretty JSON
    pub fn render_raw(&self) -> String {
        render::raw_info(self)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Fetch, search and report pipeline behind the terminal UI
pub struct Dashboard {
    fetcher: StockDataFetcher,
    search: Arc<dyn WebSearch>,
    reporter: ReportGenerator,
    config: Arc<AnalyzerConfig>,
}

impl Dashboard {
    pub fn new(
        fetcher: StockDataFetcher,
        search: Arc<dyn WebSearch>,
        reporter: ReportGenerator,
        config: Arc<AnalyzerConfig>,
    ) -> Self {
        Self {
            fetcher,
            search,
            reporter,
            config,
        }
    }

    /// Yahoo Finance, the simulated search and Groq
    pub fn from_config(config: AnalyzerConfig) -> Result<Self> {
        let config = Arc::new(config);
        let yahoo = YahooFinanceClient::new(config.request_timeout)?;
        let fetcher = StockDataFetcher::new(Arc::new(yahoo), Arc::clone(&config));
        let reporter = ReportGenerator::from_config(Arc::clone(&config))?;
        Ok(Self::new(
            fetcher,
            Arc::new(SimulatedWebSearch),
            reporter,
            config,
        ))
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Run one analysis
    pub async fn analyze(
        &self,
        ticker: &str,
        options: &AnalysisOptions,
    ) -> std::result::Result<AnalysisView, AnalysisError> {
        self.analyze_with_progress(ticker, options, |_| {}).await
    }

    /// Run one analysis, calling `on_stage` as each stage starts
    #[instrument(skip(self, options, on_stage))]
    pub async fn analyze_with_progress(
        &self,
        ticker: &str,
        options: &AnalysisOptions,
        mut on_stage: impl FnMut(&Stage) + Send,
    ) -> std::result::Result<AnalysisView, AnalysisError> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(AnalysisError::EmptyTicker);
        }
        if options.generate_report && !self.reporter.is_configured() {
            return Err(AnalysisError::MissingApiKey);
        }

        on_stage(&Stage::Fetching {
            ticker: ticker.to_string(),
        });
        let snapshot = self
            .fetcher
            .fetch(ticker)
            .await
            .map_err(|source| {
                warn!(%ticker, "Fetch failed: {source}");
                AnalysisError::FetchFailed {
                    ticker: ticker.to_string(),
                    source,
                }
            })?;

        on_stage(&Stage::Searching {
            company: snapshot.company_name.clone(),
        });
        let web_results = match self
            .search
            .search(&snapshot.company_name, self.config.web_results)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                warn!("Web search failed: {e}");
                Vec::new()
            }
        };

        let report = if options.generate_report {
            on_stage(&Stage::Generating);
            match self.reporter.generate(&snapshot, &web_results).await {
                Ok(text) => ReportOutcome::Generated(text),
                Err(e) => {
                    warn!("Report generation failed: {e}");
                    ReportOutcome::Failed(e.to_string())
                }
            }
        } else {
            ReportOutcome::Skipped
        };

        info!(ticker = %snapshot.ticker, "Analysis complete");
        Ok(AnalysisView::new(snapshot, web_results, report, &self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketDataSource;
    use crate::error::StockError;
    use crate::search::MockWebSearch;
    use crate::snapshot::PricePoint;
    use analyzer_llm::{
        CompletionResponse, FinishReason, LLMError, Message, MockLLMProvider, TokenUsage,
    };
    use chrono::DateTime;
    use serde_json::{Map, json};

    fn config() -> Arc<AnalyzerConfig> {
        Arc::new(AnalyzerConfig::default())
    }

    fn source() -> MockMarketDataSource {
        let mut source = MockMarketDataSource::new();
        source.expect_profile().returning(|_| {
            let mut info = Map::new();
            info.insert("symbol".to_string(), json!("AAPL"));
            info.insert("longName".to_string(), json!("Apple Inc."));
            info.insert("sector".to_string(), json!("Technology"));
            Ok(info)
        });
        source.expect_price_history().returning(|_, _| {
            Ok((0..30)
                .map(|day| {
                    let close = 180.0 + f64::from(day);
                    PricePoint {
                        timestamp: DateTime::from_timestamp(1_717_200_000 + i64::from(day) * 86_400, 0)
                            .unwrap(),
                        open: close,
                        high: close + 1.0,
                        low: close - 1.0,
                        close,
                        volume: 50_000_000,
                        adjclose: close,
                    }
                })
                .collect())
        });
        source.expect_major_holders().returning(|_| Ok(None));
        source.expect_recommendations().returning(|_| Ok(vec![]));
        source
            .expect_quarterly_statement()
            .returning(|_, _| Ok(None));
        source
    }

    fn provider(result: std::result::Result<&'static str, LLMError>) -> Arc<dyn analyzer_llm::LLMProvider> {
        let mut provider = MockLLMProvider::new();
        provider.expect_name().return_const("mock");
        let mut result = Some(result);
        provider.expect_complete().times(1).returning(move |_| {
            match result.take().unwrap() {
                Ok(text) => Ok(CompletionResponse {
                    message: Message::assistant(text),
                    finish_reason: FinishReason::Stop,
                    usage: TokenUsage::default(),
                }),
                Err(e) => Err(e),
            }
        });
        Arc::new(provider)
    }

    fn dashboard(
        source: MockMarketDataSource,
        llm: Option<Arc<dyn analyzer_llm::LLMProvider>>,
    ) -> Dashboard {
        let config = config();
        Dashboard::new(
            StockDataFetcher::new(Arc::new(source), Arc::clone(&config)),
            Arc::new(SimulatedWebSearch),
            ReportGenerator::new(llm, Arc::clone(&config)),
            config,
        )
    }

    #[tokio::test]
    async fn test_empty_ticker() {
        let dashboard = dashboard(MockMarketDataSource::new(), None);
        let err = dashboard
            .analyze("  ", &AnalysisOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyTicker));
    }

    #[tokio::test]
    async fn test_missing_key_stops_before_fetch() {
        // The mock has no expectations, so a fetch would panic
        let dashboard = dashboard(MockMarketDataSource::new(), None);
        let err = dashboard
            .analyze("AAPL", &AnalysisOptions::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Groq API Key is not configured. Cannot generate report."
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_message() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_profile()
            .returning(|s| Err(StockError::InvalidSymbol(s.to_string())));
        let dashboard = dashboard(source, None);

        let err = dashboard
            .analyze("zzzz", &AnalysisOptions { generate_report: false })
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not retrieve data for zzzz. Please check the ticker symbol and try again."
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_names_cause() {
        let mut source = MockMarketDataSource::new();
        source.expect_profile().returning(|_| {
            Err(StockError::YahooFinanceError(
                "quoteSummary for AAPL returned HTTP 503".to_string(),
            ))
        });
        let dashboard = dashboard(source, None);

        let err = dashboard
            .analyze("AAPL", &AnalysisOptions { generate_report: false })
            .await
            .unwrap_err();
        let message = err.user_message();
        assert!(message.starts_with("Error fetching data for AAPL from Yahoo Finance:"));
        assert!(message.contains("HTTP 503"));
        assert!(message.ends_with("Please check the ticker symbol and try again."));
    }

    #[tokio::test]
    async fn test_full_analysis() {
        let dashboard = dashboard(source(), Some(provider(Ok("## Company Overview\nSolid."))));
        let view = dashboard
            .analyze("aapl", &AnalysisOptions::default())
            .await
            .unwrap();

        assert_eq!(view.snapshot.ticker, "AAPL");
        assert!(view.web_results.is_empty());
        assert_eq!(
            view.report,
            ReportOutcome::Generated("## Company Overview\nSolid.".to_string())
        );

        let text = view.render(&[], false);
        assert!(text.starts_with("Analysis for: Apple Inc. (AAPL)"));
        for tab in Tab::ALL {
            assert!(text.contains(tab.title()));
        }
        assert!(text.contains("1-Year Stock Price History"));
        assert!(text.contains("209.00"));
        assert!(text.contains("No web search results to display."));
        assert!(text.contains("No recommendations data available."));
        assert!(text.contains("## Company Overview"));
        assert!(!text.contains("Full Raw Stock Info"));
    }

    #[tokio::test]
    async fn test_stages_are_announced_in_order() {
        let dashboard = dashboard(source(), Some(provider(Ok("Report."))));
        let mut stages = Vec::new();
        dashboard
            .analyze_with_progress(" aapl ", &AnalysisOptions::default(), |stage| {
                stages.push(stage.to_string());
            })
            .await
            .unwrap();

        assert_eq!(
            stages,
            vec![
                "Fetching data for aapl...".to_string(),
                "Searching web for Apple Inc....".to_string(),
                "Generating report with LLM... This may take a moment.".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_generating_stage_without_report() {
        let dashboard = dashboard(source(), None);
        let mut stages = Vec::new();
        dashboard
            .analyze_with_progress("AAPL", &AnalysisOptions { generate_report: false }, |stage| {
                stages.push(stage.clone());
            })
            .await
            .unwrap();

        assert_eq!(stages.len(), 2);
        assert!(!stages.contains(&Stage::Generating));
    }

    #[tokio::test]
    async fn test_report_failure_is_inline() {
        let dashboard = dashboard(
            source(),
            Some(provider(Err(LLMError::RateLimitExceeded("slow down".to_string())))),
        );
        let view = dashboard
            .analyze("AAPL", &AnalysisOptions::default())
            .await
            .unwrap();

        assert!(matches!(view.report, ReportOutcome::Failed(_)));
        assert!(view.render(&[], false).contains("Failed to generate report: LLM error:"));
    }

    #[tokio::test]
    async fn test_skip_report_without_key() {
        let dashboard = dashboard(source(), None);
        let view = dashboard
            .analyze("AAPL", &AnalysisOptions { generate_report: false })
            .await
            .unwrap();
        assert_eq!(view.report, ReportOutcome::Skipped);

        let tab = view.render_tab(Tab::Financials);
        assert!(tab.contains("Income Statement (Recent):"));
        assert!(tab.contains("Not available"));
        assert!(!tab.contains("Business Summary"));

        let raw = view.render_raw();
        assert!(raw.contains("\"longName\": \"Apple Inc.\""));

        let json: serde_json::Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();
        assert_eq!(json["snapshot"]["ticker"], "AAPL");
        assert_eq!(json["report"]["status"], "skipped");
        assert_eq!(json["snapshot"]["major_holders"]["status"], "empty");
    }

    #[tokio::test]
    async fn test_web_results_are_numbered() {
        let mut search = MockWebSearch::new();
        search
            .expect_search()
            .times(1)
            .returning(|_, n| Ok(vec!["Record quarter".to_string(); n.min(2)]));
        let config = config();
        let dashboard = Dashboard::new(
            StockDataFetcher::new(Arc::new(source()), Arc::clone(&config)),
            Arc::new(search),
            ReportGenerator::new(None, Arc::clone(&config)),
            config,
        );

        let view = dashboard
            .analyze("AAPL", &AnalysisOptions { generate_report: false })
            .await
            .unwrap();
        let tab = view.render_tab(Tab::WebSearch);
        assert!(tab.contains("Result 1:\nRecord quarter\n---"));
        assert!(tab.contains("Result 2:"));
    }
}
