//! AI-assisted stock analyzer
//!
//! Pulls public data for one ticker from Yahoo Finance, lays it out as a
//! terminal dashboard and asks a hosted chat model for a Markdown investment
//! report. It includes:
//!
//! - A Yahoo Finance client (profile, price history, holders, analyst
//!   recommendations, quarterly statements)
//! - A web search stage (currently a placeholder with no results)
//! - Report prompt templates and a Groq-backed report generator
//! - Tabbed text rendering and JSON output of an analysis
//!
//! # Example
//!
//! ```rust,ignore
//! use analyzer_stock::{AnalysisOptions, AnalyzerConfig, Dashboard};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let dashboard = Dashboard::from_config(AnalyzerConfig::from_env()?)?;
//!     let view = dashboard.analyze("AAPL", &AnalysisOptions::default()).await?;
//!     println!("{}", view.render(&[], false));
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetcher;
pub mod prompts;
pub mod report;
pub mod search;
pub mod snapshot;
pub mod tables;

pub use api::{MarketDataSource, YahooFinanceClient};
pub use commands::Command;
pub use config::AnalyzerConfig;
pub use dashboard::{AnalysisOptions, AnalysisView, Dashboard, ReportOutcome, Stage, Tab};
pub use error::{AnalysisError, Result, StockError};
pub use fetcher::StockDataFetcher;
pub use report::ReportGenerator;
pub use search::{SimulatedWebSearch, WebSearch};
pub use snapshot::StockSnapshot;
