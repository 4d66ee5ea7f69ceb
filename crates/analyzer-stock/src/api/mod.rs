//! Finance data query interface

pub mod quote_summary;
pub mod timeseries;
pub mod yahoo;

pub use yahoo::YahooFinanceClient;

use crate::error::Result;
use crate::snapshot::{MajorHolders, PricePoint, RecommendationRow, StatementKind, StatementTable};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Source of per-ticker market data
///
/// `Ok(None)` / an empty list means upstream answered but had nothing; errors
/// mean the request itself failed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Flattened company profile and key statistics
    async fn profile(&self, symbol: &str) -> Result<Map<String, Value>>;

    /// Daily bars over `range` (e.g. `"1y"`)
    async fn price_history(&self, symbol: &str, range: &str) -> Result<Vec<PricePoint>>;

    /// Ownership breakdown
    async fn major_holders(&self, symbol: &str) -> Result<Option<MajorHolders>>;

    /// Analyst recommendation counts in upstream order, newest period first
    async fn recommendations(&self, symbol: &str) -> Result<Vec<RecommendationRow>>;

    /// One quarterly statement, newest period first
    async fn quarterly_statement(
        &self,
        symbol: &str,
        kind: StatementKind,
    ) -> Result<Option<StatementTable>>;
}
