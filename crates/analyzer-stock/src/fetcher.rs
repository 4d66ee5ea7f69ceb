//! Collects everything the dashboard shows for one ticker

use crate::api::MarketDataSource;
use crate::config::AnalyzerConfig;
use crate::error::{Result, StockError};
use crate::snapshot::{
    BriefInfo, Fetched, FinancialsSummary, StatementKind, StatementTable, StockSnapshot, info_str,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Fetches a [`StockSnapshot`] from a market data source
pub struct StockDataFetcher {
    source: Arc<dyn MarketDataSource>,
    config: Arc<AnalyzerConfig>,
}

impl StockDataFetcher {
    pub fn new(source: Arc<dyn MarketDataSource>, config: Arc<AnalyzerConfig>) -> Self {
        Self { source, config }
    }

    /// Fetch profile, price history, holders, recommendations and statements
    ///
    /// Profile and history are required; the other sections degrade to
    /// [`Fetched::Empty`] or [`Fetched::Failed`].
    #[instrument(skip(self))]
    pub async fn fetch(&self, ticker: &str) -> Result<StockSnapshot> {
        let ticker = normalize_ticker(ticker)?;

        let full_info = self.source.profile(&ticker).await?;
        let history = self
            .source
            .price_history(&ticker, &self.config.history_range)
            .await?;

        let major_holders = match self.source.major_holders(&ticker).await {
            Ok(holders) => Fetched::from_option(holders.filter(|h| !h.is_empty())),
            Err(e) => {
                warn!(%ticker, "Could not fetch major holders: {e}");
                Fetched::Failed(e.to_string())
            }
        };

        let recommendations = match self.source.recommendations(&ticker).await {
            Ok(mut rows) => {
                let skip = rows.len().saturating_sub(self.config.recent_rows);
                rows.drain(..skip);
                Fetched::from_rows(rows)
            }
            Err(e) => {
                warn!(%ticker, "Could not fetch recommendations: {e}");
                Fetched::Failed(e.to_string())
            }
        };

        let financials = FinancialsSummary {
            income_statement: self
                .statement(&ticker, StatementKind::IncomeStatement)
                .await,
            balance_sheet: self.statement(&ticker, StatementKind::BalanceSheet).await,
            cash_flow: self.statement(&ticker, StatementKind::CashFlow).await,
        };

        let company_name = full_info
            .get("longName")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&ticker)
            .to_string();

        info!(
            %ticker,
            bars = history.len(),
            fields = full_info.len(),
            "Fetched stock data"
        );

        Ok(StockSnapshot {
            company_name,
            info: BriefInfo::from_full_info(&full_info),
            sector: info_str(&full_info, "sector"),
            industry: info_str(&full_info, "industry"),
            summary: info_str(&full_info, "longBusinessSummary"),
            full_info,
            history,
            major_holders,
            recommendations,
            financials,
            ticker,
        })
    }

    async fn statement(&self, ticker: &str, kind: StatementKind) -> Fetched<StatementTable> {
        match self.source.quarterly_statement(ticker, kind).await {
            Ok(table) => Fetched::from_option(
                table
                    .map(|t| t.most_recent(self.config.statement_quarters))
                    .filter(|t| !t.is_empty()),
            ),
            Err(e) => {
                warn!(%ticker, statement = kind.title(), "Could not fetch statement: {e}");
                Fetched::Failed(e.to_string())
            }
        }
    }
}

/// Trim and upper-case a ticker, rejecting blanks
pub fn normalize_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(StockError::InvalidSymbol(
            "ticker symbol is empty".to_string(),
        ));
    }
    Ok(ticker.to_uppercase())
}
