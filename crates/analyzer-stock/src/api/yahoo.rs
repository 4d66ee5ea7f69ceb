//! Yahoo Finance API client

use crate::api::MarketDataSource;
use crate::api::{quote_summary, timeseries};
use crate::error::{Result, StockError};
use crate::snapshot::{MajorHolders, PricePoint, RecommendationRow, StatementKind, StatementTable};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use reqwest::{Client, StatusCode, Url};
use serde_json::{Map, Value};
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use yahoo_finance_api as yahoo;

const DEFAULT_QUERY_BASE: &str = "https://query2.finance.yahoo.com";
const DEFAULT_COOKIE_URL: &str = "https://fc.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Yahoo Finance API client
///
/// Price bars go through the `yahoo_finance_api` connector; profile, holders,
/// recommendations and statements are read from the JSON endpoints directly.
pub struct YahooFinanceClient {
    http: Client,
    connector: yahoo::YahooConnector,
    query_base: String,
    cookie_url: String,
    /// Session crumb; cleared when Yahoo rejects it
    crumb: Mutex<Option<String>>,
}

impl YahooFinanceClient {
    /// Create a client with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        let connector = yahoo::YahooConnector::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            connector,
            query_base: DEFAULT_QUERY_BASE.to_string(),
            cookie_url: DEFAULT_COOKIE_URL.to_string(),
            crumb: Mutex::new(None),
        })
    }

    /// Point the JSON endpoints somewhere else
    pub fn with_endpoints(
        mut self,
        query_base: impl Into<String>,
        cookie_url: impl Into<String>,
    ) -> Self {
        self.query_base = query_base.into();
        self.cookie_url = cookie_url.into();
        self
    }

    /// Session crumb, fetched on first use and reused until rejected
    async fn crumb(&self) -> Result<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // Only the consent cookie matters; the page itself is usually a 404.
        let _ = self.http.get(&self.cookie_url).send().await?;

        let crumb = self
            .http
            .get(self.endpoint(&["v1", "test", "getcrumb"])?)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let crumb = crumb.trim();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(StockError::YahooFinanceError(
                "Yahoo did not hand out a session crumb".to_string(),
            ));
        }
        debug!("Obtained Yahoo session crumb");
        *cached = Some(crumb.to_string());
        Ok(crumb.to_string())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.query_base)
            .map_err(|e| StockError::ConfigError(format!("invalid Yahoo base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| StockError::ConfigError("Yahoo base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// First `quoteSummary` result for the requested modules
    async fn quote_summary(&self, symbol: &str, modules: &[&str]) -> Result<Value> {
        let crumb = self.crumb().await?;
        let response = self
            .http
            .get(self.endpoint(&["v10", "finance", "quoteSummary", symbol])?)
            .query(&[("modules", modules.join(",").as_str()), ("crumb", crumb.as_str())])
            .send()
            .await?;

        // Unknown symbols come back as 404 with an error body worth reading
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // Stale crumb; the next request performs a fresh handshake
            warn!("Yahoo rejected the session crumb");
            *self.crumb.lock().await = None;
        }
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(StockError::YahooFinanceError(format!(
                "quoteSummary for {symbol} returned HTTP {status}"
            )));
        }

        let payload: Value = response.json().await?;
        quote_summary::first_result(symbol, payload)
    }

    /// Get historical quotes for a symbol
    pub async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>> {
        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| StockError::YahooFinanceError(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| StockError::YahooFinanceError(format!("Invalid end timestamp: {e}")))?;

        let response = self.connector.get_quote_history(symbol, start_odt, end_odt).await?;

        // A successful response without bars is an empty history, not a failure
        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!(symbol, "No price bars in chart response: {e}");
                return Ok(Vec::new());
            }
        };

        Ok(quotes
            .iter()
            .map(|q| PricePoint {
                timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
                adjclose: q.adjclose,
            })
            .collect())
    }
}

/// Start of the window for a range such as `"1y"` or `"ytd"`
pub fn range_start(range: &str, end: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let days = match range {
        "1d" => 1,
        "5d" => 5,
        "1mo" => 30,
        "3mo" => 90,
        "6mo" => 180,
        "1y" => 365,
        "2y" => 730,
        "5y" => 1825,
        "10y" => 3650,
        "max" => 36500, // ~100 years
        "ytd" => {
            return chrono::NaiveDate::from_ymd_opt(end.year(), 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
                .ok_or_else(|| StockError::ConfigError("invalid year start".to_string()));
        }
        _ => return Err(StockError::ConfigError(format!("Invalid range: {range}"))),
    };
    Ok(end - chrono::Duration::days(days))
}

#[async_trait]
impl MarketDataSource for YahooFinanceClient {
    #[instrument(skip(self))]
    async fn profile(&self, symbol: &str) -> Result<Map<String, Value>> {
        let result = self
            .quote_summary(symbol, quote_summary::PROFILE_MODULES)
            .await?;
        let info = quote_summary::flatten_modules(&result);
        debug!(fields = info.len(), "Fetched profile");
        Ok(info)
    }

    #[instrument(skip(self))]
    async fn price_history(&self, symbol: &str, range: &str) -> Result<Vec<PricePoint>> {
        let end = Utc::now();
        let start = range_start(range, end)?;
        self.get_historical_quotes(symbol, start, end).await
    }

    #[instrument(skip(self))]
    async fn major_holders(&self, symbol: &str) -> Result<Option<MajorHolders>> {
        let result = self
            .quote_summary(symbol, &[quote_summary::HOLDERS_MODULE])
            .await?;
        Ok(quote_summary::parse_major_holders(&result))
    }

    #[instrument(skip(self))]
    async fn recommendations(&self, symbol: &str) -> Result<Vec<RecommendationRow>> {
        let result = self
            .quote_summary(symbol, &[quote_summary::RECOMMENDATION_MODULE])
            .await?;
        quote_summary::parse_recommendations(&result)
    }

    #[instrument(skip(self))]
    async fn quarterly_statement(
        &self,
        symbol: &str,
        kind: StatementKind,
    ) -> Result<Option<StatementTable>> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(3 * 365);

        let payload: Value = self
            .http
            .get(self.endpoint(&[
                "ws",
                "fundamentals-timeseries",
                "v1",
                "finance",
                "timeseries",
                symbol,
            ])?)
            .query(&[
                ("symbol", symbol.to_string()),
                ("type", timeseries::type_query(kind)),
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let table = timeseries::parse_statement(kind, payload)?;
        Ok((!table.is_empty()).then_some(table))
    }
}
