//! Data fetched for one ticker
//!
//! Everything here mirrors the upstream schema closely and lives only for one
//! analysis: fetched, rendered, dropped.

use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Placeholder for a missing profile field
pub const NOT_AVAILABLE: &str = "N/A";

/// Profile keys shown in the overview tab and forwarded to the report
pub const RELEVANT_INFO_KEYS: [&str; 20] = [
    "symbol",
    "longName",
    "sector",
    "industry",
    "country",
    "website",
    "marketCap",
    "enterpriseValue",
    "trailingPE",
    "forwardPE",
    "dividendYield",
    "beta",
    "52WeekChange",
    "shortRatio",
    "currentPrice",
    "targetHighPrice",
    "targetLowPrice",
    "targetMeanPrice",
    "recommendationKey",
    "numberOfAnalystOpinions",
];

/// Outcome of fetching an optional section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Fetched<T> {
    /// Upstream returned data
    Available(T),
    /// Upstream answered with nothing
    Empty,
    /// The request failed; the message is kept for display
    Failed(String),
}

impl<T> Fetched<T> {
    /// `Some` becomes `Available`, `None` becomes `Empty`
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Fetched::Empty, Fetched::Available)
    }

    /// The data, if any
    pub fn available(&self) -> Option<&T> {
        match self {
            Fetched::Available(value) => Some(value),
            Fetched::Empty | Fetched::Failed(_) => None,
        }
    }

    /// Whether the request failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Fetched::Failed(_))
    }
}

impl<T> Fetched<Vec<T>> {
    /// An empty list counts as `Empty`
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            Fetched::Empty
        } else {
            Fetched::Available(rows)
        }
    }
}

/// One daily bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

impl PricePoint {
    /// Trading date of the bar
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Ownership breakdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MajorHolders {
    pub insiders_percent_held: Option<f64>,
    pub institutions_percent_held: Option<f64>,
    pub institutions_float_percent_held: Option<f64>,
    pub institutions_count: Option<u64>,
}

impl MajorHolders {
    /// True when every field is missing
    pub fn is_empty(&self) -> bool {
        self.insiders_percent_held.is_none()
            && self.institutions_percent_held.is_none()
            && self.institutions_float_percent_held.is_none()
            && self.institutions_count.is_none()
    }

    /// Label/value pairs in display order
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let percent = |v: Option<f64>| {
            v.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:.2}%", v * 100.0))
        };
        vec![
            (
                "% of Shares Held by All Insiders",
                percent(self.insiders_percent_held),
            ),
            (
                "% of Shares Held by Institutions",
                percent(self.institutions_percent_held),
            ),
            (
                "% of Float Held by Institutions",
                percent(self.institutions_float_percent_held),
            ),
            (
                "Number of Institutions Holding Shares",
                self.institutions_count
                    .map_or_else(|| NOT_AVAILABLE.to_string(), |c| c.to_string()),
            ),
        ]
    }
}

/// Analyst recommendation counts for one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRow {
    /// Relative period, e.g. `0m` for the current month, `-1m` for the last
    pub period: String,
    pub strong_buy: u32,
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
    pub strong_sell: u32,
}

/// Which quarterly statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    IncomeStatement,
    BalanceSheet,
    CashFlow,
}

impl StatementKind {
    /// All kinds in display order
    pub const ALL: [StatementKind; 3] = [
        StatementKind::IncomeStatement,
        StatementKind::BalanceSheet,
        StatementKind::CashFlow,
    ];

    /// Human-readable title
    pub fn title(self) -> &'static str {
        match self {
            StatementKind::IncomeStatement => "Income Statement",
            StatementKind::BalanceSheet => "Balance Sheet",
            StatementKind::CashFlow => "Cash Flow",
        }
    }
}

/// One line item across periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub name: String,
    /// Values aligned with [`StatementTable::periods`]
    pub values: Vec<Option<f64>>,
}

/// A financial statement as line items by period
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatementTable {
    /// Period end dates, newest first
    pub periods: Vec<NaiveDate>,
    pub rows: Vec<StatementRow>,
}

impl StatementTable {
    /// True when there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() || self.rows.is_empty()
    }

    /// Keep only the `n` newest periods
    pub fn most_recent(&self, n: usize) -> StatementTable {
        let keep = n.min(self.periods.len());
        StatementTable {
            periods: self.periods[..keep].to_vec(),
            rows: self
                .rows
                .iter()
                .map(|row| StatementRow {
                    name: row.name.clone(),
                    values: row.values.iter().take(keep).copied().collect(),
                })
                .collect(),
        }
    }
}

/// The three quarterly statements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialsSummary {
    pub income_statement: Fetched<StatementTable>,
    pub balance_sheet: Fetched<StatementTable>,
    pub cash_flow: Fetched<StatementTable>,
}

impl FinancialsSummary {
    /// Statement by kind
    pub fn get(&self, kind: StatementKind) -> &Fetched<StatementTable> {
        match kind {
            StatementKind::IncomeStatement => &self.income_statement,
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::CashFlow => &self.cash_flow,
        }
    }
}

/// The fixed subset of profile fields, in [`RELEVANT_INFO_KEYS`] order
#[derive(Debug, Clone, PartialEq)]
pub struct BriefInfo(Vec<(String, Value)>);

impl BriefInfo {
    /// Pick the relevant keys out of the full profile, `"N/A"` for gaps
    pub fn from_full_info(info: &Map<String, Value>) -> Self {
        BriefInfo(
            RELEVANT_INFO_KEYS
                .iter()
                .map(|key| {
                    let value = info
                        .get(*key)
                        .filter(|v| !v.is_null())
                        .cloned()
                        .unwrap_or_else(|| Value::String(NOT_AVAILABLE.to_string()));
                    ((*key).to_string(), value)
                })
                .collect(),
        )
    }

    /// Value for a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Entries in display order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for BriefInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Everything fetched for one ticker
#[derive(Debug, Clone, Serialize)]
pub struct StockSnapshot {
    pub ticker: String,
    pub company_name: String,
    pub info: BriefInfo,
    /// Flattened profile, shown by the raw dump
    pub full_info: Map<String, Value>,
    pub sector: String,
    pub industry: String,
    pub summary: String,
    pub history: Vec<PricePoint>,
    pub major_holders: Fetched<MajorHolders>,
    pub recommendations: Fetched<Vec<RecommendationRow>>,
    pub financials: FinancialsSummary,
}

impl StockSnapshot {
    /// Last `n` bars of history
    pub fn recent_history(&self, n: usize) -> &[PricePoint] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// Most recent close, if any history came back
    pub fn latest_close(&self) -> Option<f64> {
        self.history.last().map(|p| p.close)
    }
}

/// String field from the profile, `"N/A"` when absent or empty
pub fn info_str(info: &Map<String, Value>, key: &str) -> String {
    info.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_brief_info_has_all_keys_in_order() {
        let mut info = Map::new();
        info.insert("symbol".to_string(), json!("AAPL"));
        info.insert("trailingPE".to_string(), json!(31.2));
        info.insert("beta".to_string(), Value::Null);
        info.insert("unrelated".to_string(), json!("ignored"));

        let brief = BriefInfo::from_full_info(&info);

        assert_eq!(brief.len(), RELEVANT_INFO_KEYS.len());
        let keys: Vec<&str> = brief.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, RELEVANT_INFO_KEYS.to_vec());
        assert_eq!(brief.get("symbol"), Some(&json!("AAPL")));
        assert_eq!(brief.get("trailingPE"), Some(&json!(31.2)));
        assert_eq!(brief.get("beta"), Some(&json!("N/A")));
        assert_eq!(brief.get("website"), Some(&json!("N/A")));
        assert!(brief.get("unrelated").is_none());
    }

    #[test]
    fn test_brief_info_serializes_in_key_order() {
        let brief = BriefInfo::from_full_info(&Map::new());
        let rendered = serde_json::to_string(&brief).unwrap();
        let symbol = rendered.find("\"symbol\"").unwrap();
        let opinions = rendered.find("\"numberOfAnalystOpinions\"").unwrap();
        assert!(symbol < opinions);
    }

    #[test]
    fn test_fetched_constructors() {
        assert_eq!(Fetched::from_option(Some(1)), Fetched::Available(1));
        assert_eq!(Fetched::<i32>::from_option(None), Fetched::Empty);
        assert_eq!(Fetched::<Vec<i32>>::from_rows(vec![]), Fetched::Empty);
        assert!(Fetched::<i32>::Failed("boom".into()).is_failed());
        assert_eq!(Fetched::Available(3).available(), Some(&3));
    }

    #[test]
    fn test_statement_most_recent() {
        let table = StatementTable {
            periods: vec![date(2024, 9, 30), date(2024, 6, 30), date(2024, 3, 31)],
            rows: vec![StatementRow {
                name: "TotalRevenue".to_string(),
                values: vec![Some(3.0), None, Some(1.0)],
            }],
        };

        let recent = table.most_recent(2);
        assert_eq!(recent.periods, vec![date(2024, 9, 30), date(2024, 6, 30)]);
        assert_eq!(recent.rows[0].values, vec![Some(3.0), None]);

        let all = table.most_recent(10);
        assert_eq!(all.periods.len(), 3);
    }

    #[test]
    fn test_major_holders_rows() {
        let holders = MajorHolders {
            insiders_percent_held: Some(0.0171),
            institutions_percent_held: Some(0.6203),
            institutions_float_percent_held: None,
            institutions_count: Some(6542),
        };
        let rows = holders.rows();
        assert_eq!(rows[0].1, "1.71%");
        assert_eq!(rows[1].1, "62.03%");
        assert_eq!(rows[2].1, "N/A");
        assert_eq!(rows[3].1, "6542");
        assert!(!holders.is_empty());
        assert!(MajorHolders::default().is_empty());
    }

    #[test]
    fn test_info_str_fallback() {
        let mut info = Map::new();
        info.insert("sector".to_string(), json!("Technology"));
        info.insert("industry".to_string(), json!(""));
        assert_eq!(info_str(&info, "sector"), "Technology");
        assert_eq!(info_str(&info, "industry"), "N/A");
        assert_eq!(info_str(&info, "missing"), "N/A");
    }
}
