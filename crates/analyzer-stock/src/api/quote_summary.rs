//! Parsing for Yahoo's `quoteSummary` payloads

use crate::error::{Result, StockError};
use crate::snapshot::{MajorHolders, RecommendationRow};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Modules that together make up the company profile
pub const PROFILE_MODULES: &[&str] = &[
    "assetProfile",
    "summaryDetail",
    "defaultKeyStatistics",
    "financialData",
    "price",
    "quoteType",
];

/// Module carrying the ownership breakdown
pub const HOLDERS_MODULE: &str = "majorHoldersBreakdown";

/// Module carrying analyst recommendation counts
pub const RECOMMENDATION_MODULE: &str = "recommendationTrend";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: Body,
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(default)]
    result: Option<Vec<Value>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

/// First result object of a `quoteSummary` response
///
/// An upstream "Not Found" becomes [`StockError::InvalidSymbol`].
pub fn first_result(symbol: &str, payload: Value) -> Result<Value> {
    let envelope: Envelope = serde_json::from_value(payload)?;

    if let Some(err) = envelope.quote_summary.error {
        return Err(if err.code.eq_ignore_ascii_case("not found")
            || err.description.contains("not found")
        {
            StockError::InvalidSymbol(symbol.to_string())
        } else {
            StockError::YahooFinanceError(format!("{}: {}", err.code, err.description))
        });
    }

    envelope
        .quote_summary
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| StockError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: "empty quoteSummary result".to_string(),
        })
}

/// Merge every module into one flat map
///
/// `{raw, fmt}` wrappers collapse to `raw`, empty objects are dropped, and the
/// first module to define a key wins.
pub fn flatten_modules(result: &Value) -> Map<String, Value> {
    let mut info = Map::new();
    let Some(modules) = result.as_object() else {
        return info;
    };

    for module in PROFILE_MODULES.iter().filter_map(|name| modules.get(*name)) {
        let Some(fields) = module.as_object() else {
            continue;
        };
        for (key, value) in fields {
            if key == "maxAge" {
                continue;
            }
            if let Some(value) = unwrap_value(value) {
                info.entry(key.clone()).or_insert(value);
            }
        }
    }

    info
}

fn unwrap_value(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(obj) if obj.is_empty() => None,
        Value::Object(obj) if obj.contains_key("raw") => obj.get("raw").cloned(),
        other => Some(other.clone()),
    }
}

fn raw_f64(module: &Value, key: &str) -> Option<f64> {
    unwrap_value(module.get(key)?)?.as_f64()
}

/// Ownership breakdown from `majorHoldersBreakdown`
pub fn parse_major_holders(result: &Value) -> Option<MajorHolders> {
    let module = result.get(HOLDERS_MODULE)?;
    let holders = MajorHolders {
        insiders_percent_held: raw_f64(module, "insidersPercentHeld"),
        institutions_percent_held: raw_f64(module, "institutionsPercentHeld"),
        institutions_float_percent_held: raw_f64(module, "institutionsFloatPercentHeld"),
        institutions_count: raw_f64(module, "institutionsCount").map(|c| c as u64),
    };
    (!holders.is_empty()).then_some(holders)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrendRow {
    period: String,
    #[serde(default)]
    strong_buy: u32,
    #[serde(default)]
    buy: u32,
    #[serde(default)]
    hold: u32,
    #[serde(default)]
    sell: u32,
    #[serde(default)]
    strong_sell: u32,
}

/// Recommendation rows from `recommendationTrend`, in upstream order
pub fn parse_recommendations(result: &Value) -> Result<Vec<RecommendationRow>> {
    let Some(trend) = result
        .get(RECOMMENDATION_MODULE)
        .and_then(|module| module.get("trend"))
    else {
        return Ok(Vec::new());
    };

    let rows: Vec<TrendRow> = serde_json::from_value(trend.clone())?;
    Ok(rows
        .into_iter()
        .map(|row| RecommendationRow {
            period: row.period,
            strong_buy: row.strong_buy,
            buy: row.buy,
            hold: row.hold,
            sell: row.sell,
            strong_sell: row.strong_sell,
        })
        .collect())
}
