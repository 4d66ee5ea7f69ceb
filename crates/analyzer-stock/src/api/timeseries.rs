//! Quarterly statements from Yahoo's fundamentals-timeseries endpoint

use crate::error::Result;
use crate::snapshot::{StatementKind, StatementRow, StatementTable};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

const INCOME_ITEMS: &[(&str, &str)] = &[
    ("TotalRevenue", "Total Revenue"),
    ("CostOfRevenue", "Cost Of Revenue"),
    ("GrossProfit", "Gross Profit"),
    ("OperatingExpense", "Operating Expense"),
    ("OperatingIncome", "Operating Income"),
    ("PretaxIncome", "Pretax Income"),
    ("TaxProvision", "Tax Provision"),
    ("NetIncome", "Net Income"),
    ("BasicEPS", "Basic EPS"),
    ("DilutedEPS", "Diluted EPS"),
    ("EBITDA", "EBITDA"),
];

const BALANCE_SHEET_ITEMS: &[(&str, &str)] = &[
    ("TotalAssets", "Total Assets"),
    ("CurrentAssets", "Current Assets"),
    ("CashAndCashEquivalents", "Cash And Cash Equivalents"),
    (
        "TotalLiabilitiesNetMinorityInterest",
        "Total Liabilities Net Minority Interest",
    ),
    ("CurrentLiabilities", "Current Liabilities"),
    ("LongTermDebt", "Long Term Debt"),
    ("TotalDebt", "Total Debt"),
    ("StockholdersEquity", "Stockholders Equity"),
    ("WorkingCapital", "Working Capital"),
    ("RetainedEarnings", "Retained Earnings"),
];

const CASH_FLOW_ITEMS: &[(&str, &str)] = &[
    ("OperatingCashFlow", "Operating Cash Flow"),
    ("InvestingCashFlow", "Investing Cash Flow"),
    ("FinancingCashFlow", "Financing Cash Flow"),
    ("CapitalExpenditure", "Capital Expenditure"),
    ("FreeCashFlow", "Free Cash Flow"),
    ("RepurchaseOfCapitalStock", "Repurchase Of Capital Stock"),
    ("CashDividendsPaid", "Cash Dividends Paid"),
    ("EndCashPosition", "End Cash Position"),
];

/// Line items requested for a statement, as `(series name, display name)`
pub fn line_items(kind: StatementKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        StatementKind::IncomeStatement => INCOME_ITEMS,
        StatementKind::BalanceSheet => BALANCE_SHEET_ITEMS,
        StatementKind::CashFlow => CASH_FLOW_ITEMS,
    }
}

/// Comma-separated `type` query value, e.g. `quarterlyTotalRevenue,...`
pub fn type_query(kind: StatementKind) -> String {
    line_items(kind)
        .iter()
        .map(|(series, _)| format!("quarterly{series}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Deserialize)]
struct Envelope {
    timeseries: Body,
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(default)]
    result: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataPoint {
    as_of_date: NaiveDate,
    #[serde(default)]
    reported_value: Option<ReportedValue>,
}

#[derive(Debug, Deserialize)]
struct ReportedValue {
    raw: f64,
}

/// Pivot the timeseries payload into a statement table
///
/// Series without data are dropped; periods are the union of all reported
/// dates, newest first.
pub fn parse_statement(kind: StatementKind, payload: Value) -> Result<StatementTable> {
    let envelope: Envelope = serde_json::from_value(payload)?;

    let mut series: HashMap<String, HashMap<NaiveDate, f64>> = HashMap::new();
    for entry in envelope.timeseries.result {
        let Some(name) = entry
            .pointer("/meta/type/0")
            .and_then(Value::as_str)
            .map(str::to_string)
        else {
            continue;
        };
        let Some(points) = entry.get(&name).cloned() else {
            continue;
        };
        // Yahoo pads missing quarters with nulls
        let points: Vec<Option<DataPoint>> = serde_json::from_value(points)?;
        let values: HashMap<NaiveDate, f64> = points
            .into_iter()
            .flatten()
            .filter_map(|p| p.reported_value.map(|v| (p.as_of_date, v.raw)))
            .collect();
        if !values.is_empty() {
            let key = name.strip_prefix("quarterly").unwrap_or(&name).to_string();
            series.insert(key, values);
        }
    }

    let periods: Vec<NaiveDate> = series
        .values()
        .flat_map(|values| values.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect();

    let rows = line_items(kind)
        .iter()
        .filter_map(|(key, display)| {
            let values = series.get(*key)?;
            Some(StatementRow {
                name: (*display).to_string(),
                values: periods.iter().map(|date| values.get(date).copied()).collect(),
            })
        })
        .collect();

    Ok(StatementTable { periods, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_type_query() {
        let query = type_query(StatementKind::CashFlow);
        assert!(query.starts_with("quarterlyOperatingCashFlow,"));
        assert!(query.contains("quarterlyFreeCashFlow"));
        assert!(!query.ends_with(','));
    }

    #[test]
    fn test_parse_statement_pivots_newest_first() {
        let payload = json!({
            "timeseries": {
                "result": [
                    {
                        "meta": {"symbol": ["AAPL"], "type": ["quarterlyNetIncome"]},
                        "timestamp": [1711843200, 1719705600],
                        "quarterlyNetIncome": [
                            {"asOfDate": "2024-03-31", "periodType": "3M", "reportedValue": {"raw": 23636000000.0, "fmt": "23.64B"}},
                            {"asOfDate": "2024-06-30", "periodType": "3M", "reportedValue": {"raw": 21448000000.0, "fmt": "21.45B"}}
                        ]
                    },
                    {
                        "meta": {"symbol": ["AAPL"], "type": ["quarterlyTotalRevenue"]},
                        "quarterlyTotalRevenue": [
                            null,
                            {"asOfDate": "2024-06-30", "periodType": "3M", "reportedValue": {"raw": 85777000000.0, "fmt": "85.78B"}}
                        ]
                    },
                    {
                        "meta": {"symbol": ["AAPL"], "type": ["quarterlyEBITDA"]}
                    }
                ],
                "error": null
            }
        });

        let table = parse_statement(StatementKind::IncomeStatement, payload).unwrap();

        assert_eq!(table.periods, vec![date(2024, 6, 30), date(2024, 3, 31)]);
        // Rows follow line-item order, not payload order
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].name, "Total Revenue");
        assert_eq!(table.rows[0].values, vec![Some(85_777_000_000.0), None]);
        assert_eq!(table.rows[1].name, "Net Income");
        assert_eq!(
            table.rows[1].values,
            vec![Some(21_448_000_000.0), Some(23_636_000_000.0)]
        );
    }

    #[test]
    fn test_parse_statement_empty() {
        let payload = json!({"timeseries": {"result": [], "error": null}});
        let table = parse_statement(StatementKind::BalanceSheet, payload).unwrap();
        assert!(table.is_empty());
    }
}
