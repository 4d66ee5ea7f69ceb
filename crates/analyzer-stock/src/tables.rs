//! Text tables shared by the dashboard and the report prompt

use crate::snapshot::{
    BriefInfo, Fetched, MajorHolders, NOT_AVAILABLE, PricePoint, RecommendationRow,
    StatementTable,
};
use comfy_table::{CellAlignment, ContentArrangement, Table, presets};
use serde_json::Value;

/// Shown when the holders breakdown came back empty
pub const HOLDERS_EMPTY: &str = "Not available";
/// Shown when the recommendation trend came back empty
pub const RECOMMENDATIONS_EMPTY: &str = "No recommendations data available.";
/// Shown when holders or recommendations could not be fetched
pub const SECTION_FAILED: &str = "Not available or error fetching.";
/// Shown when a statement came back empty
pub const STATEMENT_EMPTY: &str = "Not available";
/// Shown when a statement could not be fetched
pub const STATEMENT_FAILED: &str = "Error fetching.";

/// Border style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// Box-drawing borders for the terminal
    Boxed,
    /// Whitespace-aligned columns, used inside prompts
    Plain,
}

impl TableStyle {
    fn preset(self) -> &'static str {
        match self {
            TableStyle::Boxed => presets::UTF8_FULL,
            TableStyle::Plain => presets::NOTHING,
        }
    }
}

fn new_table(style: TableStyle, header: Vec<String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(style.preset())
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(header);
    table
}

fn align_numeric_columns(table: &mut Table, from: usize) {
    let count = table.column_count();
    for index in from..count {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
}

/// Profile value as text; strings lose their JSON quotes
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => NOT_AVAILABLE.to_string(),
        other => other.to_string(),
    }
}

/// Compact rendering of large amounts: `94.93B`, `-1.20M`
pub fn format_compact(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000_000_000.0 {
        format!("{:.2}T", value / 1_000_000_000_000.0)
    } else if magnitude >= 1_000_000_000.0 {
        format!("{:.2}B", value / 1_000_000_000.0)
    } else if magnitude >= 1_000_000.0 {
        format!("{:.2}M", value / 1_000_000.0)
    } else {
        format!("{value:.2}")
    }
}

/// Two-column field/value table
pub fn brief_info(info: &BriefInfo, style: TableStyle) -> Table {
    let mut table = new_table(style, vec!["Field".to_string(), "Value".to_string()]);
    for (key, value) in info.entries() {
        table.add_row(vec![key.to_string(), display_value(value)]);
    }
    table
}

/// Daily bars, oldest first
pub fn price_rows(points: &[PricePoint], style: TableStyle) -> Table {
    let header = ["Date", "Open", "High", "Low", "Close", "Volume"]
        .map(String::from)
        .to_vec();
    let mut table = new_table(style, header);
    for p in points {
        table.add_row(vec![
            p.date().to_string(),
            format!("{:.2}", p.open),
            format!("{:.2}", p.high),
            format!("{:.2}", p.low),
            format!("{:.2}", p.close),
            p.volume.to_string(),
        ]);
    }
    align_numeric_columns(&mut table, 1);
    table
}

/// Holders breakdown, or the matching placeholder
pub fn major_holders(holders: &Fetched<MajorHolders>, style: TableStyle) -> String {
    match holders {
        Fetched::Available(holders) => {
            let mut table = new_table(style, vec!["Holder".to_string(), "Value".to_string()]);
            for (label, value) in holders.rows() {
                table.add_row(vec![label.to_string(), value]);
            }
            align_numeric_columns(&mut table, 1);
            table.to_string()
        }
        Fetched::Empty => HOLDERS_EMPTY.to_string(),
        Fetched::Failed(_) => SECTION_FAILED.to_string(),
    }
}

/// Recommendation counts per period, or the matching placeholder
pub fn recommendations(rows: &Fetched<Vec<RecommendationRow>>, style: TableStyle) -> String {
    match rows {
        Fetched::Available(rows) => {
            let header = ["Period", "Strong Buy", "Buy", "Hold", "Sell", "Strong Sell"]
                .map(String::from)
                .to_vec();
            let mut table = new_table(style, header);
            for row in rows {
                table.add_row(vec![
                    row.period.clone(),
                    row.strong_buy.to_string(),
                    row.buy.to_string(),
                    row.hold.to_string(),
                    row.sell.to_string(),
                    row.strong_sell.to_string(),
                ]);
            }
            align_numeric_columns(&mut table, 1);
            table.to_string()
        }
        Fetched::Empty => RECOMMENDATIONS_EMPTY.to_string(),
        Fetched::Failed(_) => SECTION_FAILED.to_string(),
    }
}

/// Line items by quarter, or the matching placeholder
pub fn statement(statement: &Fetched<StatementTable>, style: TableStyle) -> String {
    match statement {
        Fetched::Available(table) => {
            let mut header = vec![String::new()];
            header.extend(table.periods.iter().map(ToString::to_string));
            let mut rendered = new_table(style, header);
            for row in &table.rows {
                let mut cells = vec![row.name.clone()];
                cells.extend(row.values.iter().map(|v| {
                    v.map_or_else(|| NOT_AVAILABLE.to_string(), format_compact)
                }));
                rendered.add_row(cells);
            }
            align_numeric_columns(&mut rendered, 1);
            rendered.to_string()
        }
        Fetched::Empty => STATEMENT_EMPTY.to_string(),
        Fetched::Failed(_) => STATEMENT_FAILED.to_string(),
    }
}
