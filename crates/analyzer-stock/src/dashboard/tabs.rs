//! Dashboard tabs

use crate::error::StockError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One of the four dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Overview,
    PriceHistory,
    Financials,
    WebSearch,
}

impl Tab {
    /// Tabs in display order
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::PriceHistory, Tab::Financials, Tab::WebSearch];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Company Info & Summary",
            Tab::PriceHistory => "Price History",
            Tab::Financials => "Financials & Holders",
            Tab::WebSearch => "Web Search (Simulated)",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tab::Overview => "📊",
            Tab::PriceHistory => "📈",
            Tab::Financials => "💰",
            Tab::WebSearch => "🌐",
        }
    }

    /// Short name accepted on the command line
    pub fn slug(self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::PriceHistory => "price",
            Tab::Financials => "financials",
            Tab::WebSearch => "web",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.title())
    }
}

impl FromStr for Tab {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "overview" | "info" | "company" | "summary" => Ok(Tab::Overview),
            "2" | "price" | "prices" | "history" | "price-history" | "chart" => {
                Ok(Tab::PriceHistory)
            }
            "3" | "financials" | "holders" | "statements" => Ok(Tab::Financials),
            "4" | "web" | "search" | "web-search" | "news" => Ok(Tab::WebSearch),
            other => Err(StockError::CommandError(format!(
                "Unknown tab '{other}'. Expected one of: overview, price, financials, web"
            ))),
        }
    }
}
