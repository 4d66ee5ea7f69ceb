//! Error types for stock analysis operations

use thiserror::Error;

/// Stock analysis specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Invalid or unknown ticker symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Upstream answered but had nothing for the symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// No chat-completion credential is configured
    #[error("Groq API key not configured. Please set the GROQ_API_KEY environment variable.")]
    MissingCredential,

    /// Chat-completion call failed
    #[error("LLM error: {0}")]
    Llm(#[from] analyzer_llm::LLMError),

    /// Prompt template failed to render
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Interactive command could not be parsed
    #[error("Command error: {0}")]
    CommandError(String),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

/// Reasons an analysis stops before anything is shown
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Please enter a stock ticker symbol.")]
    EmptyTicker,

    #[error("Groq API Key is not configured. Cannot generate report.")]
    MissingApiKey,

    #[error("Could not retrieve data for {ticker}. Please check the ticker symbol and try again.")]
    FetchFailed {
        ticker: String,
        #[source]
        source: StockError,
    },
}

impl AnalysisError {
    /// Text shown to the user; a failed fetch also names its cause
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::FetchFailed { ticker, source } => format!(
                "Error fetching data for {ticker} from Yahoo Finance: {source}\n{self}"
            ),
            other => other.to_string(),
        }
    }
}

impl From<yahoo_finance_api::YahooError> for StockError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        StockError::YahooFinanceError(err.to_string())
    }
}
