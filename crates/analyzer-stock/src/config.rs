//! Configuration for the stock analyzer

use crate::error::{Result, StockError};
use analyzer_llm::providers::groq::{API_BASE_ENV, API_KEY_ENV, DEFAULT_GROQ_API_BASE};
use analyzer_llm::providers::GroqConfig;
use std::time::Duration;

/// Model used for reports unless overridden
pub const DEFAULT_MODEL: &str = "moonshotai/kimi-k2-instruct";
/// Environment variable overriding the report model
pub const MODEL_ENV: &str = "STOCK_ANALYZER_MODEL";
/// Environment variable overriding the sampling temperature
pub const TEMPERATURE_ENV: &str = "STOCK_ANALYZER_TEMPERATURE";

/// History ranges Yahoo's chart endpoint accepts
pub const VALID_RANGES: &[&str] = &[
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

/// Configuration for one analyzer session
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Groq API key; reports are unavailable without it
    pub groq_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    pub groq_api_base: String,

    /// Report model
    pub model: String,

    /// Sampling temperature for the report
    pub temperature: f32,

    /// Token cap for the report, `None` for the provider default
    pub max_tokens: Option<usize>,

    /// Price history range shown in the price tab
    pub history_range: String,

    /// Timeout for Yahoo Finance requests
    pub request_timeout: Duration,

    /// Timeout for the report request
    pub llm_timeout: Duration,

    /// Business summary characters forwarded to the model
    pub summary_max_chars: usize,

    /// Rows kept from the tail of price history and recommendations
    pub recent_rows: usize,

    /// Most recent quarters kept per financial statement
    pub statement_quarters: usize,

    /// Web search results requested per analysis
    pub web_results: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            groq_api_base: DEFAULT_GROQ_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.6,
            max_tokens: None,
            history_range: "1y".to_string(),
            request_timeout: Duration::from_secs(30),
            llm_timeout: Duration::from_secs(180),
            summary_max_chars: 1000,
            recent_rows: 5,
            statement_quarters: 2,
            web_results: 3,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    /// Defaults overlaid with the environment
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Whether a usable API key is present
    pub fn has_api_key(&self) -> bool {
        self.groq_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Provider configuration, if a key is present
    pub fn groq_config(&self) -> Option<GroqConfig> {
        if !self.has_api_key() {
            return None;
        }
        self.groq_api_key.as_ref().map(|key| {
            GroqConfig::new(key.clone())
                .with_api_base(self.groq_api_base.clone())
                .with_timeout(self.llm_timeout.as_secs())
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(StockError::ConfigError("model must not be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(StockError::ConfigError(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if !VALID_RANGES.contains(&self.history_range.as_str()) {
            return Err(StockError::ConfigError(format!(
                "invalid history range '{}', expected one of {}",
                self.history_range,
                VALID_RANGES.join(", ")
            )));
        }

        if self.recent_rows == 0 || self.statement_quarters == 0 {
            return Err(StockError::ConfigError(
                "recent_rows and statement_quarters must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AnalyzerConfig
#[derive(Debug, Default)]
pub struct AnalyzerConfigBuilder {
    groq_api_key: Option<String>,
    groq_api_base: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
    history_range: Option<String>,
    request_timeout: Option<Duration>,
    llm_timeout: Option<Duration>,
    summary_max_chars: Option<usize>,
    recent_rows: Option<usize>,
    statement_quarters: Option<usize>,
    web_results: Option<usize>,
    env_error: Option<String>,
}

impl AnalyzerConfigBuilder {
    /// Set the Groq API key
    pub fn groq_api_key(mut self, key: impl Into<String>) -> Self {
        self.groq_api_key = Some(key.into());
        self
    }

    /// Set the API base URL
    pub fn groq_api_base(mut self, base: impl Into<String>) -> Self {
        self.groq_api_base = Some(base.into());
        self
    }

    /// Set the report model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap the report length
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the price history range
    pub fn history_range(mut self, range: impl Into<String>) -> Self {
        self.history_range = Some(range.into());
        self
    }

    /// Set the Yahoo request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the report request timeout
    pub fn llm_timeout(mut self, duration: Duration) -> Self {
        self.llm_timeout = Some(duration);
        self
    }

    /// Set how much of the business summary reaches the model
    pub fn summary_max_chars(mut self, chars: usize) -> Self {
        self.summary_max_chars = Some(chars);
        self
    }

    /// Set the tail length for price and recommendation tables
    pub fn recent_rows(mut self, rows: usize) -> Self {
        self.recent_rows = Some(rows);
        self
    }

    /// Set the number of statement quarters kept
    pub fn statement_quarters(mut self, quarters: usize) -> Self {
        self.statement_quarters = Some(quarters);
        self
    }

    /// Set the number of web results requested
    pub fn web_results(mut self, results: usize) -> Self {
        self.web_results = Some(results);
        self
    }

    /// Fill unset fields from the environment
    ///
    /// Explicit builder values win over environment values.
    pub fn with_env(self) -> Self {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    /// Fill unset fields from variables returned by `lookup`
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.groq_api_key.is_none() {
            self.groq_api_key = lookup(API_KEY_ENV);
        }
        if self.groq_api_base.is_none() {
            self.groq_api_base = lookup(API_BASE_ENV);
        }
        if self.model.is_none() {
            self.model = lookup(MODEL_ENV);
        }
        if self.temperature.is_none() {
            if let Some(raw) = lookup(TEMPERATURE_ENV) {
                match raw.trim().parse::<f32>() {
                    Ok(value) => self.temperature = Some(value),
                    Err(_) => {
                        self.env_error =
                            Some(format!("{TEMPERATURE_ENV} is not a number: '{raw}'"));
                    }
                }
            }
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalyzerConfig> {
        if let Some(message) = self.env_error {
            return Err(StockError::ConfigError(message));
        }

        let defaults = AnalyzerConfig::default();

        let config = AnalyzerConfig {
            groq_api_key: self.groq_api_key.filter(|key| !key.trim().is_empty()),
            groq_api_base: self.groq_api_base.unwrap_or(defaults.groq_api_base),
            model: self.model.unwrap_or(defaults.model),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.or(defaults.max_tokens),
            history_range: self.history_range.unwrap_or(defaults.history_range),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            llm_timeout: self.llm_timeout.unwrap_or(defaults.llm_timeout),
            summary_max_chars: self.summary_max_chars.unwrap_or(defaults.summary_max_chars),
            recent_rows: self.recent_rows.unwrap_or(defaults.recent_rows),
            statement_quarters: self.statement_quarters.unwrap_or(defaults.statement_quarters),
            web_results: self.web_results.unwrap_or(defaults.web_results),
        };

        config.validate()?;
        Ok(config)
    }
}
