//! AI report generation

use crate::config::AnalyzerConfig;
use crate::error::{Result, StockError};
use crate::prompts::{SYSTEM_PROMPT, render_report_prompt};
use crate::snapshot::StockSnapshot;
use analyzer_llm::providers::GroqProvider;
use analyzer_llm::{CompletionRequest, FinishReason, LLMError, LLMProvider, Message};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Turns a snapshot into a Markdown report through a chat-completion provider
pub struct ReportGenerator {
    provider: Option<Arc<dyn LLMProvider>>,
    config: Arc<AnalyzerConfig>,
}

impl ReportGenerator {
    pub fn new(provider: Option<Arc<dyn LLMProvider>>, config: Arc<AnalyzerConfig>) -> Self {
        Self { provider, config }
    }

    /// Groq-backed generator; without an API key every request fails with
    /// [`StockError::MissingCredential`]
    pub fn from_config(config: Arc<AnalyzerConfig>) -> Result<Self> {
        let provider = match config.groq_config() {
            Some(groq) => Some(Arc::new(GroqProvider::with_config(groq)?) as Arc<dyn LLMProvider>),
            None => None,
        };
        Ok(Self::new(provider, config))
    }

    /// Whether a provider is available
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Generate the report for `snapshot`
    #[instrument(skip_all, fields(ticker = %snapshot.ticker))]
    pub async fn generate(&self, snapshot: &StockSnapshot, web_results: &[String]) -> Result<String> {
        let provider = self.provider.as_ref().ok_or(StockError::MissingCredential)?;

        let prompt = render_report_prompt(snapshot, web_results, &self.config)?;

        let mut builder = CompletionRequest::builder(self.config.model.clone())
            .system(SYSTEM_PROMPT)
            .add_message(Message::user(prompt))
            .temperature(self.config.temperature);
        if let Some(max_tokens) = self.config.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }

        info!(model = %self.config.model, provider = provider.name(), "Generating report");
        let response = provider.complete(builder.build()).await?;

        if response.finish_reason == FinishReason::Length {
            warn!("Report was cut off at the token limit");
        }
        info!(tokens = response.usage.total(), "Report generated");

        if response.message.is_blank() {
            return Err(LLMError::UnexpectedResponse("model returned an empty report".to_string()).into());
        }
        Ok(response.message.text().to_string())
    }
}
