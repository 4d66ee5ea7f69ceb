//! Groq provider implementation
//!
//! Groq serves an OpenAI-compatible chat-completions API, so this provider
//! speaks the OpenAI wire format and works against any compatible base URL.
//! See: https://console.groq.com/docs/openai
//!
//! # Examples
//!
//! ```no_run
//! use analyzer_llm::{CompletionRequest, LLMProvider, Message};
//! use analyzer_llm::providers::GroqProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GROQ_API_KEY (and GROQ_API_BASE when set)
//!     let provider = GroqProvider::from_env()?;
//!
//!     let request = CompletionRequest::builder("moonshotai/kimi-k2-instruct")
//!         .system("You are a financial analyst AI. Generate reports in Markdown.")
//!         .add_message(Message::user("Summarise AAPL"))
//!         .temperature(0.6)
//!         .build();
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.message.text());
//!     Ok(())
//! }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, FinishReason, LLMError, LLMProvider, Message, Result,
    Role, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Default Groq endpoint for OpenAI-compatible requests
pub const DEFAULT_GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GROQ_API_KEY";
/// Environment variable overriding the API base URL
pub const API_BASE_ENV: &str = "GROQ_API_BASE";

/// Configuration for the Groq provider
#[derive(Clone)]
pub struct GroqConfig {
    /// API key for bearer authentication
    pub api_key: String,

    /// Base URL, without the trailing `/chat/completions`
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl GroqConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_GROQ_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the API key from `GROQ_API_KEY`; a blank value counts as unset.
    /// Optionally reads the base URL from `GROQ_API_BASE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`GroqConfig::from_env`], reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LLMError::ConfigurationError(format!("{API_KEY_ENV} environment variable not set"))
            })?;

        let api_base =
            lookup(API_BASE_ENV).unwrap_or_else(|| DEFAULT_GROQ_API_BASE.to_string());

        Ok(Self {
            api_key,
            api_base,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

// Keeps the key out of logs and panics.
impl std::fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Groq chat-completions provider
pub struct GroqProvider {
    client: Client,
    config: GroqConfig,
}

impl GroqProvider {
    /// Create a provider with custom configuration
    pub fn with_config(config: GroqConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider with API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GroqConfig::new(api_key))
    }

    /// Create a provider from `GROQ_API_KEY` / `GROQ_API_BASE`
    pub fn from_env() -> Result<Self> {
        Self::with_config(GroqConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &GroqConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for GroqProvider {
    #[instrument(skip(self, request), fields(model = %request.model, api_base = %self.config.api_base))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending chat completion request");

        let chat_request = ChatRequest {
            model: request.model.clone(),
            messages: build_chat_messages(request.system, request.messages),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&chat_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 => LLMError::AuthenticationFailed,
                429 => LLMError::RateLimitExceeded(error_text),
                400 => LLMError::InvalidRequest(error_text),
                404 => LLMError::ModelNotFound(request.model),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

        into_completion(chat_response)
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

// ============================================================================
// Conversion functions
// ============================================================================

/// System prompt goes first in the messages array
fn build_chat_messages(system: Option<String>, messages: Vec<Message>) -> Vec<ChatMessage> {
    system
        .map(|content| ChatMessage {
            role: Role::System.as_str(),
            content,
        })
        .into_iter()
        .chain(messages.into_iter().map(|msg| ChatMessage {
            role: msg.role.as_str(),
            content: msg.content,
        }))
        .collect()
}

fn into_completion(response: ChatResponse) -> Result<CompletionResponse> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LLMError::UnexpectedResponse("No choices in response".to_string()))?;

    let finish_reason = FinishReason::from_wire(choice.finish_reason.as_deref());
    if finish_reason == FinishReason::Length {
        warn!("Completion hit the token limit; report may be truncated");
    }

    let usage = response
        .usage
        .map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    debug!(
        ?finish_reason,
        input_tokens = usage.input_tokens,
        output_tokens = usage.output_tokens,
        "Received chat completion"
    );

    Ok(CompletionResponse {
        message: Message::assistant(choice.message.content.unwrap_or_default()),
        finish_reason,
        usage,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest::builder("moonshotai/kimi-k2-instruct")
            .system("You are a financial analyst AI.")
            .add_message(Message::user("Report on AAPL"))
            .temperature(0.6)
            .build()
    }

    fn provider_for(server: &MockServer) -> GroqProvider {
        GroqProvider::with_config(GroqConfig::new("test-key").with_api_base(server.base_url()))
            .unwrap()
    }

    #[test]
    fn test_provider_creation() {
        let provider = GroqProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.config().api_key, "test-key");
        assert_eq!(provider.config().api_base, DEFAULT_GROQ_API_BASE);
        assert_eq!(provider.config().timeout_secs, 120);
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", GroqConfig::new("gsk_secret"));
        assert!(!rendered.contains("gsk_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_completions_url_trims_slash() {
        let config = GroqConfig::new("k").with_api_base("http://localhost:8000/v1/");
        assert_eq!(
            config.completions_url(),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[test]
    fn test_system_message_first() {
        let messages = build_chat_messages(
            Some("be terse".to_string()),
            vec![Message::user("hi")],
        );
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "be terse");
        assert_eq!(messages[1].role, "user");
    }

    #[test]
    fn test_empty_choices_is_unexpected() {
        let response = ChatResponse {
            choices: vec![],
            usage: None,
        };
        assert!(matches!(
            into_completion(response),
            Err(LLMError::UnexpectedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .header("authorization", "Bearer test-key");
                then.status(200).json_body(json!({
                    "choices": [{
                        "message": {"role": "assistant", "content": "## Company Overview\nApple..."},
                        "finish_reason": "stop"
                    }],
                    "usage": {"prompt_tokens": 812, "completion_tokens": 640}
                }));
            })
            .await;

        let response = provider_for(&server).complete(request()).await.unwrap();

        mock.assert_async().await;
        assert!(response.message.text().starts_with("## Company Overview"));
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage.total(), 1452);
    }

    #[tokio::test]
    async fn test_complete_maps_status_codes() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(401).body(r#"{"error":{"message":"Invalid API Key"}}"#);
            })
            .await;

        let err = provider_for(&server).complete(request()).await.unwrap_err();
        assert!(matches!(err, LLMError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_complete_rate_limited() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(429).body("slow down");
            })
            .await;

        let err = provider_for(&server).complete(request()).await.unwrap_err();
        match err {
            LLMError::RateLimitExceeded(body) => assert_eq!(body, "slow down"),
            other => panic!("Expected RateLimitExceeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_unknown_model() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(404).body("model not found");
            })
            .await;

        let err = provider_for(&server).complete(request()).await.unwrap_err();
        match err {
            LLMError::ModelNotFound(model) => assert_eq!(model, "moonshotai/kimi-k2-instruct"),
            other => panic!("Expected ModelNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_bad_request() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(400).body("temperature out of range");
            })
            .await;

        let err = provider_for(&server).complete(request()).await.unwrap_err();
        match err {
            LLMError::InvalidRequest(body) => assert_eq!(body, "temperature out of range"),
            other => panic!("Expected InvalidRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_server_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(500).body("upstream exploded");
            })
            .await;

        let err = provider_for(&server).complete(request()).await.unwrap_err();
        match err {
            LLMError::RequestFailed(message) => {
                assert!(message.starts_with("HTTP 500"));
                assert!(message.ends_with("upstream exploded"));
            }
            other => panic!("Expected RequestFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_config_from_lookup() {
        let config = GroqConfig::from_lookup(|name| match name {
            API_KEY_ENV => Some("gsk_env".to_string()),
            API_BASE_ENV => Some("http://localhost:9000/v1".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.api_key, "gsk_env");
        assert_eq!(config.api_base, "http://localhost:9000/v1");
        assert_eq!(config.timeout_secs, 120);

        let config = GroqConfig::from_lookup(|name| {
            (name == API_KEY_ENV).then(|| "gsk_env".to_string())
        })
        .unwrap();
        assert_eq!(config.api_base, DEFAULT_GROQ_API_BASE);
    }

    #[test]
    fn test_config_blank_key_is_unset() {
        let err = GroqConfig::from_lookup(|_| Some("   ".to_string())).unwrap_err();
        assert!(matches!(err, LLMError::ConfigurationError(_)));

        let err = GroqConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, LLMError::ConfigurationError(_)));
    }
}
