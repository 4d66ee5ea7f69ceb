//! Chat-completion layer for stock-analyzer
//!
//! This crate provides the provider-agnostic pieces the report generator talks
//! to:
//!
//! - Message types for chat communication
//! - Completion request/response types
//! - The [`LLMProvider`] trait
//! - An OpenAI-compatible provider pointed at Groq by default

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, FinishReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

#[cfg(any(test, feature = "mock"))]
pub use provider::MockLLMProvider;
