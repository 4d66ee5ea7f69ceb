//! System message for the report model

/// Sent as the system message of every report request
pub const SYSTEM_PROMPT: &str = "You are a financial analyst AI. Generate reports in Markdown.";
