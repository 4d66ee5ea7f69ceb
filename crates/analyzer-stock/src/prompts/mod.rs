//! Prompt templates for the report generator
//!
//! - `system`: the system message
//! - `report`: the user message carrying the stock summary and report brief

mod report;
mod system;

pub use report::{REPORT_TEMPLATE, ReportContext, render_report_prompt};
pub use system::SYSTEM_PROMPT;

use crate::error::Result;
use minijinja::Environment;
use serde::Serialize;

/// Render a template string against a serializable context
pub(crate) fn render<S: Serialize>(template: &str, context: &S) -> Result<String> {
    let env = Environment::new();
    let value = minijinja::value::Value::from_serialize(context);
    Ok(env.render_str(template, value)?)
}
