//! Shared utilities for stock-analyzer
//!
//! Logging setup and the small text helpers the renderers and prompt builder
//! share.

pub mod logging;
pub mod text;

pub use logging::{LogFormat, init_tracing, init_tracing_with};
pub use text::{truncate_chars, truncate_with_ellipsis};
