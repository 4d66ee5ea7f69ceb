//! Web search stage
//!
//! Only a placeholder exists today: [`SimulatedWebSearch`] never leaves the
//! process and always comes back empty.

use crate::error::Result;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Snippets requested per analysis when nothing else is configured
pub const DEFAULT_NUM_RESULTS: usize = 3;

/// Source of free-text web snippets about a stock
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Up to `num_results` snippets for `query`
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<String>>;

    /// Label shown next to the results
    fn name(&self) -> &'static str;
}

/// Search stand-in that returns no results
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedWebSearch;

#[async_trait]
impl WebSearch for SimulatedWebSearch {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<String>> {
        debug!(query, num_results, "Web search is simulated; returning no results");
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
