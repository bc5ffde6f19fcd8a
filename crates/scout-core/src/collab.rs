//! Boundary traits for the external search and fetch collaborators.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One ranked result from the search provider. Provider order is the
/// authoritative rank and is preserved through extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub rank: usize,
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Execute a search. May legitimately return an empty list.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, Error>;
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page as plain text. Callers degrade failures to a
    /// sentinel value; a fetch error never aborts a run.
    async fn fetch(&self, url: &str) -> Result<String, Error>;
}
