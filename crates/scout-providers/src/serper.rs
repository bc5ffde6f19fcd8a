//! Web search via the Serper.dev Google-search API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use scout_core::{Error, SearchHit, SearchProvider};

const SERPER_URL: &str = "https://google.serper.dev/search";

pub struct SerperSearch {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl SerperSearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("scout/0.1.0")
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: SERPER_URL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperOrganic>,
}

#[derive(Deserialize)]
struct SerperOrganic {
    position: usize,
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

fn convert_results(response: SerperResponse) -> Vec<SearchHit> {
    response
        .organic
        .into_iter()
        .map(|result| SearchHit {
            rank: result.position,
            title: result.title,
            url: result.link,
            snippet: result.snippet,
        })
        .collect()
}

#[async_trait]
impl SearchProvider for SerperSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, Error> {
        let request = SerperRequest {
            q: query,
            num: max_results,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::search(format!("search request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::search(format!("search API error {status}: {body}")));
        }

        let parsed: SerperResponse = response
            .json()
            .await
            .map_err(|e| Error::search(format!("failed to parse search response: {e}")))?;

        let hits = convert_results(parsed);
        debug!(query, results = hits.len(), "Search completed");
        Ok(hits)
    }
}
