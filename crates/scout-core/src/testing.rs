//! Test utilities shared across the workspace.
//! Only compiled when running tests or with the `testing` feature.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::collab::{PageFetcher, SearchHit, SearchProvider};
use crate::error::Error;
use crate::message::{Message, ToolCall};
use crate::reasoner::{Reasoner, ReasoningRequest, ReasoningResponse};

/// A mock reasoner that returns pre-configured responses.
pub struct MockReasoner {
    outcomes: Mutex<Vec<Result<ReasoningResponse, Error>>>,
    /// Captured requests (for assertion).
    pub captured_requests: Mutex<Vec<ReasoningRequest>>,
}

impl MockReasoner {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(Vec::new()),
            captured_requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a plain-text response (no action selected).
    /// Responses are returned in FIFO order (first queued = first returned).
    pub fn queue_text(&self, content: &str) {
        self.queue_raw(Ok(ReasoningResponse {
            message: Message::assistant(content),
            model: "mock-model".to_string(),
        }));
    }

    /// Queue a response selecting one action.
    pub fn queue_tool_call(&self, name: &str, arguments: Value) {
        let call = ToolCall::new(format!("call_{}", self.queued()), name, arguments);
        self.queue_raw(Ok(ReasoningResponse {
            message: Message::assistant_with_tool_calls("", vec![call]),
            model: "mock-model".to_string(),
        }));
    }

    /// Queue an error outcome.
    pub fn queue_error(&self, error: Error) {
        self.queue_raw(Err(error));
    }

    pub fn queue_raw(&self, outcome: Result<ReasoningResponse, Error>) {
        self.outcomes.lock().unwrap().insert(0, outcome);
    }

    pub fn request_count(&self) -> usize {
        self.captured_requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ReasoningRequest> {
        self.captured_requests.lock().unwrap().last().cloned()
    }

    fn queued(&self) -> usize {
        self.outcomes.lock().unwrap().len()
    }
}

impl Default for MockReasoner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Reasoner for MockReasoner {
    fn name(&self) -> &str {
        "mock"
    }

    fn default_model(&self) -> Option<&str> {
        None
    }

    async fn complete(&self, request: ReasoningRequest) -> Result<ReasoningResponse, Error> {
        self.captured_requests.lock().unwrap().push(request);
        match self.outcomes.lock().unwrap().pop() {
            Some(outcome) => outcome,
            None => Err(Error::invalid_request("No mock response queued")),
        }
    }
}

/// A mock search provider returning canned hits for every query.
pub struct MockSearch {
    hits: Vec<SearchHit>,
    /// Queries seen, in order.
    pub queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// A provider that finds nothing.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn search_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, Error> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }
}

/// A mock page fetcher serving an in-memory URL -> content map.
pub struct MockFetcher {
    pages: HashMap<String, String>,
    /// Per-URL fetch counts (for write-once cache assertions).
    pub fetch_counts: Mutex<HashMap<String, usize>>,
}

impl MockFetcher {
    pub fn new(pages: HashMap<String, String>) -> Self {
        Self {
            pages,
            fetch_counts: Mutex::new(HashMap::new()),
        }
    }

    pub fn fetches_for(&self, url: &str) -> usize {
        self.fetch_counts.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetch_counts.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, Error> {
        *self
            .fetch_counts
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;
        match self.pages.get(url) {
            Some(content) => Ok(content.clone()),
            None => Err(Error::fetch(format!("no page for '{}'", url))),
        }
    }
}
