//! Shared run state, owned by the supervisor and threaded through every
//! dispatched action.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use scout_core::Message;

use crate::index::FragmentIndex;

/// Run variant: a single final answer, or an evolving multi-section
/// article backed by a retrieval index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    ShortAnswer,
    Report,
}

/// All mutable state of one research run.
///
/// The transcript is append-only; `url_cache` keys are write-once; the
/// fragment index only grows. Nothing here outlives the run.
pub struct RunState {
    pub research_question: String,
    pub transcript: Vec<Message>,
    pub interaction_count: u32,
    pub research_complete: bool,
    pub url_cache: HashMap<String, String>,
    pub executed_queries: HashSet<String>,
    pub index: FragmentIndex,
    pub article: String,
    pub outline: String,
    pub plan: String,
    pub final_result: Option<String>,
    mode: Mode,
}

impl RunState {
    pub fn new(research_question: impl Into<String>, mode: Mode) -> Self {
        Self {
            research_question: research_question.into(),
            transcript: Vec::new(),
            interaction_count: 0,
            research_complete: false,
            url_cache: HashMap::new(),
            executed_queries: HashSet::new(),
            index: FragmentIndex::new(),
            article: String::new(),
            outline: String::new(),
            plan: String::new(),
            final_result: None,
            mode,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Append one message to the transcript. The transcript is never
    /// reordered or truncated.
    pub fn push(&mut self, message: Message) {
        self.transcript.push(message);
    }

    /// Memoize fetched page content. A populated key is never
    /// overwritten; the first write wins.
    pub fn cache_page(&mut self, url: impl Into<String>, content: impl Into<String>) {
        self.url_cache.entry(url.into()).or_insert_with(|| content.into());
    }

    pub fn cached_page(&self, url: &str) -> Option<&str> {
        self.url_cache.get(url).map(String::as_str)
    }
}

/// What a run hands back to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub result: String,
    pub transcript: Vec<Message>,
    pub interaction_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = RunState::new("What is Rust?", Mode::ShortAnswer);
        assert_eq!(state.research_question, "What is Rust?");
        assert_eq!(state.interaction_count, 0);
        assert!(!state.research_complete);
        assert!(state.transcript.is_empty());
        assert!(state.final_result.is_none());
        assert_eq!(state.mode(), Mode::ShortAnswer);
    }

    #[test]
    fn test_cache_page_is_write_once() {
        let mut state = RunState::new("q", Mode::ShortAnswer);
        state.cache_page("https://example.com", "first");
        state.cache_page("https://example.com", "second");
        assert_eq!(state.cached_page("https://example.com"), Some("first"));
        assert_eq!(state.url_cache.len(), 1);
    }

    #[test]
    fn test_transcript_appends_in_order() {
        let mut state = RunState::new("q", Mode::Report);
        state.push(Message::system("a"));
        state.push(Message::system("b"));
        assert_eq!(state.transcript.len(), 2);
        assert_eq!(state.transcript[0].content, "a");
        assert_eq!(state.transcript[1].content, "b");
    }
}
