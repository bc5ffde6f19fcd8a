//! Execution of dispatched actions against the shared run state.
//!
//! Each action reads and mutates [`RunState`] and produces exactly one
//! result string; the supervisor appends it to the transcript and bumps
//! the interaction count. Faults inside an action degrade to corrective
//! result messages — only the supervisor's own reasoner calls may abort
//! a run.

use serde::Serialize;
use tracing::{debug, warn};

use scout_core::{
    complete_with_retry, render_transcript, Error, Message, PageFetcher, Reasoner,
    ReasoningRequest, SearchProvider, ToolCall,
};

use crate::actions::Action;
use crate::config::ResearchConfig;
use crate::extract::extract_context;
use crate::outline::extract_outline;
use crate::prompts;
use crate::state::{Mode, RunState};

/// Memoized in the URL cache when a page cannot be fetched; such results
/// fall back to their snippet.
pub const UNFETCHABLE: &str = "Can not fetch the page content.";

/// Collaborators an action may call out to.
pub struct ActionContext<'a> {
    pub writer: &'a dyn Reasoner,
    pub search: &'a dyn SearchProvider,
    pub fetcher: &'a dyn PageFetcher,
    pub config: &'a ResearchConfig,
}

impl ActionContext<'_> {
    async fn invoke_writer(&self, prompt: String) -> Result<String, Error> {
        let request = ReasoningRequest::new(vec![Message::system(prompt)]);
        complete_with_retry(self.writer, request, self.config.max_retries)
            .await
            .map(|response| response.message.content)
    }
}

/// Decode and execute one selected action, returning its result message.
pub async fn dispatch(ctx: &ActionContext<'_>, state: &mut RunState, call: &ToolCall) -> String {
    match Action::decode(call) {
        Err(correction) => {
            debug!(action = %call.name, "Malformed action arguments");
            correction
        }
        Ok(action) => {
            debug!(action = action.name(), "Dispatching action");
            match action {
                Action::Search { query } => run_search(ctx, state, &query).await,
                Action::WriteSection { title, goal } => {
                    run_write_section(ctx, state, &title, &goal).await
                }
                Action::CheckArticle => run_check_article(ctx, state).await,
                Action::EditArticle { instruction } => {
                    run_edit_article(ctx, state, &instruction).await
                }
                Action::Complete { final_answer } => run_complete(state, final_answer),
            }
        }
    }
}

#[derive(Serialize)]
struct SearchResult {
    title: String,
    url: String,
    snippet: String,
    content: String,
}

fn format_search_results(results: &[SearchResult]) -> String {
    let mut out = String::new();
    for (i, result) in results.iter().enumerate() {
        out.push_str(&format!("***Web Page {}:***\n", i + 1));
        if let Ok(json) = serde_json::to_string_pretty(result) {
            out.push_str(&json);
        }
        out.push('\n');
    }
    out
}

async fn run_search(ctx: &ActionContext<'_>, state: &mut RunState, query: &str) -> String {
    if query.trim().is_empty() {
        return "The search query must not be empty.".to_string();
    }
    if state.mode() == Mode::ShortAnswer && state.executed_queries.contains(query) {
        return "You have already searched for this query.".to_string();
    }

    // What the search is meant to establish, judged from the transcript.
    let intent = match ctx
        .invoke_writer(prompts::search_intent(&render_transcript(&state.transcript)))
        .await
    {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "Search-intent generation failed; continuing without it");
            String::new()
        }
    };

    let hits = match ctx.search.search(query, ctx.config.search_top_k).await {
        Ok(hits) => hits,
        Err(err) => {
            warn!(error = %err, query, "Search provider failed");
            return format!("The search failed ({err}). Try again or rephrase the query.");
        }
    };
    if state.mode() == Mode::ShortAnswer {
        state.executed_queries.insert(query.to_string());
    }
    if hits.is_empty() {
        return "The search returned no results.".to_string();
    }

    for hit in &hits {
        if state.cached_page(&hit.url).is_none() {
            let content = match ctx.fetcher.fetch(&hit.url).await {
                Ok(text) => text,
                Err(err) => {
                    debug!(url = %hit.url, error = %err, "Fetch failed; using snippet");
                    UNFETCHABLE.to_string()
                }
            };
            state.cache_page(&hit.url, content);
        }
    }

    // Provider rank order is preserved; higher ranks get wider windows.
    let mut results = Vec::with_capacity(hits.len());
    for (i, hit) in hits.iter().enumerate() {
        let raw = state.cached_page(&hit.url).unwrap_or(UNFETCHABLE);
        let content = if raw == UNFETCHABLE {
            hit.snippet.clone()
        } else {
            extract_context(raw, &hit.snippet, ctx.config.window_for_rank(i))
        };
        results.push(SearchResult {
            title: hit.title.clone(),
            url: hit.url.clone(),
            snippet: hit.snippet.clone(),
            content,
        });
    }

    let formatted = format_search_results(&results);
    let information = match ctx
        .invoke_writer(prompts::extract_information(query, &intent, &formatted))
        .await
    {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "Information extraction failed; returning raw results");
            formatted
        }
    };

    if state.mode() == Mode::Report {
        state
            .index
            .add_documents(results.into_iter().map(|r| r.content).collect());
    }
    information
}

async fn run_write_section(
    ctx: &ActionContext<'_>,
    state: &mut RunState,
    title: &str,
    goal: &str,
) -> String {
    let query = format!("{title} {goal}");
    let documents: String = state
        .index
        .top_k(&query, ctx.config.retrieve_k)
        .iter()
        .enumerate()
        .map(|(i, doc)| format!("Document {}:\n{}\n\n", i, doc))
        .collect();

    let prompt = prompts::write_section(
        &state.research_question,
        &render_transcript(&state.transcript),
        &state.outline,
        title,
        goal,
        &documents,
    );
    match ctx.invoke_writer(prompt).await {
        Ok(section) => {
            if !state.article.is_empty() && !state.article.ends_with('\n') {
                state.article.push('\n');
            }
            state.article.push_str(&section);
            if !state.article.ends_with('\n') {
                state.article.push('\n');
            }
            state.outline = extract_outline(&state.article);
            "Section written.".to_string()
        }
        Err(err) => format!("Drafting the section failed ({err}). Try again."),
    }
}

async fn run_check_article(ctx: &ActionContext<'_>, state: &mut RunState) -> String {
    if !state.article.starts_with("# ") {
        let prompt = prompts::article_title(&state.research_question, &state.article);
        match ctx.invoke_writer(prompt).await {
            Ok(title) => {
                state.article = format!("# {}\n{}", title.trim(), state.article);
            }
            Err(err) => return format!("Could not determine a title ({err}). Try again."),
        }
    }
    state.outline = extract_outline(&state.article);
    state.outline.clone()
}

async fn run_edit_article(
    ctx: &ActionContext<'_>,
    state: &mut RunState,
    instruction: &str,
) -> String {
    let prompt = prompts::edit_article(instruction, &state.article);
    match ctx.invoke_writer(prompt).await {
        Ok(edited) => {
            state.article = edited;
            "Edit done.".to_string()
        }
        Err(err) => format!("Editing the article failed ({err}). Try again."),
    }
}

fn run_complete(state: &mut RunState, final_answer: Option<String>) -> String {
    state.research_complete = true;
    match (state.mode(), final_answer) {
        (Mode::ShortAnswer, Some(answer)) => {
            // First completion wins; repeated calls are no-ops.
            if state.final_result.is_none() {
                state.final_result = Some(answer.clone());
            }
            format!("Final answer: {answer}")
        }
        _ => "Research complete.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::testing::{MockFetcher, MockReasoner, MockSearch};
    use scout_core::SearchHit;
    use serde_json::json;
    use std::collections::HashMap;

    fn hit(rank: usize, url: &str, snippet: &str) -> SearchHit {
        SearchHit {
            rank,
            title: format!("Page {rank}"),
            url: url.to_string(),
            snippet: snippet.to_string(),
        }
    }

    fn context<'a>(
        writer: &'a MockReasoner,
        search: &'a MockSearch,
        fetcher: &'a MockFetcher,
        config: &'a ResearchConfig,
    ) -> ActionContext<'a> {
        ActionContext {
            writer,
            search,
            fetcher,
            config,
        }
    }

    #[tokio::test]
    async fn test_search_dedup_short_circuits() {
        let writer = MockReasoner::new();
        let search = MockSearch::new(vec![hit(1, "https://a.test", "Paris is the capital.")]);
        let fetcher = MockFetcher::new(HashMap::from([(
            "https://a.test".to_string(),
            "Paris is the capital of France. More text follows.".to_string(),
        )]));
        let config = ResearchConfig::default();
        let ctx = context(&writer, &search, &fetcher, &config);

        let mut state = RunState::new("capital?", Mode::ShortAnswer);
        writer.queue_text("intent");
        writer.queue_text("Paris is the capital of France.");
        let first = run_search(&ctx, &mut state, "capital of France").await;
        assert_eq!(first, "Paris is the capital of France.");
        assert_eq!(search.search_count(), 1);

        let second = run_search(&ctx, &mut state, "capital of France").await;
        assert_eq!(second, "You have already searched for this query.");
        // No further provider or reasoner traffic on the duplicate.
        assert_eq!(search.search_count(), 1);
        assert_eq!(writer.request_count(), 2);
    }

    #[tokio::test]
    async fn test_search_caches_urls_write_once() {
        let writer = MockReasoner::new();
        let search = MockSearch::new(vec![hit(1, "https://a.test", "snippet")]);
        let fetcher = MockFetcher::new(HashMap::from([(
            "https://a.test".to_string(),
            "Some fetched page body.".to_string(),
        )]));
        let config = ResearchConfig::default();
        let ctx = context(&writer, &search, &fetcher, &config);

        // Report mode so the same query may be searched twice.
        let mut state = RunState::new("q", Mode::Report);
        for _ in 0..2 {
            writer.queue_text("intent");
            writer.queue_text("summary");
        }
        run_search(&ctx, &mut state, "query one").await;
        run_search(&ctx, &mut state, "query one").await;

        assert_eq!(search.search_count(), 2);
        assert_eq!(fetcher.fetches_for("https://a.test"), 1);
    }

    #[tokio::test]
    async fn test_search_degrades_fetch_failure_to_snippet() {
        let writer = MockReasoner::new();
        let search = MockSearch::new(vec![hit(1, "https://down.test", "the snippet text")]);
        let fetcher = MockFetcher::new(HashMap::new());
        let config = ResearchConfig::default();
        let ctx = context(&writer, &search, &fetcher, &config);

        let mut state = RunState::new("q", Mode::Report);
        writer.queue_text("intent");
        writer.queue_text("summary");
        run_search(&ctx, &mut state, "anything").await;

        assert_eq!(state.cached_page("https://down.test"), Some(UNFETCHABLE));
        // The snippet, not the sentinel, went into the retrieval index.
        let top = state.index.top_k("snippet text", 1);
        assert_eq!(top, vec!["the snippet text"]);
    }

    #[tokio::test]
    async fn test_search_empty_query_is_corrective() {
        let writer = MockReasoner::new();
        let search = MockSearch::empty();
        let fetcher = MockFetcher::new(HashMap::new());
        let config = ResearchConfig::default();
        let ctx = context(&writer, &search, &fetcher, &config);

        let mut state = RunState::new("q", Mode::ShortAnswer);
        let msg = run_search(&ctx, &mut state, "  ").await;
        assert!(msg.contains("must not be empty"));
        assert_eq!(search.search_count(), 0);
    }

    #[tokio::test]
    async fn test_search_information_extraction_failure_degrades() {
        let writer = MockReasoner::new();
        let search = MockSearch::new(vec![hit(1, "https://a.test", "snippet")]);
        let fetcher = MockFetcher::new(HashMap::from([(
            "https://a.test".to_string(),
            "Body text.".to_string(),
        )]));
        let config = ResearchConfig::default().with_max_retries(1);
        let ctx = context(&writer, &search, &fetcher, &config);

        let mut state = RunState::new("q", Mode::ShortAnswer);
        writer.queue_text("intent");
        writer.queue_error(Error::network("flaky"));
        let msg = run_search(&ctx, &mut state, "anything").await;
        // Falls back to the formatted raw results instead of failing the run.
        assert!(msg.contains("***Web Page 1:***"));
        assert!(state.executed_queries.contains("anything"));
    }

    #[tokio::test]
    async fn test_write_section_appends_and_recomputes_outline() {
        let writer = MockReasoner::new();
        let search = MockSearch::empty();
        let fetcher = MockFetcher::new(HashMap::new());
        let config = ResearchConfig::default();
        let ctx = context(&writer, &search, &fetcher, &config);

        let mut state = RunState::new("q", Mode::Report);
        writer.queue_text("## Background\nSome prose.");
        let msg = run_write_section(&ctx, &mut state, "Background", "explain origins").await;
        assert_eq!(msg, "Section written.");
        assert!(state.article.contains("## Background"));
        assert_eq!(state.outline, "## Background\n");

        // A second call appends; the document only grows.
        writer.queue_text("## Details\nMore prose.");
        run_write_section(&ctx, &mut state, "Details", "go deeper").await;
        assert_eq!(state.outline, "## Background\n## Details\n");
    }

    #[tokio::test]
    async fn test_check_article_prepends_title_once() {
        let writer = MockReasoner::new();
        let search = MockSearch::empty();
        let fetcher = MockFetcher::new(HashMap::new());
        let config = ResearchConfig::default();
        let ctx = context(&writer, &search, &fetcher, &config);

        let mut state = RunState::new("q", Mode::Report);
        state.article = "## Section\nBody.\n".to_string();

        writer.queue_text("A Fine Title");
        let outline = run_check_article(&ctx, &mut state).await;
        assert!(state.article.starts_with("# A Fine Title\n"));
        assert_eq!(outline, "# A Fine Title\n## Section\n");

        // Idempotent once a title exists: no reasoner call this time.
        let before = writer.request_count();
        let outline = run_check_article(&ctx, &mut state).await;
        assert_eq!(outline, "# A Fine Title\n## Section\n");
        assert_eq!(writer.request_count(), before);
    }

    #[tokio::test]
    async fn test_edit_article_replaces_document() {
        let writer = MockReasoner::new();
        let search = MockSearch::empty();
        let fetcher = MockFetcher::new(HashMap::new());
        let config = ResearchConfig::default();
        let ctx = context(&writer, &search, &fetcher, &config);

        let mut state = RunState::new("q", Mode::Report);
        state.article = "# Old\nOld body.\n".to_string();
        writer.queue_text("# New\nNew body.\n");
        let msg = run_edit_article(&ctx, &mut state, "rewrite it").await;
        assert_eq!(msg, "Edit done.");
        assert_eq!(state.article, "# New\nNew body.\n");
    }

    #[tokio::test]
    async fn test_complete_sets_flag_and_short_answer_result() {
        let mut state = RunState::new("q", Mode::ShortAnswer);
        let msg = run_complete(&mut state, Some("Paris".to_string()));
        assert!(state.research_complete);
        assert_eq!(state.final_result.as_deref(), Some("Paris"));
        assert!(msg.contains("Paris"));

        // Repeated completion does not overwrite the first answer.
        run_complete(&mut state, Some("London".to_string()));
        assert_eq!(state.final_result.as_deref(), Some("Paris"));
    }

    #[tokio::test]
    async fn test_complete_in_report_mode_keeps_result_unset() {
        let mut state = RunState::new("q", Mode::Report);
        let msg = run_complete(&mut state, Some("ignored".to_string()));
        assert!(state.research_complete);
        assert!(state.final_result.is_none());
        assert_eq!(msg, "Research complete.");
    }

    #[tokio::test]
    async fn test_dispatch_malformed_arguments_are_corrective() {
        let writer = MockReasoner::new();
        let search = MockSearch::empty();
        let fetcher = MockFetcher::new(HashMap::new());
        let config = ResearchConfig::default();
        let ctx = context(&writer, &search, &fetcher, &config);

        let mut state = RunState::new("q", Mode::ShortAnswer);
        let call = ToolCall::new("c1", "search", json!({"q": "typo"}));
        let msg = dispatch(&ctx, &mut state, &call).await;
        assert!(msg.contains("Invalid arguments"));
        assert_eq!(search.search_count(), 0);
    }
}
