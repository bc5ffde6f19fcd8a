//! The supervisor control loop.
//!
//! Drives one research run through `START -> DECIDE -> DISPATCH -> ... ->
//! SYNTHESIZE -> DONE`. The budget and completion checks happen before the
//! reasoner is invoked, so a run performs at most `max_interactions`
//! dispatches and `max_interactions + 1` decision calls.

use std::sync::Arc;

use tracing::{debug, info, warn};

use scout_core::{
    complete_with_retry, render_transcript, Message, PageFetcher, Reasoner, ReasoningRequest,
    Result, SearchProvider,
};

use crate::actions::Action;
use crate::config::ResearchConfig;
use crate::dispatch::{dispatch, ActionContext};
use crate::prompts;
use crate::state::{Mode, RunOutcome, RunState};

pub struct Supervisor {
    decision: Arc<dyn Reasoner>,
    writer: Arc<dyn Reasoner>,
    planner: Arc<dyn Reasoner>,
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn PageFetcher>,
    config: ResearchConfig,
}

impl Supervisor {
    /// Build a supervisor using one reasoner for every role. Use
    /// [`with_writer`](Self::with_writer) and
    /// [`with_planner`](Self::with_planner) to split roles across models.
    pub fn new(
        reasoner: Arc<dyn Reasoner>,
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn PageFetcher>,
        config: ResearchConfig,
    ) -> Self {
        Self {
            decision: reasoner.clone(),
            writer: reasoner.clone(),
            planner: reasoner,
            search,
            fetcher,
            config,
        }
    }

    pub fn with_writer(mut self, writer: Arc<dyn Reasoner>) -> Self {
        self.writer = writer;
        self
    }

    pub fn with_planner(mut self, planner: Arc<dyn Reasoner>) -> Self {
        self.planner = planner;
        self
    }

    /// Run one research question to completion.
    ///
    /// Every leaf fault is absorbed below this call except reasoner retry
    /// exhaustion during a decision, planning, or synthesis turn, which
    /// fails the run.
    pub async fn run(&self, research_question: &str, mode: Mode) -> Result<RunOutcome> {
        let mut state = RunState::new(research_question, mode);
        info!(?mode, question = research_question, "Starting research run");

        if mode == Mode::Report {
            let request = ReasoningRequest::new(vec![Message::system(prompts::research_plan(
                research_question,
            ))]);
            let response =
                complete_with_retry(&*self.planner, request, self.config.max_retries).await?;
            state.plan = response.message.content;
            debug!(plan_len = state.plan.len(), "Generated research plan");
        }

        loop {
            // DECIDE. Checked before the reasoner call, so the loop
            // terminates regardless of what the reasoner selects.
            if state.research_complete {
                debug!("Research marked complete; moving to synthesis");
                break;
            }
            if state.interaction_count >= self.config.max_interactions {
                debug!(
                    interactions = state.interaction_count,
                    "Interaction budget exhausted; moving to synthesis"
                );
                break;
            }

            if state.transcript.is_empty() {
                let bootstrap = match mode {
                    Mode::ShortAnswer => prompts::supervisor_bootstrap(
                        research_question,
                        self.config.max_interactions,
                    ),
                    Mode::Report => {
                        prompts::supervisor_bootstrap_report(research_question, &state.plan)
                    }
                };
                state.push(Message::system(bootstrap));
            } else {
                state.push(Message::system(prompts::NEXT_ACTION));
            }

            let request = ReasoningRequest::new(state.transcript.clone())
                .with_tools(Action::definitions(mode));
            let response =
                complete_with_retry(&*self.decision, request, self.config.max_retries).await?;

            let calls = response.message.tool_calls;
            let Some(call) = calls.first().cloned() else {
                debug!("No action selected; moving to synthesis");
                break;
            };
            if calls.len() > 1 {
                warn!(
                    count = calls.len(),
                    "Reasoner selected multiple actions; using the first"
                );
            }
            state.push(Message::assistant_with_tool_calls("", vec![call.clone()]));

            // DISPATCH: exactly one result message, one budget unit.
            let ctx = ActionContext {
                writer: &*self.writer,
                search: &*self.search,
                fetcher: &*self.fetcher,
                config: &self.config,
            };
            let result = dispatch(&ctx, &mut state, &call).await;
            state.push(Message::tool_result(&call.id, result));
            state.interaction_count += 1;
        }

        // SYNTHESIZE.
        let result = self.synthesize(&mut state).await?;
        info!(
            interactions = state.interaction_count,
            "Research run finished"
        );
        Ok(RunOutcome {
            result,
            transcript: state.transcript,
            interaction_count: state.interaction_count,
        })
    }

    async fn synthesize(&self, state: &mut RunState) -> Result<String> {
        // A short-answer `complete` already supplied the deliverable.
        if let Some(result) = &state.final_result {
            return Ok(result.clone());
        }

        let prompt = match state.mode() {
            Mode::ShortAnswer => prompts::summarize_solution(
                &state.research_question,
                &render_transcript(&state.transcript),
            ),
            Mode::Report => {
                prompts::final_refinement(&state.research_question, &state.article)
            }
        };
        let request = ReasoningRequest::new(vec![Message::system(prompt)]);
        let response =
            complete_with_retry(&*self.writer, request, self.config.max_retries).await?;
        let result = response.message.content;
        state.final_result = Some(result.clone());
        Ok(result)
    }
}
