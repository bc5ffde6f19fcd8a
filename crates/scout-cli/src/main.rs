use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use scout_agent::{Mode, ResearchConfig, Supervisor};
use scout_core::Reasoner;
use scout_providers::{HttpFetcher, OpenAiReasoner, SerperSearch};

mod config;

use config::Config;

/// Log level for tracing output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Verbose: reasoner requests, action execution details
    Debug,
    /// Standard: high-level run flow
    Info,
    /// Quiet: only warnings and errors
    Warn,
    /// Minimal: only errors
    Error,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Produce a single short answer.
    ShortAnswer,
    /// Produce a multi-section article.
    Report,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::ShortAnswer => Mode::ShortAnswer,
            ModeArg::Report => Mode::Report,
        }
    }
}

#[derive(Parser)]
#[command(name = "scout")]
#[command(author, version, about = "Scout: an autonomous web research agent", long_about = None)]
pub struct Cli {
    /// The research question to answer
    pub question: String,

    /// Run variant: a short answer or a structured report
    #[arg(long, value_enum, default_value = "short-answer")]
    pub mode: ModeArg,

    /// Maximum number of actions before forced synthesis (overrides config)
    #[arg(long)]
    pub max_interactions: Option<u32>,

    /// Log level (debug, info, warn, error)
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Path to a config file (default: ~/.config/scout/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the full transcript as JSON after the result
    #[arg(long)]
    pub show_transcript: bool,
}

fn make_reasoner(config: &config::ReasonerConfig, model: Option<&str>) -> Arc<dyn Reasoner> {
    let mut reasoner = OpenAiReasoner::new(config.api_key.clone().unwrap_or_default());
    if let Some(base_url) = &config.base_url {
        reasoner = reasoner.with_base_url(base_url);
    }
    if let Some(model) = model {
        reasoner = reasoner.with_default_model(model);
    }
    Arc::new(reasoner)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.clone())?;

    let mut research: ResearchConfig = config.research.clone();
    if let Some(max_interactions) = cli.max_interactions {
        research.max_interactions = max_interactions;
    }

    let decision = make_reasoner(&config.reasoner, config.reasoner.supervisor_model.as_deref());
    let writer = make_reasoner(&config.reasoner, config.reasoner.writer_model.as_deref());
    let planner = make_reasoner(&config.reasoner, config.reasoner.planner_model.as_deref());
    let search = Arc::new(SerperSearch::new(
        config.search.api_key.clone().unwrap_or_default(),
    ));
    let fetcher = Arc::new(HttpFetcher::new());

    let supervisor = Supervisor::new(decision, search, fetcher, research)
        .with_writer(writer)
        .with_planner(planner);

    let outcome = supervisor
        .run(&cli.question, cli.mode.into())
        .await
        .context("research run failed")?;

    println!("{}", outcome.result);

    if cli.show_transcript {
        let transcript = serde_json::to_string_pretty(&outcome.transcript)?;
        eprintln!("\n--- transcript ({} interactions) ---", outcome.interaction_count);
        eprintln!("{transcript}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_mode_conversion() {
        assert_eq!(Mode::from(ModeArg::ShortAnswer), Mode::ShortAnswer);
        assert_eq!(Mode::from(ModeArg::Report), Mode::Report);
    }
}
