//! scout-agent: the research control loop.
//!
//! A [`Supervisor`] drives one research question through an iterative
//! decide/dispatch loop against a shared [`RunState`], then synthesizes
//! the final deliverable. Reasoning, search, and page fetching are
//! consumed through the traits in `scout-core`; this crate contains no
//! network code of its own.

pub mod actions;
pub mod config;
pub mod dispatch;
pub mod extract;
pub mod index;
pub mod outline;
pub mod prompts;
pub mod state;
pub mod supervisor;

pub use actions::Action;
pub use config::ResearchConfig;
pub use dispatch::{ActionContext, UNFETCHABLE};
pub use extract::extract_context;
pub use index::FragmentIndex;
pub use outline::extract_outline;
pub use state::{Mode, RunOutcome, RunState};
pub use supervisor::Supervisor;
