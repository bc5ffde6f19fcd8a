//! scout-providers: concrete collaborators behind the scout-core traits.
//!
//! An OpenAI-compatible reasoner, a Serper.dev search provider, and a
//! plain-HTTP page fetcher. The agent crate never depends on these
//! directly; the host wires them in.

pub mod fetch;
pub mod openai;
pub mod serper;

pub use fetch::HttpFetcher;
pub use openai::OpenAiReasoner;
pub use serper::SerperSearch;
