//! scout-core: Core types and traits for scout
//!
//! This crate provides the foundational types and traits used throughout
//! the scout research agent: the transcript message model, the error
//! taxonomy, the reasoning-service trait with bounded retry, action
//! schema types, and the search/fetch collaborator traits.

pub mod collab;
pub mod error;
pub mod message;
pub mod reasoner;
pub mod tool;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use collab::{PageFetcher, SearchHit, SearchProvider};
pub use error::Error;
pub use message::{render_transcript, Message, Role, ToolCall};
pub use reasoner::{complete_with_retry, Reasoner, ReasoningRequest, ReasoningResponse};
pub use tool::{PropertySchema, ToolDefinition, ToolParameters};

pub type Result<T> = std::result::Result<T, Error>;
