//! Upstream LLM access for the chat relay

pub mod client;
pub mod prompt_builder;
pub mod relay;

// Re-export main types for convenience
pub use client::{CompletionApi, CompletionRequest, HttpCompletionClient};
pub use relay::{ChatRelay, FALLBACK_REPLY};
