//! LLM integration module.
//!
//! Provides the HTTP client for the generative service, the adapter that
//! binds a working model at startup, and the prompts used for reference
//! generation and judging.

mod adapter;
mod client;
mod prompts;

#[cfg(test)]
pub(crate) mod testing;

pub use adapter::{GenerativeAdapter, TextGenerator};
pub use client::{CONNECTION_TEST_PROMPT, LlmClient, LlmResponse, TokenUsage};
pub use prompts::Prompts;
