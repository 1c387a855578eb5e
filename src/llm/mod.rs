//! LLM integration for candidate rationales

pub mod client;
pub mod prompts;
pub mod summarizer;

pub use client::{CompletionProvider, OpenAiClient};
pub use summarizer::CandidateSummarizer;
