//! LLM integration for title and meta description suggestions.

mod client;
mod generator;
mod tone;

pub use client::{
    render_page_prompt, LlmClient, LlmConfig, LlmError, LlmProvider, DEFAULT_PAGE_PROMPT,
    DEFAULT_SYSTEM_PROMPT,
};
pub use generator::{LlmSuggestionGenerator, SuggestionGenerator};
pub use tone::Tone;
