//! Suggestion generation backed by an [`LlmClient`].

use async_trait::async_trait;

use super::client::{render_page_prompt, LlmClient, LlmConfig, LlmError};
use super::tone::Tone;
use crate::models::PageSummary;

/// Produces raw "Title: ... / Meta Description: ..." text for a page.
#[async_trait]
pub trait SuggestionGenerator: Send + Sync {
    async fn generate(&self, summary: &PageSummary, tone: Tone) -> anyhow::Result<String>;
}

/// Generator that renders the page prompt and sends it to the configured LLM.
#[derive(Clone)]
pub struct LlmSuggestionGenerator {
    client: LlmClient,
}

impl LlmSuggestionGenerator {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: LlmClient::new(config)?,
        })
    }

    pub fn client(&self) -> &LlmClient {
        &self.client
    }
}

#[async_trait]
impl SuggestionGenerator for LlmSuggestionGenerator {
    async fn generate(&self, summary: &PageSummary, tone: Tone) -> anyhow::Result<String> {
        let config = self.client.config();
        let prompt = render_page_prompt(config.get_page_prompt(), summary, tone);
        let text = self
            .client
            .complete(config.get_system_prompt(), &prompt)
            .await?;
        Ok(text.trim().to_string())
    }
}
