//! Page scraping and suggestion generation.
//!
//! Both stages run with bounded concurrency and report progress over an
//! mpsc channel. Failures are per page and never abort the batch.

use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::analysis::{merge_suggestions, summarize_pages, Analysis, GenerationOutcome};
use crate::llm::{SuggestionGenerator, Tone};
use crate::models::{PageMeta, PageSummary, SuggestionRow};
use crate::scrapers::PageFetcher;

/// Events emitted while scraping and generating.
#[derive(Debug, Clone)]
pub enum RewriteEvent {
    /// Scraping started
    FetchStarted { total_pages: usize },
    /// A page was fetched (metadata may be empty)
    PageFetched { page: String, found: bool },
    /// Generation started
    GenerationStarted { total_pages: usize },
    /// A suggestion was produced for a page
    SuggestionGenerated { url_id: u32, page: String },
    /// Generation failed for a page
    SuggestionFailed {
        url_id: u32,
        page: String,
        error: String,
    },
    /// Generation finished
    Complete { succeeded: usize, failed: usize },
}

/// Fetch title and meta description for each distinct page.
///
/// Every requested page has an entry in the result; failed fetches
/// map to empty metadata.
pub async fn fetch_page_meta<F: PageFetcher + ?Sized>(
    fetcher: &F,
    pages: &[String],
    concurrency: usize,
    event_tx: mpsc::Sender<RewriteEvent>,
) -> HashMap<String, PageMeta> {
    let mut seen = HashSet::with_capacity(pages.len());
    let unique: Vec<&str> = pages
        .iter()
        .map(String::as_str)
        .filter(|page| seen.insert(*page))
        .collect();

    let _ = event_tx
        .send(RewriteEvent::FetchStarted {
            total_pages: unique.len(),
        })
        .await;

    let fetched: Vec<(String, PageMeta)> = stream::iter(unique)
        .map(|page| {
            let event_tx = event_tx.clone();
            async move {
                let meta = fetcher.fetch(page).await;
                let _ = event_tx
                    .send(RewriteEvent::PageFetched {
                        page: page.to_string(),
                        found: !meta.is_empty(),
                    })
                    .await;
                (page.to_string(), meta)
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let found = fetched.iter().filter(|(_, meta)| !meta.is_empty()).count();
    info!("Fetched metadata for {}/{} pages", found, fetched.len());

    fetched.into_iter().collect()
}

/// Runs the network-bound stages of the pipeline.
pub struct RewriteService<F, G> {
    fetcher: F,
    generator: G,
    fetch_concurrency: usize,
    generate_concurrency: usize,
}

impl<F: PageFetcher, G: SuggestionGenerator> RewriteService<F, G> {
    pub fn new(fetcher: F, generator: G) -> Self {
        Self {
            fetcher,
            generator,
            fetch_concurrency: 4,
            generate_concurrency: 2,
        }
    }

    /// Set parallelism for scraping and generation (minimum 1 each).
    pub fn with_concurrency(mut self, fetch: usize, generate: usize) -> Self {
        self.fetch_concurrency = fetch.max(1);
        self.generate_concurrency = generate.max(1);
        self
    }

    /// Fetch title and meta description for each distinct page.
    pub async fn fetch_page_meta(
        &self,
        pages: &[String],
        event_tx: mpsc::Sender<RewriteEvent>,
    ) -> HashMap<String, PageMeta> {
        fetch_page_meta(&self.fetcher, pages, self.fetch_concurrency, event_tx).await
    }

    /// Generate a suggestion for each summary, keyed by `url_id`.
    pub async fn generate(
        &self,
        summaries: &[PageSummary],
        tone: Tone,
        event_tx: mpsc::Sender<RewriteEvent>,
    ) -> HashMap<u32, GenerationOutcome> {
        let _ = event_tx
            .send(RewriteEvent::GenerationStarted {
                total_pages: summaries.len(),
            })
            .await;

        let outcomes: Vec<(u32, GenerationOutcome)> = stream::iter(summaries)
            .map(|summary| {
                let event_tx = event_tx.clone();
                async move {
                    debug!("Generating suggestion for {}", summary.page);
                    let outcome = match self.generator.generate(summary, tone).await {
                        Ok(text) => {
                            let _ = event_tx
                                .send(RewriteEvent::SuggestionGenerated {
                                    url_id: summary.url_id,
                                    page: summary.page.clone(),
                                })
                                .await;
                            Ok(text)
                        }
                        Err(e) => {
                            let error = format!("{:#}", e);
                            warn!("Generation failed for {}: {}", summary.page, error);
                            let _ = event_tx
                                .send(RewriteEvent::SuggestionFailed {
                                    url_id: summary.url_id,
                                    page: summary.page.clone(),
                                    error: error.clone(),
                                })
                                .await;
                            Err(error)
                        }
                    };
                    (summary.url_id, outcome)
                }
            })
            .buffer_unordered(self.generate_concurrency)
            .collect()
            .await;

        let failed = outcomes.iter().filter(|(_, o)| o.is_err()).count();
        let _ = event_tx
            .send(RewriteEvent::Complete {
                succeeded: outcomes.len() - failed,
                failed,
            })
            .await;

        outcomes.into_iter().collect()
    }

    /// Scrape, summarize, generate and merge for every actionable page.
    ///
    /// Always yields one row per summarized page. A page whose generation
    /// failed carries the error row instead of a suggestion.
    pub async fn suggest(
        &self,
        analysis: &Analysis,
        max_keywords: usize,
        tone: Tone,
        event_tx: mpsc::Sender<RewriteEvent>,
    ) -> Vec<SuggestionRow> {
        let pages = analysis.actionable_pages();
        let metas = self.fetch_page_meta(&pages, event_tx.clone()).await;
        let summaries = summarize_pages(&analysis.records, &metas, max_keywords);
        let outcomes = self.generate(&summaries, tone, event_tx).await;
        merge_suggestions(summaries, &outcomes)
    }
}
