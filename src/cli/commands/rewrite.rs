//! Full pipeline command.

use std::path::Path;

use console::style;
use tokio::sync::mpsc;
use tracing::warn;

use crate::config::Config;
use crate::export::{create_output, write_suggestions, ExportFormat};
use crate::llm::LlmSuggestionGenerator;
use crate::scrapers::HttpPageFetcher;
use crate::services::{RewriteEvent, RewriteService};

use super::helpers::{load_analysis, print_warnings, spawn_progress};

/// Analyze, scrape, generate and write the suggestions table.
pub async fn cmd_run(
    config: &Config,
    input: &Path,
    output: &Path,
    format: Option<ExportFormat>,
) -> anyhow::Result<()> {
    let format = format.unwrap_or_else(|| ExportFormat::from_path(output));
    let analysis = load_analysis(config, input)?;
    print_warnings(&analysis);

    let pages = analysis.actionable_pages();
    if pages.is_empty() {
        println!("{} No actionable keywords found", style("!").yellow());
        write_suggestions(create_output(output)?, &[], format)?;
        println!("{} Wrote empty table to {}", style("✓").green(), output.display());
        return Ok(());
    }

    println!(
        "{} {} actionable keywords across {} pages",
        style("→").cyan(),
        analysis.actionable().count(),
        pages.len()
    );

    let generator = LlmSuggestionGenerator::new(config.llm.clone())?;
    if generator.client().is_available().await {
        println!(
            "{} Connected to LLM at {} (model: {}, tone: {})",
            style("✓").green(),
            config.llm.effective_endpoint(),
            config.llm.effective_model(),
            config.analysis.tone
        );
    } else {
        // Model listing may be refused while completions still work.
        warn!(
            "Could not list models at {}, generating anyway",
            config.llm.effective_endpoint()
        );
        println!(
            "{} LLM model list unavailable at {}, trying generation anyway",
            style("!").yellow(),
            config.llm.effective_endpoint()
        );
    }

    let fetcher = HttpPageFetcher::new(&config.scrape)?;
    let service = RewriteService::new(fetcher, generator)
        .with_concurrency(config.scrape.concurrency, config.llm.concurrency);

    let (event_tx, event_rx) = mpsc::channel::<RewriteEvent>(100);
    let event_handler = spawn_progress(event_rx);

    let rows = service
        .suggest(
            &analysis,
            config.analysis.max_keywords_per_page,
            config.analysis.tone,
            event_tx,
        )
        .await;
    let _ = event_handler.await;

    write_suggestions(create_output(output)?, &rows, format)?;

    println!(
        "{} Wrote {} rows to {}",
        style("✓").green(),
        rows.len(),
        output.display()
    );

    Ok(())
}
