//! Page summary command.

use std::collections::HashMap;
use std::path::Path;

use console::style;
use tokio::sync::mpsc;

use crate::analysis::summarize_pages;
use crate::config::Config;
use crate::export::{create_output, write_page_summaries, ExportFormat};
use crate::scrapers::HttpPageFetcher;
use crate::services::{fetch_page_meta, RewriteEvent};

use super::helpers::{load_analysis, print_warnings, spawn_progress, truncate};

/// Summarize actionable keywords per page, optionally with current metadata.
pub async fn cmd_pages(
    config: &Config,
    input: &Path,
    no_fetch: bool,
    output: Option<&Path>,
    format: Option<ExportFormat>,
) -> anyhow::Result<()> {
    let analysis = load_analysis(config, input)?;
    print_warnings(&analysis);

    let pages = analysis.actionable_pages();
    if pages.is_empty() {
        println!("{} No actionable keywords found", style("!").yellow());
    }

    let metas = if no_fetch || pages.is_empty() {
        HashMap::new()
    } else {
        let fetcher = HttpPageFetcher::new(&config.scrape)?;
        let (event_tx, event_rx) = mpsc::channel::<RewriteEvent>(100);
        let event_handler = spawn_progress(event_rx);
        let metas =
            fetch_page_meta(&fetcher, &pages, config.scrape.concurrency, event_tx).await;
        let _ = event_handler.await;
        metas
    };

    let summaries = summarize_pages(
        &analysis.records,
        &metas,
        config.analysis.max_keywords_per_page,
    );

    if let Some(path) = output {
        let format = format.unwrap_or_else(|| ExportFormat::from_path(path));
        write_page_summaries(create_output(path)?, &summaries, format)?;
        println!(
            "{} Wrote {} page summaries to {}",
            style("✓").green(),
            summaries.len(),
            path.display()
        );
        return Ok(());
    }

    for summary in &summaries {
        println!(
            "\n{} {}",
            style(format!("[{}]", summary.url_id)).cyan(),
            style(&summary.page).bold()
        );
        if !summary.current_title.is_empty() {
            println!("  {:<8} {}", "Title:", truncate(&summary.current_title, 80));
        }
        if !summary.current_meta.is_empty() {
            println!("  {:<8} {}", "Meta:", truncate(&summary.current_meta, 80));
        }
        for (keyword, tier) in summary.keywords.iter().zip(&summary.keyword_importance) {
            println!("  {} {} ({})", style("·").dim(), keyword, tier);
        }
    }

    Ok(())
}
