//! Shared helper functions for CLI commands.

use std::path::Path;

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::analysis::{analyze, Analysis};
use crate::config::Config;
use crate::input::read_records_from_path;
use crate::services::RewriteEvent;

/// Load config from an explicit path, or auto-discover it.
pub async fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::load_from_path(path)
                .await
                .map_err(|e| anyhow::anyhow!(e))
        }
        None => Ok(Config::load().await),
    }
}

/// Read an export and run keyword analysis with the configured thresholds.
pub fn load_analysis(config: &Config, input: &Path) -> anyhow::Result<Analysis> {
    let records = read_records_from_path(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    Ok(analyze(&records, &config.analysis.params()))
}

/// Print batch warnings.
pub fn print_warnings(analysis: &Analysis) {
    for warning in analysis.warnings() {
        eprintln!("{} {}", style("!").yellow(), warning);
    }
}

/// Truncate a string for display, respecting char boundaries.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// Format a CTR fraction as a percentage.
pub fn percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}%", v * 100.0))
        .unwrap_or_else(|| "n/a".to_string())
}

fn progress_bar(total: usize, message: &'static str) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    progress.set_message(message);
    progress
}

/// Spawn the progress display for a rewrite run.
pub fn spawn_progress(mut event_rx: mpsc::Receiver<RewriteEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut progress: Option<ProgressBar> = None;

        while let Some(event) = event_rx.recv().await {
            match event {
                RewriteEvent::FetchStarted { total_pages } => {
                    if let Some(previous) = progress.take() {
                        previous.finish_and_clear();
                    }
                    progress = Some(progress_bar(total_pages, "Fetching pages..."));
                }
                RewriteEvent::PageFetched { page, found } => {
                    if let Some(ref pb) = progress {
                        if !found {
                            pb.println(format!(
                                "{} No title or meta description found for {}",
                                style("!").yellow(),
                                page
                            ));
                        }
                        pb.set_message(truncate(&page, 50));
                        pb.inc(1);
                    }
                }
                RewriteEvent::GenerationStarted { total_pages } => {
                    if let Some(previous) = progress.take() {
                        previous.finish_and_clear();
                    }
                    progress = Some(progress_bar(total_pages, "Generating suggestions..."));
                }
                RewriteEvent::SuggestionGenerated { page, .. } => {
                    if let Some(ref pb) = progress {
                        pb.set_message(truncate(&page, 50));
                        pb.inc(1);
                    }
                }
                RewriteEvent::SuggestionFailed { page, error, .. } => {
                    if let Some(ref pb) = progress {
                        pb.println(format!("{} {}: {}", style("✗").red(), page, error));
                        pb.inc(1);
                    }
                }
                RewriteEvent::Complete { succeeded, failed } => {
                    if let Some(pb) = progress.take() {
                        pb.finish_and_clear();
                    }
                    println!(
                        "{} Generated {} suggestions ({} failed)",
                        style("✓").green(),
                        succeeded,
                        failed
                    );
                }
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }
    })
}
