//! Keyword analysis command.

use std::path::Path;

use console::style;

use crate::config::Config;
use crate::export::{create_output, write_focus_records, ExportFormat};
use crate::models::KeywordRecord;

use super::helpers::{load_analysis, percent, print_warnings};

/// Classify keywords and report tier and action counts.
pub async fn cmd_analyze(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    format: Option<ExportFormat>,
) -> anyhow::Result<()> {
    let analysis = load_analysis(config, input)?;
    print_warnings(&analysis);

    println!("\n{}", style("Keyword Analysis").bold());
    println!("{}", "-".repeat(40));
    println!("{:<24} {}", "Records:", analysis.records.len());
    println!(
        "{:<24} {}",
        "Impression threshold:",
        analysis.params.impression_threshold
    );
    println!("{:<24} {}", "Average CTR (focus):", percent(analysis.avg_ctr));
    println!(
        "{:<24} {:.2}%",
        "CTR reference line:", config.analysis.ctr_threshold
    );

    println!("\n{}", style("Keyword Importance").bold());
    println!("{}", "-".repeat(40));
    for (tier, count) in analysis.tier_counts() {
        println!("{:<24} {}", format!("{}:", tier), count);
    }

    println!("\n{}", style("Actions (focus keywords)").bold());
    println!("{}", "-".repeat(40));
    for (code, count) in analysis.action_counts() {
        println!("{:<24} {}", format!("{}:", code), count);
    }

    let pages = analysis.actionable_pages();
    println!(
        "\n{} {} actionable keywords across {} pages",
        style("→").cyan(),
        analysis.actionable().count(),
        pages.len()
    );

    if let Some(path) = output {
        let focus: Vec<KeywordRecord> = analysis.focus().cloned().collect();
        let format = format.unwrap_or_else(|| ExportFormat::from_path(path));
        write_focus_records(create_output(path)?, &focus, format)?;
        println!(
            "{} Wrote {} focus keywords to {}",
            style("✓").green(),
            focus.len(),
            path.display()
        );
    }

    Ok(())
}
