//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod config_cmd;
mod fetch;
mod helpers;
mod llm;
mod pages;
mod rewrite;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::export::ExportFormat;
use crate::llm::Tone;

#[derive(Parser)]
#[command(name = "metarewrite")]
#[command(about = "Search Console keyword triage and SEO title/meta rewrites")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Input file and per-run analysis overrides shared by the pipeline commands.
#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    /// Search Console export (CSV with Page, Query, Clicks, Impressions, CTR, Position)
    input: PathBuf,

    /// Minimum impressions for the Ghost tier and for any action
    #[arg(long)]
    impression_threshold: Option<u64>,

    /// CTR reference line in percent (reported only)
    #[arg(long)]
    ctr_threshold: Option<f64>,

    /// Maximum keywords kept per page (at least 1)
    #[arg(
        long,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    max_keywords: Option<usize>,
}

impl AnalysisArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(threshold) = self.impression_threshold {
            config.analysis.impression_threshold = threshold;
        }
        if let Some(threshold) = self.ctr_threshold {
            config.analysis.ctr_threshold = threshold;
        }
        if let Some(max) = self.max_keywords {
            config.analysis.max_keywords_per_page = max;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Classify keywords and assign action codes
    Analyze {
        #[command(flatten)]
        args: AnalysisArgs,
        /// Write the focus keyword table to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format (guessed from the file extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,
    },

    /// Build per-page keyword summaries with current title and meta description
    Pages {
        #[command(flatten)]
        args: AnalysisArgs,
        /// Skip fetching current titles and meta descriptions
        #[arg(long)]
        no_fetch: bool,
        /// Write the page summaries to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format (guessed from the file extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,
    },

    /// Run the full pipeline and write title/meta suggestions
    Run {
        #[command(flatten)]
        args: AnalysisArgs,
        /// Writing tone for generated copy
        #[arg(short, long, value_enum)]
        tone: Option<Tone>,
        /// LLM model (overrides config)
        #[arg(short, long)]
        model: Option<String>,
        /// Output file
        #[arg(short, long, default_value = "seo_suggestions.csv")]
        output: PathBuf,
        /// Output format (guessed from the file extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,
    },

    /// Fetch the current title and meta description of one page
    Fetch {
        /// Page URL
        url: String,
    },

    /// List writing tone presets
    Tones,

    /// List available LLM models
    LlmModels,

    /// Print the effective configuration as TOML
    Config,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = helpers::load_config(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Analyze {
            args,
            output,
            format,
        } => {
            args.apply(&mut config);
            analyze::cmd_analyze(&config, &args.input, output.as_deref(), format).await
        }
        Commands::Pages {
            args,
            no_fetch,
            output,
            format,
        } => {
            args.apply(&mut config);
            pages::cmd_pages(&config, &args.input, no_fetch, output.as_deref(), format).await
        }
        Commands::Run {
            args,
            tone,
            model,
            output,
            format,
        } => {
            args.apply(&mut config);
            if let Some(tone) = tone {
                config.analysis.tone = tone;
            }
            if let Some(ref model) = model {
                config.llm = config.llm.with_model(model);
            }
            rewrite::cmd_run(&config, &args.input, &output, format).await
        }
        Commands::Fetch { url } => fetch::cmd_fetch(&config, &url).await,
        Commands::Tones => {
            llm::cmd_tones(&config);
            Ok(())
        }
        Commands::LlmModels => llm::cmd_llm_models(&config).await,
        Commands::Config => config_cmd::cmd_config_show(&config),
    }
}
