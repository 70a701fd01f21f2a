//! LLM and tone listing commands.

use console::style;

use crate::config::Config;
use crate::llm::{LlmClient, Tone};

/// Show LLM configuration and the models available at the endpoint.
pub async fn cmd_llm_models(config: &Config) -> anyhow::Result<()> {
    let llm = &config.llm;
    let client = LlmClient::new(llm.clone())?;

    println!("\n{}", style("LLM Configuration").bold());
    println!("{}", "-".repeat(40));
    println!("{:<20} {}", "Provider:", llm.provider.as_str());
    println!("{:<20} {}", "Endpoint:", llm.effective_endpoint());
    println!("{:<20} {}", "Current Model:", llm.effective_model());
    println!("{:<20} {}", "Max Tokens:", llm.max_tokens);
    println!("{:<20} {:.2}", "Temperature:", llm.temperature);
    println!("{:<20} {}", "Concurrency:", llm.concurrency);

    println!("\n{}", style("Available Models").bold());
    println!("{}", "-".repeat(40));

    match client.list_models().await {
        Ok(models) => {
            if models.is_empty() {
                println!("  No models available");
            } else {
                for model in models {
                    let marker = if model == llm.effective_model() {
                        style("*").green().to_string()
                    } else {
                        " ".to_string()
                    };
                    println!("{} {}", marker, model);
                }
            }
        }
        Err(e) => {
            println!("{} Failed to list models: {}", style("✗").red(), e);
        }
    }

    Ok(())
}

/// List tone presets, marking the configured default.
pub fn cmd_tones(config: &Config) {
    println!("\n{}", style("Writing Tones").bold());
    println!("{}", "-".repeat(40));
    for tone in Tone::ALL {
        let marker = if tone == config.analysis.tone {
            style("*").green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "{} {:<16} {}",
            marker,
            tone.as_str(),
            style(tone.display_name()).dim()
        );
    }
}
