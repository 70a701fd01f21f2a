//! Single page fetch command.

use console::style;

use crate::config::Config;
use crate::scrapers::HttpPageFetcher;

/// Fetch and print one page's title and meta description.
pub async fn cmd_fetch(config: &Config, url: &str) -> anyhow::Result<()> {
    let fetcher = HttpPageFetcher::new(&config.scrape)?;

    match fetcher.try_fetch(url).await {
        Ok(meta) => {
            println!("{:<18} {}", "Title:", meta.title);
            println!("{:<18} {}", "Meta description:", meta.meta_description);
            if meta.is_empty() {
                println!(
                    "{} Page has no title or meta description",
                    style("!").yellow()
                );
            }
        }
        Err(e) => {
            println!("{} Failed to fetch {}: {}", style("✗").red(), url, e);
        }
    }

    Ok(())
}
