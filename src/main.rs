// Command-line entry point: read a run input, crawl, write a JSON-lines dataset.

use anyhow::{Context, Result};
use clap::Parser;
use kodegen_tools_pagescrape::{ActorInput, JsonLinesSink, ScrapeConfig, StartUrlEntry, crawl};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "kodegen-pagescrape", version, about = "Scrape public page profiles with a headless browser")]
struct Cli {
    /// JSON run input (startUrls, maxRequestsPerCrawl, maxConcurrency, ...)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Page URL or bare page identifier; repeatable, appended to the input's startUrls
    #[arg(short, long = "url")]
    urls: Vec<String>,

    /// Dataset file, one JSON record per line
    #[arg(short, long, default_value = "dataset.jsonl")]
    output: PathBuf,

    #[arg(long)]
    max_requests: Option<usize>,

    #[arg(long)]
    max_concurrency: Option<usize>,

    #[arg(long)]
    max_retries: Option<u32>,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(long)]
    debug: bool,

    /// Show the browser window
    #[arg(long)]
    headed: bool,
}

impl Cli {
    async fn load_input(&self) -> Result<ActorInput> {
        let mut input = match &self.input {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read input {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid run input in {}", path.display()))?
            }
            None => ActorInput::default(),
        };

        input
            .start_urls
            .extend(self.urls.iter().cloned().map(StartUrlEntry::Url));
        if let Some(max) = self.max_requests {
            input.max_requests_per_crawl = max;
        }
        if let Some(max) = self.max_concurrency {
            input.max_concurrency = max;
        }
        if let Some(retries) = self.max_retries {
            input.max_retries = retries;
        }
        input.debug_log |= self.debug;
        if self.headed {
            input.headless = false;
        }
        Ok(input)
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug {
        "info,kodegen_tools_pagescrape=debug,pagescrape=debug"
    } else {
        "info,chromiumoxide=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let input = cli.load_input().await?;
    init_logging(input.debug_log);

    let config = ScrapeConfig::from_input(input)?;
    tracing::info!(
        "Starting crawl of {} page(s), writing to {}",
        config.start_urls().len(),
        cli.output.display()
    );

    let sink = JsonLinesSink::create(&cli.output).await?;
    let summary = crawl(config, &sink).await?;

    tracing::info!(
        "Crawl finished: {} records ({} succeeded, {} failed), {} retries, {} abandoned",
        summary.records_emitted(),
        summary.succeeded,
        summary.failed,
        summary.retries,
        summary.abandoned
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
