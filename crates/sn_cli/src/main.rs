use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use clap::Parser;
use sn_core::{PeriodLabel, QuoteSource, Result};
use sn_inference::models::AVAILABLE_MODELS;
use sn_inference::{create_model, ArticleGenerator};
use sn_quotes::{CloudQuoteConfig, CloudQuoteSource};
use sn_writer::Newsroom;
use tracing::info;

mod config;
mod logging;
mod output;

use config::Secrets;

#[derive(Parser, Debug)]
#[command(author, version, about = "Writes short market articles from live stock quotes", long_about = None)]
pub struct Cli {
    #[arg(long, default_value = "openai", help = "Model backend to use. Available models: openai (default), dummy")]
    model: String,
    /// Model identifier sent to the backend (defaults to gpt-3.5-turbo)
    #[arg(long)]
    model_name: Option<String>,
    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    model_url: Option<String>,
    /// Base URL of the CloudQuote API
    #[arg(long)]
    quote_url: Option<String>,
    /// Seconds to wait after each generation
    #[arg(long, default_value_t = 10)]
    pause_secs: u64,
    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Show the latest quote for a symbol
    Quote { symbol: String },
    /// Write an article for a symbol
    Article {
        symbol: String,
        /// Force a period instead of deriving it from the clock (Mid-day, Pre-market, Post-market, Market-Closed)
        #[arg(long)]
        period: Option<PeriodLabel>,
        /// Print the prompt without calling the model
        #[arg(long)]
        dry_run: bool,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the trading period for now, or for an RFC 3339 instant
    Period {
        #[arg(long)]
        at: Option<DateTime<FixedOffset>>,
    },
}

fn quote_source(cli: &Cli, secrets: &Secrets) -> Result<Arc<dyn QuoteSource>> {
    let mut config = CloudQuoteConfig::new(secrets.quote_key()?)
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    if let Some(url) = &cli.quote_url {
        config = config.with_base_url(url.clone());
    }
    Ok(Arc::new(CloudQuoteSource::new(config)?))
}

fn article_generator(cli: &Cli, secrets: &Secrets) -> Result<ArticleGenerator> {
    let api_key = if cli.model.eq_ignore_ascii_case("openai") {
        Some(secrets.model_key()?)
    } else {
        secrets.openai_api_key.clone()
    };
    let config = sn_inference::Config {
        backend: cli.model.clone(),
        api_key,
        model_name: cli.model_name.clone(),
        base_url: cli.model_url.clone(),
        timeout: Duration::from_secs(cli.timeout_secs),
    };
    let model = create_model(&config)?;
    info!("🧠 Text generation ready (using {})", model.name());
    Ok(ArticleGenerator::new(model).with_pause(Duration::from_secs(cli.pause_secs)))
}

async fn run(cli: Cli) -> Result<()> {
    let secrets = Secrets::from_env();

    match &cli.command {
        Commands::Period { at } => {
            let now = at.map(|t| t.with_timezone(&Utc)).unwrap_or_else(Utc::now);
            println!("{}", sn_writer::classify_instant(&now));
        }
        Commands::Quote { symbol } => {
            let quotes = quote_source(&cli, &secrets)?;
            let quote = sn_writer::newsroom::fetch_quote(quotes.as_ref(), symbol).await?;
            for line in output::quote_lines(&quote) {
                println!("{}", line);
            }
        }
        Commands::Article { symbol, period, dry_run, json } => {
            // both secrets are checked before any request goes out
            let quotes = quote_source(&cli, &secrets)?;
            let generator = article_generator(&cli, &secrets)?;
            let room = Newsroom::new(quotes, generator);

            let now = Utc::now();
            let report = if *dry_run {
                room.draft(symbol, *period, now).await?
            } else {
                room.write(symbol, *period, now).await?
            };

            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for line in output::report_lines(now, &report, *dry_run) {
                    println!("{}", line);
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    tracing::debug!("Known model backends: {}", AVAILABLE_MODELS.join(", "));

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
