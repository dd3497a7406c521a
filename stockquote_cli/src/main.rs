mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stockquote_lib::{Config, LookupFacade, RetryPolicy};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "stockquote")]
#[command(about = "Look up, log and average daily stock prices")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Retry transient network failures this many times
    #[arg(long, default_value = "0", global = true)]
    retries: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the latest price (closing, else opening)
    Price(commands::price::PriceArgs),
    /// Show the latest opening price, optionally logging it
    Open(commands::open::OpenArgs),
    /// Show the daily opening-price history, optionally saving it
    History(commands::history::HistoryArgs),
    /// Average the stored prices for a symbol
    Average(commands::average::AverageArgs),
    /// Follow a ticker for a user
    Track(commands::track::TrackArgs),
    /// List a user's followed tickers
    Watchlist(commands::track::WatchlistArgs),
}

/// Log targets enabled at `info` unless `RUST_LOG` says otherwise.
const DEFAULT_DIRECTIVES: [&str; 2] = ["stockquote=info", "alphavantage_api=info"];

fn default_filter() -> Result<EnvFilter> {
    let mut filter = EnvFilter::from_default_env();
    for directive in DEFAULT_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(default_filter()?)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = OutputFormat::parse(&cli.output);
    let retry = RetryPolicy::default().with_max_retries(cli.retries);

    let config = Config::from_env();
    let facade = LookupFacade::new(&config);

    match &cli.command {
        Commands::Price(args) => commands::price::run(args, &facade, &retry, &format).await?,
        Commands::Open(args) => commands::open::run(args, &facade, &retry, &format).await?,
        Commands::History(args) => commands::history::run(args, &facade, &retry, &format).await?,
        Commands::Average(args) => commands::average::run(args, &facade, &format)?,
        Commands::Track(args) => commands::track::run_track(args, &facade, &format).await?,
        Commands::Watchlist(args) => {
            commands::track::run_watchlist(args, &facade, &format).await?
        }
    }

    Ok(())
}
