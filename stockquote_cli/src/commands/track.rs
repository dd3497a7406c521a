//! The `track` and `watchlist` subcommands: follow tickers per user.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use stockquote_lib::{LookupFacade, TickerDb};

use crate::output::{print_tickers, OutputFormat};

#[derive(Args)]
pub struct TrackArgs {
    /// SQLite database path
    #[arg(long)]
    pub db: PathBuf,

    /// User email
    #[arg(long)]
    pub user: String,

    /// Ticker symbol to follow
    pub symbol: String,
}

#[derive(Args)]
pub struct WatchlistArgs {
    /// SQLite database path
    #[arg(long)]
    pub db: PathBuf,

    /// User email
    #[arg(long)]
    pub user: String,

    /// Look up fresh prices before listing
    #[arg(long)]
    pub refresh: bool,
}

pub async fn run_track(args: &TrackArgs, facade: &LookupFacade, format: &OutputFormat) -> Result<()> {
    let mut db = TickerDb::open(&args.db)?;
    db.init()?;

    let Some(ticker) = facade.find_or_create(&db, &args.symbol).await? else {
        bail!("{} could not be looked up", args.symbol);
    };
    db.track(&args.user, ticker.id)?;
    tracing::info!("{} now follows {}", args.user, ticker.ticker);

    print_tickers(&[ticker], format)
}

pub async fn run_watchlist(
    args: &WatchlistArgs,
    facade: &LookupFacade,
    format: &OutputFormat,
) -> Result<()> {
    let db = TickerDb::open(&args.db)?;
    db.init()?;

    if args.refresh {
        for ticker in db.tickers_for_user(&args.user)? {
            facade.refresh_last_price(&db, &ticker.ticker).await?;
        }
    }

    print_tickers(&db.tickers_for_user(&args.user)?, format)
}
