use anyhow::Result;
use clap::Args;
use stockquote_lib::{LookupFacade, RetryPolicy};

use crate::output::{print_history, OutputFormat};

#[derive(Args)]
pub struct HistoryArgs {
    /// Ticker symbol (e.g. AAPL)
    pub symbol: String,

    /// Append the rows to <SYMBOL>.csv
    #[arg(long)]
    pub write: bool,
}

pub async fn run(
    args: &HistoryArgs,
    facade: &LookupFacade,
    retry: &RetryPolicy,
    format: &OutputFormat,
) -> Result<()> {
    let symbol = args.symbol.as_str();
    let rows = retry
        .run(symbol, move || facade.historical_price(symbol))
        .await?;

    if args.write {
        facade.store().append(symbol, &rows)?;
        eprintln!(
            "Appended {} rows to {}",
            rows.len(),
            facade.store().path_for(symbol).display()
        );
    }

    print_history(&rows, format)
}
