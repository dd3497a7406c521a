use anyhow::Result;
use clap::Args;
use stockquote_lib::record::format_price;
use stockquote_lib::store::MISSING_PRICE;
use stockquote_lib::{LookupFacade, RetryPolicy};

use crate::output::{print_value, OutputFormat};

#[derive(Args)]
pub struct OpenArgs {
    /// Ticker symbol (e.g. AAPL)
    pub symbol: String,

    /// Append today's opening price to <SYMBOL>.csv
    #[arg(long)]
    pub write: bool,
}

pub async fn run(
    args: &OpenArgs,
    facade: &LookupFacade,
    retry: &RetryPolicy,
    format: &OutputFormat,
) -> Result<()> {
    let client = facade.client();
    let symbol = args.symbol.as_str();
    let price = match retry.run(symbol, move || client.fetch_latest(symbol)).await {
        Ok(record) => record.open(),
        Err(e) => {
            tracing::info!("No opening price for {}: {}", symbol, e);
            None
        }
    };

    if args.write {
        facade.write_price_by_symbol(symbol, price)?;
        tracing::info!("Wrote price to {}", facade.store().path_for(symbol).display());
    }

    let shown = price.map(format_price).unwrap_or_else(|| MISSING_PRICE.to_string());
    print_value(symbol, "open", &shown, format);
    Ok(())
}
