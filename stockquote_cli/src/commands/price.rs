use anyhow::Result;
use clap::Args;
use stockquote_lib::{render_lookup, LookupFacade, RetryPolicy};

use crate::output::{print_value, OutputFormat};

#[derive(Args)]
pub struct PriceArgs {
    /// Ticker symbol (e.g. AAPL)
    pub symbol: String,
}

/// Prints `<price> (Closing)`, `<price> (Opening)` or `Unavailable`.
pub async fn run(
    args: &PriceArgs,
    facade: &LookupFacade,
    retry: &RetryPolicy,
    format: &OutputFormat,
) -> Result<()> {
    let client = facade.client();
    let symbol = args.symbol.as_str();
    let result = retry.run(symbol, move || client.fetch_latest(symbol)).await;
    print_value(symbol, "price", &render_lookup(&result), format);
    Ok(())
}
