use anyhow::Result;
use clap::Args;
use stockquote_lib::record::format_price;
use stockquote_lib::LookupFacade;

use crate::output::{print_value, OutputFormat};

#[derive(Args)]
pub struct AverageArgs {
    /// Ticker symbol whose <SYMBOL>.csv is averaged
    pub symbol: String,
}

pub fn run(args: &AverageArgs, facade: &LookupFacade, format: &OutputFormat) -> Result<()> {
    let average = facade.average_price(&args.symbol)?;
    print_value(&args.symbol, "average", &format_price(average), format);
    Ok(())
}
