use std::time::Duration;

use finbot_core::{PollSnapshot, Poller, PollerConfig, PriceBoard, PriceTicker, Symbol};
use serde::Serialize;

use super::{follow, keyboard, Context};
use crate::cli::{OutputFormat, PriceArgs};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct PriceUpdate<'a> {
    symbol: &'a Symbol,
    #[serde(flatten)]
    snapshot: &'a PollSnapshot<PriceBoard>,
}

pub async fn run(args: &PriceArgs, context: &Context) -> Result<(), CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let config = PollerConfig::new(Duration::from_secs(args.interval_secs))?;

    let ticker = PriceTicker::new(context.client.clone()).with_utc_offset(context.utc_offset);
    let handle = Poller::new(ticker, config).spawn(symbol.clone());

    follow(handle, args.updates, keyboard(), |snapshot| match context.format {
        OutputFormat::Json => output::emit_json(
            &PriceUpdate {
                symbol: &symbol,
                snapshot,
            },
            context.pretty,
        ),
        OutputFormat::Text => {
            output::emit_text(output::format_price(symbol.as_str(), snapshot).trim_end())
        }
    })
    .await
}
