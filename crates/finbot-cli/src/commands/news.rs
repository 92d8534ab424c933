use std::time::Duration;

use finbot_core::{NewsBoard, NewsFeed, NewsWatcher, PollSnapshot, Poller, PollerConfig, Symbol};
use serde::Serialize;

use super::{follow, keyboard, Context};
use crate::cli::{NewsArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct NewsUpdate<'a> {
    feed: &'a NewsFeed,
    #[serde(flatten)]
    snapshot: &'a PollSnapshot<NewsBoard>,
}

pub async fn run(args: &NewsArgs, context: &Context) -> Result<(), CliError> {
    let feed = if args.general {
        NewsFeed::General
    } else {
        NewsFeed::Symbol(Symbol::parse(&args.symbol)?)
    };
    let label = match &feed {
        NewsFeed::Symbol(symbol) => symbol.to_string(),
        NewsFeed::General => String::from("market"),
    };
    let config = PollerConfig::new(Duration::from_secs(args.interval_secs))?;

    let handle = Poller::new(NewsWatcher::new(context.client.clone()), config).spawn(feed.clone());

    follow(handle, args.updates, keyboard(), |snapshot| match context.format {
        OutputFormat::Json => output::emit_json(
            &NewsUpdate {
                feed: &feed,
                snapshot,
            },
            context.pretty,
        ),
        OutputFormat::Text => output::emit_text(output::format_news(&label, snapshot).trim_end()),
    })
    .await
}
