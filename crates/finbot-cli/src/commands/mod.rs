mod ask;
mod chat;
mod news;
mod price;
mod render;

use finbot_core::{
    BackendClient, BackendConfig, ExtractOptions, PollSnapshot, PollSource, PollerHandle,
    ValidationError,
};
use time::UtcOffset;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

use crate::cli::{Cli, Command, ExtractArgs, OutputFormat};
use crate::error::CliError;

/// Settings every command reads from the global flags.
pub struct Context {
    pub client: BackendClient,
    pub format: OutputFormat,
    pub pretty: bool,
    /// Offset the price chart stamps its points in.
    pub utc_offset: UtcOffset,
}

pub async fn run(cli: &Cli, utc_offset: UtcOffset) -> Result<(), CliError> {
    let config = backend_config(cli, BackendConfig::from_env()?)?;
    tracing::debug!(?config, "backend configuration");

    let context = Context {
        client: BackendClient::with_reqwest(config),
        format: cli.format,
        pretty: cli.pretty,
        utc_offset,
    };

    match &cli.command {
        Command::Render(args) => render::run(args, &context),
        Command::Ask(args) => ask::run(args, &context).await,
        Command::Chat(args) => chat::run(args, &context).await,
        Command::Price(args) => price::run(args, &context).await,
        Command::News(args) => news::run(args, &context).await,
    }
}

/// Apply command-line overrides on top of the environment configuration.
fn backend_config(cli: &Cli, base: BackendConfig) -> Result<BackendConfig, ValidationError> {
    let mut config = base;
    if let Some(url) = &cli.news_url {
        config = config.with_news_url(url)?;
    }
    if let Some(url) = &cli.realtime_url {
        config = config.with_realtime_url(url)?;
    }
    if let Some(url) = &cli.chat_url {
        config = config.with_chat_url(url)?;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    Ok(config)
}

fn keyboard() -> BufReader<Stdin> {
    BufReader::new(tokio::io::stdin())
}

fn extract_options(args: &ExtractArgs) -> Result<ExtractOptions, ValidationError> {
    Ok(ExtractOptions::new(args.grammar.parse()?, args.rows.parse()?))
}

/// Print poller snapshots until `updates` fetches have completed, the
/// poller goes away or the user hits Ctrl-C.
///
/// An empty line or `r` on `input` triggers a manual retry.
async fn follow<S, R, F>(
    mut handle: PollerHandle<S>,
    updates: Option<u64>,
    input: R,
    mut emit: F,
) -> Result<(), CliError>
where
    S: PollSource,
    R: AsyncBufRead + Unpin,
    F: FnMut(&PollSnapshot<S::Model>) -> Result<(), CliError>,
{
    let initial = handle.snapshot();
    emit(&initial)?;

    let mut lines = input.lines();
    let mut input_open = true;
    let mut seen = 0_u64;
    let mut last_completed = initial.completed;
    loop {
        tokio::select! {
            next = handle.changed() => {
                let Some(snapshot) = next else { break };
                // Discarded stale responses also publish; only show real completions.
                if snapshot.completed == last_completed {
                    continue;
                }
                last_completed = snapshot.completed;
                emit(&snapshot)?;

                seen += 1;
                if updates.is_some_and(|limit| seen >= limit) {
                    break;
                }
            }
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) if is_retry_request(&line) => {
                    tracing::debug!("manual retry requested");
                    handle.retry();
                }
                Ok(Some(_)) => {}
                Ok(None) => input_open = false,
                Err(error) => {
                    tracing::warn!(%error, "input unreadable, retry disabled");
                    input_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.stop().await;
    Ok(())
}

fn is_retry_request(line: &str) -> bool {
    matches!(line.trim(), "" | "r" | "R" | "retry")
}
