mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use std::process::ExitCode;
use time::UtcOffset;

use crate::cli::Cli;
use crate::error::CliError;

fn main() -> ExitCode {
    // Must run before the runtime starts its worker threads.
    let utc_offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::from)
        .and_then(|runtime| runtime.block_on(run(utc_offset)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(utc_offset: UtcOffset) -> Result<(), CliError> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    commands::run(&cli, utc_offset).await
}
