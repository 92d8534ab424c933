//! Tracing subscriber setup.
//!
//! The filter comes from `FINBOT_LOG`, then `RUST_LOG`, then the default
//! level (`warn`, or `debug` with `--verbose`). Logs go to stderr so stdout
//! stays machine-readable.

use std::env;
use std::io;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init(verbose: bool) {
    let directives = filter_directives(|key| env::var(key).ok(), verbose);
    let filter = EnvFilter::try_new(&directives)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    // A subscriber may already be installed (tests); keep the existing one.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(true).compact())
        .try_init();
}

fn filter_directives<F>(lookup: F, verbose: bool) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ["FINBOT_LOG", "RUST_LOG"]
        .into_iter()
        .find_map(|key| lookup(key).filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| String::from(default_level(verbose)))
}

const fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_variable_wins() {
        let lookup = |key: &str| match key {
            "FINBOT_LOG" => Some(String::from("finbot_core=trace")),
            "RUST_LOG" => Some(String::from("info")),
            _ => None,
        };
        assert_eq!(filter_directives(lookup, false), "finbot_core=trace");
    }

    #[test]
    fn falls_back_to_rust_log_then_default() {
        let rust_log = |key: &str| (key == "RUST_LOG").then(|| String::from("info"));
        assert_eq!(filter_directives(rust_log, true), "info");

        assert_eq!(filter_directives(|_| None, false), "warn");
        assert_eq!(filter_directives(|_| None, true), "debug");
    }
}
