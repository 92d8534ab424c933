//! CLI argument definitions for finbot.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `render` | Split a chat reply into market tables and markdown |
//! | `ask` | Send one question to the chat backend |
//! | `chat` | Interactive chat session over stdin |
//! | `price` | Follow the realtime price of a symbol |
//! | `news` | Follow the news feed for a symbol or the general market |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `text` | Output format (text, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--verbose` | `false` | Debug logging when `FINBOT_LOG` is unset |
//! | `--news-url` | `http://localhost:8001` | News backend |
//! | `--realtime-url` | `http://localhost:8002` | Realtime quote backend |
//! | `--chat-url` | `http://localhost:8002` | Chat backend |
//! | `--timeout-ms` | `3000` | Timeout for widget requests |
//!
//! # Examples
//!
//! ```bash
//! finbot price AAPL --updates 3
//! finbot news --general --format json
//! finbot ask "show me the top gainers"
//! finbot render --file reply.md --grammar lenient
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Finbot - market tables, live prices and news in the terminal
#[derive(Debug, Parser)]
#[command(
    name = "finbot",
    author,
    version,
    about = "Market chat, live prices and news from the finbot backends",
    long_about = "finbot talks to the finbot backends from the terminal:\n\
\n\
  • ask the chat backend and render its market tables\n\
  • follow a symbol's realtime price with a rolling history\n\
  • follow per-symbol or general market news\n\
\n\
Backend locations come from FINBOT_NEWS_URL, FINBOT_REALTIME_URL, FINBOT_CHAT_URL \
and FINBOT_API_PORT (or REACT_APP_API_PORT), and can be overridden per run."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Log at debug level unless FINBOT_LOG or RUST_LOG says otherwise.
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    /// News backend base URL.
    #[arg(long, global = true)]
    pub news_url: Option<String>,

    /// Realtime quote backend base URL.
    #[arg(long, global = true)]
    pub realtime_url: Option<String>,

    /// Chat backend base URL.
    #[arg(long, global = true)]
    pub chat_url: Option<String>,

    /// Request timeout for price and news fetches in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    Text,
    /// One JSON document per result.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Split a chat reply into market tables and markdown.
    ///
    /// Reads the reply from --file, or from stdin when no file is given.
    ///
    /// # Examples
    ///
    ///   finbot render --file reply.md
    ///   cat reply.md | finbot render --grammar lenient --rows pad
    Render(RenderArgs),

    /// Ask the chat backend one question and render the reply.
    ///
    /// # Examples
    ///
    ///   finbot ask what are the top gainers today
    Ask(AskArgs),

    /// Interactive chat session; one question per line, EOF or /quit ends it.
    Chat(ChatArgs),

    /// Follow the realtime price of a symbol.
    ///
    /// Press Enter (or type `r`) to refetch immediately, e.g. after an error.
    ///
    /// # Examples
    ///
    ///   finbot price AAPL
    ///   finbot price MSFT --interval-secs 10 --updates 6
    Price(PriceArgs),

    /// Follow the news feed for a symbol or the general market.
    ///
    /// Press Enter (or type `r`) to refetch immediately.
    ///
    /// # Examples
    ///
    ///   finbot news TSLA
    ///   finbot news --general --updates 1
    News(NewsArgs),
}

/// Table parsing switches shared by the commands that render replies.
#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Section grammar: strict (### headings) or lenient (any title line).
    #[arg(long, default_value = "strict")]
    pub grammar: String,

    /// Row width policy: preserve, pad or reject.
    #[arg(long, default_value = "preserve")]
    pub rows: String,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// File holding the reply text; stdin when omitted.
    #[arg(long)]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub extract: ExtractArgs,
}

#[derive(Debug, Args)]
pub struct AskArgs {
    /// Question words, joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub words: Vec<String>,

    #[command(flatten)]
    pub extract: ExtractArgs,
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    #[command(flatten)]
    pub extract: ExtractArgs,
}

#[derive(Debug, Args)]
pub struct PriceArgs {
    /// Market symbol to follow.
    #[arg(default_value = "AAPL")]
    pub symbol: String,

    /// Seconds between refreshes.
    #[arg(long, default_value_t = 5)]
    pub interval_secs: u64,

    /// Stop after this many completed fetches; runs until Ctrl-C otherwise.
    #[arg(long)]
    pub updates: Option<u64>,
}

#[derive(Debug, Args)]
pub struct NewsArgs {
    /// Market symbol whose news to follow.
    #[arg(default_value = "AAPL", conflicts_with = "general")]
    pub symbol: String,

    /// Follow general market news instead of a symbol.
    #[arg(long, default_value_t = false)]
    pub general: bool,

    /// Seconds between refreshes.
    #[arg(long, default_value_t = 60)]
    pub interval_secs: u64,

    /// Stop after this many completed fetches; runs until Ctrl-C otherwise.
    #[arg(long)]
    pub updates: Option<u64>,
}
