//! # Finbot Core
//!
//! Chat table extraction and polling market-data widgets for the finbot
//! terminal client.
//!
//! ## Overview
//!
//! - **Table extraction** of the "Top Gainers", "Top Losers" and "Most
//!   Active" pipe tables out of free-form chat replies
//! - **Polling widgets** that fetch on start, refresh on an interval and
//!   expose loading/error/success state with manual retry
//! - **Chat session** that posts to the `/query` backend and keeps the
//!   conversation log
//! - **Backend clients** over a pluggable HTTP transport
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`chat`] | Chat session and sample prompts |
//! | [`config`] | Backend locations and timeouts |
//! | [`domain`] | Domain models (Symbol, PricePoint, NewsArticle, ChatMessage) |
//! | [`error`] | Core error types |
//! | [`extractor`] | Tokenizer, section parser and reply renderer |
//! | [`http_client`] | HTTP client abstraction |
//! | [`poller`] | Restartable interval poller |
//! | [`sources`] | Clients for the news, realtime and chat backends |
//! | [`widgets`] | Price and news poll sources |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use finbot_core::{BackendClient, BackendConfig, PriceTicker, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BackendClient::with_reqwest(BackendConfig::from_env()?);
//!     let mut handle = PriceTicker::new(client).into_poller().spawn(Symbol::parse("AAPL")?);
//!
//!     while let Some(snapshot) = handle.changed().await {
//!         if let Some(point) = &snapshot.model.current {
//!             println!("{} {:.2}", point.timestamp, point.price);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐      ┌──────────────┐
//! │ ChatSession  │      │ Poller<S>    │──▶ watch::Receiver<PollSnapshot>
//! └──────┬───────┘      └──────┬───────┘
//!        │                     │ PollSource
//!        ▼                     ▼
//! ┌─────────────────────────────────────┐
//! │ BackendClient (news/realtime/query) │
//! └──────────────────┬──────────────────┘
//!                    ▼
//!           ┌─────────────────┐
//!           │ HttpClient      │
//!           │ (reqwest/mock)  │
//!           └─────────────────┘
//! ```

pub mod chat;
pub mod config;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod http_client;
pub mod poller;
pub mod sources;
pub mod widgets;

pub use chat::{ChatSession, SAMPLE_QUESTIONS};

pub use config::{BackendConfig, NewsFeed};

pub use domain::{
    ChatMessage, NewsArticle, PricePoint, PriceSnapshot, RollingWindow, Symbol,
    NEWS_DISPLAY_LIMIT, PRICE_HISTORY_CAPACITY, SUMMARY_PREVIEW_CHARS,
};

pub use error::{FetchError, ValidationError};

pub use extractor::{
    extract_section, render_message, ExtractOptions, MalformedReason, ParsedTable, RenderedMessage,
    RowAlignment, SectionOutcome, Segment, TableGrammar, SECTION_TITLES,
};

pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use poller::{
    FetchFuture, PollSnapshot, PollSource, PollStatus, Poller, PollerConfig, PollerHandle,
};

pub use sources::{BackendClient, ChatReply, CHAT_FALLBACK_REPLY, CHAT_TRANSPORT_REPLY};

pub use widgets::{NewsBoard, NewsWatcher, PriceBoard, PriceTicker};
