//! # Domain Models
//!
//! Types shared by the chat extractor and the polling widgets.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker used to build endpoint paths |
//! | [`PriceSnapshot`] | Decoded `/realtime/{symbol}` payload |
//! | [`PricePoint`] | One sample on the rolling price chart |
//! | [`RollingWindow`] | Fixed-capacity FIFO history |
//! | [`NewsArticle`] | Externally supplied news item |
//! | [`ChatMessage`] | Entry in a chat session log |

mod models;
mod symbol;
mod window;

pub use models::{
    ChatMessage, NewsArticle, PricePoint, PriceSnapshot, NEWS_DISPLAY_LIMIT, SUMMARY_PREVIEW_CHARS,
};
pub use symbol::Symbol;
pub use window::{RollingWindow, PRICE_HISTORY_CAPACITY};
