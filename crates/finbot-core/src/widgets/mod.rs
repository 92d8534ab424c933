//! Poll sources for the dashboard widgets.
//!
//! | Source | Target | Model | Default refresh |
//! |--------|--------|-------|-----------------|
//! | [`PriceTicker`] | [`Symbol`](crate::Symbol) | [`PriceBoard`] | 5 s |
//! | [`NewsWatcher`] | [`NewsFeed`](crate::NewsFeed) | [`NewsBoard`] | 60 s |

mod news;
mod price;

pub use news::{NewsBoard, NewsWatcher};
pub use price::{PriceBoard, PriceTicker};

use crate::FetchError;

/// Transport-class failures name the backend so the user knows which service
/// to start; payload errors pass the backend's text through.
fn describe_fetch_error(what: &str, base_url: &str, error: &FetchError) -> String {
    match error {
        FetchError::Payload(message) => message.clone(),
        _ => format!(
            "Failed to fetch {what}. Make sure your FastAPI backend is running on {base_url}"
        ),
    }
}
