//! Clients for the three finbot backends.
//!
//! | Method | Endpoint | Returns |
//! |--------|----------|---------|
//! | [`BackendClient::realtime`] | `GET /realtime/{symbol}` | [`PriceSnapshot`](crate::PriceSnapshot) |
//! | [`BackendClient::news`] | `GET /news/{symbol}`, `GET /market/general-news` | `Vec<NewsArticle>` |
//! | [`BackendClient::ask`] | `POST /query` | bot reply text |

mod chat;
mod news;
mod realtime;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::BackendConfig;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::FetchError;

pub use chat::{ChatReply, CHAT_FALLBACK_REPLY, CHAT_TRANSPORT_REPLY};

/// Shared transport plus backend locations.
#[derive(Clone)]
pub struct BackendClient {
    http: Arc<dyn HttpClient>,
    config: Arc<BackendConfig>,
}

impl BackendClient {
    pub fn new(http: Arc<dyn HttpClient>, config: BackendConfig) -> Self {
        Self {
            http,
            config: Arc::new(config),
        }
    }

    /// Client using reqwest against `config`.
    pub fn with_reqwest(config: BackendConfig) -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        debug!(%url, "GET");
        let request = HttpRequest::get(url).with_timeout_ms(self.config.timeout_ms);
        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }
        Ok(serde_json::from_str(&response.body)?)
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
