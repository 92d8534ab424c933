use serde::Serialize;

use super::describe_fetch_error;
use crate::config::NewsFeed;
use crate::domain::NewsArticle;
use crate::poller::{FetchFuture, PollSource, Poller, PollerConfig};
use crate::sources::BackendClient;
use crate::FetchError;

/// Latest article list, replaced on every successful fetch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewsBoard {
    pub articles: Vec<NewsArticle>,
}

/// Polls `/news/{symbol}` or `/market/general-news`.
#[derive(Debug, Clone)]
pub struct NewsWatcher {
    client: BackendClient,
}

impl NewsWatcher {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Poller with the default 60 s refresh interval.
    pub fn into_poller(self) -> Poller<Self> {
        Poller::new(self, PollerConfig::news())
    }
}

impl PollSource for NewsWatcher {
    type Target = NewsFeed;
    type Output = Vec<NewsArticle>;
    type Model = NewsBoard;

    fn fetch<'a>(&'a self, target: &'a NewsFeed) -> FetchFuture<'a, Vec<NewsArticle>> {
        Box::pin(self.client.news(target))
    }

    fn apply(&self, model: &mut NewsBoard, output: Vec<NewsArticle>) {
        model.articles = output;
    }

    fn describe_error(&self, error: &FetchError) -> String {
        describe_fetch_error("news", &self.client.config().news_base_url, error)
    }
}
