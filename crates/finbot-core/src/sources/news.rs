use serde::Deserialize;

use super::BackendClient;
use crate::config::NewsFeed;
use crate::domain::NewsArticle;
use crate::FetchError;

#[derive(Debug, Deserialize)]
struct NewsPayload {
    #[serde(default)]
    articles: Option<Vec<NewsArticle>>,
    #[serde(default)]
    error: Option<String>,
}

impl BackendClient {
    /// Current article list for `feed`; a payload without `articles` is an
    /// empty list.
    pub async fn news(&self, feed: &NewsFeed) -> Result<Vec<NewsArticle>, FetchError> {
        let payload: NewsPayload = self.get_json(self.config.news_url(feed)).await?;

        if let Some(error) = payload.error.filter(|error| !error.is_empty()) {
            return Err(FetchError::Payload(error));
        }

        Ok(payload.articles.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_articles_become_empty_list() {
        let payload: NewsPayload =
            serde_json::from_str(r#"{"articles":null}"#).expect("payload decodes");
        assert!(payload.articles.unwrap_or_default().is_empty());
    }

    #[test]
    fn articles_keep_backend_order() {
        let payload: NewsPayload = serde_json::from_str(
            r#"{"articles":[
                {"title":"First","source":"Reuters","time_published":"20250101T120000"},
                {"title":"Second","source":"Bloomberg","time_published":"20250101T110000","summary":"s"}
            ]}"#,
        )
        .expect("payload decodes");

        let titles: Vec<String> = payload
            .articles
            .unwrap_or_default()
            .into_iter()
            .map(|article| article.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }
}
