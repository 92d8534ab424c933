//! Backend locations and timeouts.
//!
//! Values come from [`BackendConfig::default`] and can be overridden through
//! the environment:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `FINBOT_NEWS_URL` | `http://localhost:8001` | news backend |
//! | `FINBOT_REALTIME_URL` | `http://localhost:8002` | realtime quote backend |
//! | `FINBOT_CHAT_URL` | `http://localhost:{port}` | chat backend |
//! | `FINBOT_API_PORT` / `REACT_APP_API_PORT` | `8002` | chat port when no chat URL is set |

use std::env;

use serde::Serialize;

use crate::domain::Symbol;
use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::ValidationError;

pub const DEFAULT_NEWS_URL: &str = "http://localhost:8001";
pub const DEFAULT_REALTIME_URL: &str = "http://localhost:8002";
pub const DEFAULT_CHAT_PORT: u16 = 8002;
pub const DEFAULT_CHAT_TIMEOUT_MS: u64 = 30_000;

/// Which news listing a news poller follows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "mode", content = "symbol", rename_all = "snake_case")]
pub enum NewsFeed {
    Symbol(Symbol),
    General,
}

impl Default for NewsFeed {
    fn default() -> Self {
        Self::Symbol(Symbol::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendConfig {
    pub news_base_url: String,
    pub realtime_base_url: String,
    pub chat_base_url: String,
    pub timeout_ms: u64,
    pub chat_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            news_base_url: String::from(DEFAULT_NEWS_URL),
            realtime_base_url: String::from(DEFAULT_REALTIME_URL),
            chat_base_url: chat_url_for_port(DEFAULT_CHAT_PORT),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            chat_timeout_ms: DEFAULT_CHAT_TIMEOUT_MS,
        }
    }
}

impl BackendConfig {
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset and blank values are
    /// ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = read("FINBOT_NEWS_URL") {
            config = config.with_news_url(&url)?;
        }
        if let Some(url) = read("FINBOT_REALTIME_URL") {
            config = config.with_realtime_url(&url)?;
        }

        if let Some(url) = read("FINBOT_CHAT_URL") {
            config = config.with_chat_url(&url)?;
        } else if let Some((variable, raw)) = read("FINBOT_API_PORT")
            .map(|value| ("FINBOT_API_PORT", value))
            .or_else(|| read("REACT_APP_API_PORT").map(|value| ("REACT_APP_API_PORT", value)))
        {
            let port = raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ValidationError::InvalidPort { variable, value: raw.clone() })?;
            config.chat_base_url = chat_url_for_port(port);
        }

        Ok(config)
    }

    pub fn with_news_url(mut self, url: &str) -> Result<Self, ValidationError> {
        self.news_base_url = normalize_base_url(url)?;
        Ok(self)
    }

    pub fn with_realtime_url(mut self, url: &str) -> Result<Self, ValidationError> {
        self.realtime_base_url = normalize_base_url(url)?;
        Ok(self)
    }

    pub fn with_chat_url(mut self, url: &str) -> Result<Self, ValidationError> {
        self.chat_base_url = normalize_base_url(url)?;
        Ok(self)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn news_url(&self, feed: &NewsFeed) -> String {
        match feed {
            NewsFeed::Symbol(symbol) => {
                format!("{}/news/{}", self.news_base_url, symbol.path_segment())
            }
            NewsFeed::General => format!("{}/market/general-news", self.news_base_url),
        }
    }

    pub fn realtime_url(&self, symbol: &Symbol) -> String {
        format!("{}/realtime/{}", self.realtime_base_url, symbol.path_segment())
    }

    pub fn query_url(&self) -> String {
        format!("{}/query", self.chat_base_url)
    }
}

fn chat_url_for_port(port: u16) -> String {
    format!("http://localhost:{port}")
}

fn normalize_base_url(url: &str) -> Result<String, ValidationError> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ValidationError::InvalidBaseUrl {
            value: url.to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_local_backends() {
        let config = BackendConfig::default();
        let symbol = Symbol::parse("aapl").expect("valid");

        assert_eq!(config.realtime_url(&symbol), "http://localhost:8002/realtime/AAPL");
        assert_eq!(
            config.news_url(&NewsFeed::Symbol(symbol)),
            "http://localhost:8001/news/AAPL"
        );
        assert_eq!(
            config.news_url(&NewsFeed::General),
            "http://localhost:8001/market/general-news"
        );
        assert_eq!(config.query_url(), "http://localhost:8002/query");
    }

    #[test]
    fn api_port_prefers_prefixed_variable() {
        let config = BackendConfig::from_lookup(lookup(&[
            ("FINBOT_API_PORT", "9100"),
            ("REACT_APP_API_PORT", "9200"),
        ]))
        .expect("valid config");
        assert_eq!(config.query_url(), "http://localhost:9100/query");

        let config = BackendConfig::from_lookup(lookup(&[("REACT_APP_API_PORT", "9200")]))
            .expect("valid config");
        assert_eq!(config.query_url(), "http://localhost:9200/query");
    }

    #[test]
    fn explicit_chat_url_wins_over_port() {
        let config = BackendConfig::from_lookup(lookup(&[
            ("FINBOT_CHAT_URL", "https://bot.example.test/"),
            ("FINBOT_API_PORT", "9100"),
        ]))
        .expect("valid config");
        assert_eq!(config.query_url(), "https://bot.example.test/query");
    }

    #[test]
    fn rejects_bad_port_and_url() {
        let err = BackendConfig::from_lookup(lookup(&[("FINBOT_API_PORT", "eighty")]))
            .expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::InvalidPort {
                variable: "FINBOT_API_PORT",
                ..
            }
        ));

        let err = BackendConfig::from_lookup(lookup(&[("FINBOT_NEWS_URL", "localhost:8001")]))
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn blank_variables_are_ignored() {
        let config = BackendConfig::from_lookup(lookup(&[("FINBOT_API_PORT", "  ")]))
            .expect("valid config");
        assert_eq!(config, BackendConfig::default());
    }
}
