use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Characters kept by [`NewsArticle::summary_preview`] when no limit is given.
pub const SUMMARY_PREVIEW_CHARS: usize = 150;

/// Articles a news listing shows; the board itself keeps the full fetch.
pub const NEWS_DISPLAY_LIMIT: usize = 10;

/// Quote fields returned by `GET /realtime/{symbol}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub current_price: f64,
    pub change: f64,
    pub percent_change: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub previous_close: f64,
}

/// One sample on the rolling price chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Wall-clock time of arrival, `HH:MM:SS`.
    pub timestamp: String,
    pub price: f64,
    pub change: f64,
    pub percent_change: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub previous_close: f64,
}

impl PricePoint {
    pub fn from_snapshot(snapshot: &PriceSnapshot, received_at: OffsetDateTime) -> Self {
        Self {
            timestamp: format!(
                "{:02}:{:02}:{:02}",
                received_at.hour(),
                received_at.minute(),
                received_at.second()
            ),
            price: snapshot.current_price,
            change: snapshot.change,
            percent_change: snapshot.percent_change,
            high: snapshot.high,
            low: snapshot.low,
            open: snapshot.open,
            previous_close: snapshot.previous_close,
        }
    }

    pub fn is_gain(&self) -> bool {
        self.change >= 0.0
    }
}

/// News item as supplied by the news backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub time_published: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker_sentiment: Option<serde_json::Value>,
}

impl NewsArticle {
    /// Summary cut to `max_chars` characters with a trailing `...` when cut.
    pub fn summary_preview(&self, max_chars: usize) -> String {
        let Some(summary) = self.summary.as_deref() else {
            return String::new();
        };

        match summary.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &summary[..cut]),
            None => summary.to_owned(),
        }
    }
}

/// One entry in a chat session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub is_user: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    fn new(text: impl Into<String>, is_user: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_user,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use time::UtcOffset;

    use super::*;

    fn snapshot(price: f64, change: f64) -> PriceSnapshot {
        PriceSnapshot {
            current_price: price,
            change,
            percent_change: 0.5,
            high: price + 1.0,
            low: price - 1.0,
            open: price,
            previous_close: price - change,
        }
    }

    #[test]
    fn price_point_formats_arrival_time() {
        let at = OffsetDateTime::from_unix_timestamp(3_723).expect("valid timestamp");
        let point = PricePoint::from_snapshot(&snapshot(150.25, -0.75), at);

        assert_eq!(point.timestamp, "01:02:03");
        assert_eq!(point.price, 150.25);
        assert!(!point.is_gain());
    }

    #[test]
    fn price_point_uses_clock_time_of_given_offset() {
        let offset = UtcOffset::from_hms(-5, 0, 0).expect("valid offset");
        let at = OffsetDateTime::from_unix_timestamp(3_723)
            .expect("valid timestamp")
            .to_offset(offset);

        let point = PricePoint::from_snapshot(&snapshot(150.25, 0.75), at);

        assert_eq!(point.timestamp, "20:02:03");
    }

    #[test]
    fn news_article_tolerates_null_and_missing_fields() {
        let article: NewsArticle = serde_json::from_str(
            r#"{"title":"Apple beats","source":null,"url":"https://example.test/a"}"#,
        )
        .expect("article decodes");

        assert_eq!(article.title, "Apple beats");
        assert_eq!(article.source, "");
        assert_eq!(article.time_published, "");
        assert_eq!(article.url.as_deref(), Some("https://example.test/a"));
        assert!(article.summary.is_none());
    }

    #[test]
    fn summary_preview_truncates_on_char_boundary() {
        let article = NewsArticle {
            title: String::from("t"),
            source: String::from("s"),
            time_published: String::new(),
            author: None,
            summary: Some(String::from("héllo world")),
            image_url: None,
            url: None,
            ticker_sentiment: None,
        };

        assert_eq!(article.summary_preview(5), "héllo...");
        assert_eq!(article.summary_preview(SUMMARY_PREVIEW_CHARS), "héllo world");
    }

    #[test]
    fn chat_messages_get_distinct_ids() {
        let question = ChatMessage::user("hi");
        let answer = ChatMessage::bot("hello");
        assert!(question.is_user);
        assert!(!answer.is_user);
        assert_ne!(question.id, answer.id);
    }
}
