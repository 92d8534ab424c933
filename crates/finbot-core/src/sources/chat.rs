use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::BackendClient;
use crate::http_client::HttpRequest;
use crate::FetchError;

/// Reply shown when the backend answered without a usable field.
pub const CHAT_FALLBACK_REPLY: &str = "Sorry, I could not fetch a response.";

/// Reply shown when the backend could not be reached or decoded.
pub const CHAT_TRANSPORT_REPLY: &str =
    "Error fetching response from server. Please ensure the backend is running.";

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    message: &'a str,
}

/// Bot reply resolved from a `/query` response, tagged with the field it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// `result.markdown`
    Markdown(String),
    /// `result` as a plain string
    Text(String),
    /// any other `result` value, JSON-encoded
    Json(String),
    /// top-level `error`
    Error(String),
    Empty,
}

impl ChatReply {
    pub fn from_payload(payload: &Value) -> Self {
        let result = payload.get("result").filter(|value| is_present(value));

        if let Some(markdown) = result
            .and_then(|result| result.get("markdown"))
            .and_then(Value::as_str)
            .filter(|markdown| !markdown.is_empty())
        {
            return Self::Markdown(markdown.to_owned());
        }

        if let Some(result) = result {
            return match result {
                Value::String(text) => Self::Text(text.clone()),
                other => Self::Json(other.to_string()),
            };
        }

        match payload.get("error").filter(|value| is_present(value)) {
            Some(Value::String(error)) => Self::Error(error.clone()),
            Some(other) => Self::Error(other.to_string()),
            None => Self::Empty,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Markdown(text) | Self::Text(text) | Self::Json(text) | Self::Error(text) => text,
            Self::Empty => CHAT_FALLBACK_REPLY,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Markdown(text) | Self::Text(text) | Self::Json(text) | Self::Error(text) => text,
            Self::Empty => String::from(CHAT_FALLBACK_REPLY),
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

impl BackendClient {
    /// Send one chat message to `/query`.
    ///
    /// Any decodable JSON body resolves to a reply, whatever the status code;
    /// only transport and decode failures are errors.
    pub async fn ask(&self, message: &str) -> Result<ChatReply, FetchError> {
        let url = self.config.query_url();
        debug!(%url, chars = message.chars().count(), "POST");

        let request = HttpRequest::post_json(url, &QueryBody { message })?
            .with_timeout_ms(self.config.chat_timeout_ms);
        let response = self.http.execute(request).await?;
        let payload: Value = serde_json::from_str(&response.body)?;

        Ok(ChatReply::from_payload(&payload))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn markdown_result_wins() {
        let reply = ChatReply::from_payload(&json!({
            "tool": "TOP_GAINERS_LOSERS",
            "result": { "markdown": "### Top Gainers\nA|B", "raw": {} },
            "error": "ignored"
        }));
        assert_eq!(reply, ChatReply::Markdown(String::from("### Top Gainers\nA|B")));
    }

    #[test]
    fn string_result_is_used_verbatim() {
        let reply = ChatReply::from_payload(&json!({ "result": "Hello there" }));
        assert_eq!(reply.text(), "Hello there");
    }

    #[test]
    fn structured_result_without_markdown_is_json_encoded() {
        let reply = ChatReply::from_payload(&json!({ "result": { "articles": [] } }));
        assert_eq!(reply, ChatReply::Json(String::from(r#"{"articles":[]}"#)));
    }

    #[test]
    fn error_field_used_when_result_missing() {
        let reply = ChatReply::from_payload(&json!({ "result": null, "error": "tool failed" }));
        assert_eq!(reply, ChatReply::Error(String::from("tool failed")));
    }

    #[test]
    fn empty_payload_falls_back_to_apology() {
        let reply = ChatReply::from_payload(&json!({}));
        assert_eq!(reply, ChatReply::Empty);
        assert_eq!(reply.into_text(), CHAT_FALLBACK_REPLY);
    }
}
