//! Request/response chat flow against the `/query` backend.

use tracing::warn;

use crate::domain::ChatMessage;
use crate::extractor::{render_message, ExtractOptions, RenderedMessage};
use crate::sources::{BackendClient, CHAT_TRANSPORT_REPLY};

/// Prompts offered while the conversation is still empty.
pub const SAMPLE_QUESTIONS: [&str; 4] = [
    "What's the current market trend?",
    "How should I diversify my portfolio?",
    "What are the best stocks to buy now?",
    "Explain compound interest",
];

/// One conversation: an append-only message log plus the client that
/// answers it.
#[derive(Debug, Clone)]
pub struct ChatSession {
    client: BackendClient,
    log: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            log: Vec::new(),
        }
    }

    /// Send `text` and append the bot's answer.
    ///
    /// Blank input is ignored and returns `None`. Otherwise exactly two
    /// messages are appended (user, then bot) and the bot message is
    /// returned. Backend failures become the bot's apology text rather than
    /// an error.
    pub async fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }

        self.log.push(ChatMessage::user(text));

        let reply = match self.client.ask(text).await {
            Ok(reply) => reply.into_text(),
            Err(error) => {
                warn!(%error, "chat request failed");
                String::from(CHAT_TRANSPORT_REPLY)
            }
        };

        self.log.push(ChatMessage::bot(reply));
        self.log.last()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.log
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Sample prompts while nothing has been sent yet.
    pub fn suggestions(&self) -> &'static [&'static str] {
        if self.log.is_empty() {
            &SAMPLE_QUESTIONS
        } else {
            &[]
        }
    }

    /// Latest bot reply split into tables and markdown.
    pub fn render_latest(&self, options: ExtractOptions) -> Option<RenderedMessage> {
        self.log
            .iter()
            .rev()
            .find(|message| !message.is_user)
            .map(|message| render_message(&message.text, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;

    #[test]
    fn fresh_session_offers_samples() {
        let session = ChatSession::new(BackendClient::with_reqwest(BackendConfig::default()));
        assert!(session.is_empty());
        assert_eq!(session.suggestions().len(), 4);
        assert_eq!(session.suggestions()[3], "Explain compound interest");
        assert!(session.render_latest(ExtractOptions::default()).is_none());
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut session = ChatSession::new(BackendClient::with_reqwest(BackendConfig::default()));
        assert!(session.send("   \n").await.is_none());
        assert!(session.messages().is_empty());
    }
}
