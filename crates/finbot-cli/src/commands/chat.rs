use finbot_core::{ChatMessage, ChatSession, RenderedMessage};
use serde::Serialize;
use tokio::io::{self, AsyncBufReadExt, BufReader};

use super::{extract_options, Context};
use crate::cli::{ChatArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

#[derive(Debug, Serialize)]
struct ChatTurn<'a> {
    message: &'a ChatMessage,
    rendered: RenderedMessage,
}

pub async fn run(args: &ChatArgs, context: &Context) -> Result<(), CliError> {
    let options = extract_options(&args.extract)?;
    let mut session = ChatSession::new(context.client.clone());

    if context.format == OutputFormat::Text {
        let mut intro = String::from("Ask about stocks, trends or your portfolio. Try:\n");
        for question in session.suggestions() {
            intro.push_str("  - ");
            intro.push_str(question);
            intro.push('\n');
        }
        output::emit_text(intro.trim_end())?;
    }

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if QUIT_COMMANDS.contains(&line) {
            break;
        }

        let Some(reply) = session.send(line).await else {
            continue;
        };
        let rendered = finbot_core::render_message(&reply.text, options);

        match context.format {
            OutputFormat::Json => output::emit_json(
                &ChatTurn {
                    message: reply,
                    rendered,
                },
                context.pretty,
            )?,
            OutputFormat::Text => {
                let body = output::format_rendered(&rendered);
                output::emit_text(&format!("finbot> {}", body.trim_end()))?;
            }
        }
    }

    tracing::info!(messages = session.messages().len(), "chat session ended");
    Ok(())
}
