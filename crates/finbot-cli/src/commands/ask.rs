use finbot_core::render_message;
use serde::Serialize;

use super::{extract_options, Context};
use crate::cli::{AskArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct AskOutput<'a> {
    question: &'a str,
    reply: &'a str,
    rendered: finbot_core::RenderedMessage,
}

/// One round-trip to `/query`. Unlike the interactive session, a transport
/// failure is reported through the exit code.
pub async fn run(args: &AskArgs, context: &Context) -> Result<(), CliError> {
    let options = extract_options(&args.extract)?;
    let question = args.words.join(" ");

    let reply = context.client.ask(&question).await?;
    let rendered = render_message(reply.text(), options);

    match context.format {
        OutputFormat::Json => output::emit_json(
            &AskOutput {
                question: &question,
                reply: reply.text(),
                rendered,
            },
            context.pretty,
        ),
        OutputFormat::Text => output::emit_text(output::format_rendered(&rendered).trim_end()),
    }
}
