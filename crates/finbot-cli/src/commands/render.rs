use std::fs;
use std::io::{self, Read};
use std::path::Path;

use finbot_core::render_message;

use super::{extract_options, Context};
use crate::cli::{OutputFormat, RenderArgs};
use crate::error::CliError;
use crate::output;

pub fn run(args: &RenderArgs, context: &Context) -> Result<(), CliError> {
    let options = extract_options(&args.extract)?;
    let text = read_input(args.file.as_deref())?;
    let rendered = render_message(&text, options);

    match context.format {
        OutputFormat::Json => output::emit_json(&rendered, context.pretty),
        OutputFormat::Text => output::emit_text(output::format_rendered(&rendered).trim_end()),
    }
}

fn read_input(file: Option<&Path>) -> Result<String, CliError> {
    match file {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
