use serde::{Deserialize, Serialize};

use super::lexer::tokenize;
use super::parser::{locate, LocatedSection};
use super::{ExtractOptions, ParsedTable, SectionOutcome, TableGrammar, SECTION_TITLES};

/// One renderable piece of a bot reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Table { title: String, table: ParsedTable },
    Markdown { text: String },
}

/// A bot reply split into tables and markdown, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub segments: Vec<Segment>,
}

impl RenderedMessage {
    pub fn tables(&self) -> impl Iterator<Item = (&str, &ParsedTable)> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Table { title, table } => Some((title.as_str(), table)),
            Segment::Markdown { .. } => None,
        })
    }

    /// `true` when no table was recognised and the reply is plain markdown.
    pub fn is_plain(&self) -> bool {
        self.tables().next().is_none()
    }

    fn plain(text: &str) -> Self {
        Self {
            segments: vec![Segment::Markdown {
                text: text.to_owned(),
            }],
        }
    }
}

/// Split a bot reply into the fixed market-movers tables.
///
/// When no section is found the whole text comes back as one markdown
/// segment. Under the strict grammar found tables are rendered alone, in
/// [`SECTION_TITLES`] order regardless of where they appear in the text.
/// Under the lenient grammar the text around them is kept, so tables follow
/// their position in the reply and no span is emitted twice.
pub fn render_message(text: &str, options: ExtractOptions) -> RenderedMessage {
    let lines = tokenize(text);
    let found: Vec<(&str, LocatedSection)> = SECTION_TITLES
        .iter()
        .filter_map(|title| {
            locate(title, &lines, options)
                .filter(|located| matches!(located.outcome, SectionOutcome::Found(_)))
                .map(|located| (*title, located))
        })
        .collect();

    if found.is_empty() {
        return RenderedMessage::plain(text);
    }

    let segments = match options.grammar {
        TableGrammar::Strict => found
            .into_iter()
            .filter_map(|(title, located)| table_segment(title, located))
            .collect(),
        TableGrammar::Lenient => interleave(text, found),
    };

    RenderedMessage { segments }
}

fn interleave(text: &str, mut found: Vec<(&str, LocatedSection)>) -> Vec<Segment> {
    found.sort_by_key(|(_, located)| located.span.start);

    let mut segments = Vec::with_capacity(found.len() * 2 + 1);
    let mut cursor = 0;

    for (title, located) in found {
        let span = located.span.clone();
        if span.start > cursor {
            push_markdown(&mut segments, &text[cursor..span.start]);
        }
        if let Some(segment) = table_segment(title, located) {
            segments.push(segment);
        }
        cursor = cursor.max(span.end);
    }

    push_markdown(&mut segments, &text[cursor..]);
    segments
}

fn table_segment(title: &str, located: LocatedSection) -> Option<Segment> {
    located.outcome.into_table().map(|table| Segment::Table {
        title: title.to_owned(),
        table,
    })
}

fn push_markdown(segments: &mut Vec<Segment>, span: &str) {
    let trimmed = span.trim();
    if !trimmed.is_empty() {
        segments.push(Segment::Markdown {
            text: trimmed.to_owned(),
        });
    }
}
