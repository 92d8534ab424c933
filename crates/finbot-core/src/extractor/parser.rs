//! Section grammar over tokenized lines.
//!
//! ```text
//! strict  := heading(level >= 3, title) body*                 ; until next ### or EOF
//!            body := header separator row+                    ; blank lines ignored
//! lenient := title-line blank* header separator? row+         ; until blank, heading, title or EOF
//!            header := row                                   ; blanks skipped only before a row
//! ```

use std::ops::Range;

use super::lexer::{split_cells, Line, LineKind};
use super::{
    ExtractOptions, MalformedReason, ParsedTable, RowAlignment, SectionOutcome, TableGrammar,
    SECTION_TITLES,
};

const STRICT_HEADING_LEVEL: usize = 3;

/// A section located in the source text together with the bytes it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LocatedSection {
    pub outcome: SectionOutcome,
    pub span: Range<usize>,
}

pub(crate) fn locate(title: &str, lines: &[Line<'_>], options: ExtractOptions) -> Option<LocatedSection> {
    let (heading_index, body) = match options.grammar {
        TableGrammar::Strict => strict_body(title, lines)?,
        TableGrammar::Lenient => lenient_body(title, lines)?,
    };

    let start = lines[heading_index].start;
    let end = body.last().map_or(lines[heading_index].end, |line| line.end);
    let outcome = build_table(&body, options);

    Some(LocatedSection {
        outcome,
        span: start..end,
    })
}

fn strict_body<'l, 'a>(title: &str, lines: &'l [Line<'a>]) -> Option<(usize, Vec<&'l Line<'a>>)> {
    let heading_index = lines.iter().position(|line| match line.kind {
        LineKind::Heading { level, text } => {
            level >= STRICT_HEADING_LEVEL && text.eq_ignore_ascii_case(title)
        }
        _ => false,
    })?;

    let body = lines[heading_index + 1..]
        .iter()
        .take_while(|line| {
            line.heading_level()
                .map_or(true, |level| level < STRICT_HEADING_LEVEL)
        })
        .filter(|line| !line.is_blank())
        .collect();

    Some((heading_index, body))
}

fn lenient_body<'l, 'a>(title: &str, lines: &'l [Line<'a>]) -> Option<(usize, Vec<&'l Line<'a>>)> {
    let heading_index = lines
        .iter()
        .position(|line| strip_title_decoration(line.content).eq_ignore_ascii_case(title))?;

    let rest = &lines[heading_index + 1..];
    let header_index = match rest.iter().position(|line| !line.is_blank()) {
        Some(index) if rest[index].kind == LineKind::Row => index,
        _ => return Some((heading_index, Vec::new())),
    };

    let body = rest[header_index..]
        .iter()
        .take_while(|line| {
            !line.is_blank() && line.heading_level().is_none() && !is_section_title(line.content)
        })
        .collect();

    Some((heading_index, body))
}

fn is_section_title(content: &str) -> bool {
    let stripped = strip_title_decoration(content);
    SECTION_TITLES
        .iter()
        .any(|title| stripped.eq_ignore_ascii_case(title))
}

/// `## **Top Gainers:**` -> `Top Gainers`
fn strip_title_decoration(content: &str) -> &str {
    content
        .trim_start_matches('#')
        .trim()
        .trim_matches(|ch| ch == '*' || ch == '_')
        .trim()
        .trim_end_matches(':')
        .trim_matches(|ch| ch == '*' || ch == '_')
        .trim()
}

fn build_table(body: &[&Line<'_>], options: ExtractOptions) -> SectionOutcome {
    let required = options.grammar.min_lines();
    if body.len() < required {
        return SectionOutcome::Malformed(MalformedReason::TooFewLines {
            found: body.len(),
            required,
        });
    }

    let headers = split_cells(body[0].content);
    if headers.is_empty() {
        return SectionOutcome::Malformed(MalformedReason::EmptyHeader);
    }

    let skip = match options.grammar {
        TableGrammar::Strict => 2,
        TableGrammar::Lenient if body[1].kind == LineKind::Separator => 2,
        TableGrammar::Lenient => 1,
    };

    let mut rows: Vec<Vec<String>> = body[skip..]
        .iter()
        .map(|line| split_cells(line.content))
        .filter(|row| !row.is_empty())
        .collect();

    if rows.is_empty() {
        return SectionOutcome::Malformed(MalformedReason::NoDataRows);
    }

    match options.rows {
        RowAlignment::Preserve => {}
        RowAlignment::Pad => {
            for row in &mut rows {
                row.resize(headers.len(), String::new());
            }
        }
        RowAlignment::Reject => {
            if let Some((row, cells)) = rows
                .iter()
                .enumerate()
                .find(|(_, cells)| cells.len() != headers.len())
            {
                return SectionOutcome::Malformed(MalformedReason::RowWidthMismatch {
                    row,
                    expected: headers.len(),
                    found: cells.len(),
                });
            }
        }
    }

    SectionOutcome::Found(ParsedTable { headers, rows })
}
