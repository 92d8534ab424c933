//! Line tokenizer for bot replies.
//!
//! Every line of the input becomes one [`Line`] carrying its byte span in the
//! original text, so the renderer can slice the surrounding markdown back out.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    /// `#`-prefixed line; `text` has the markers and surrounding spaces removed.
    Heading { level: usize, text: &'a str },
    /// Table separator such as `---|:---:|---`.
    Separator,
    /// Any other line containing a `|`.
    Row,
    Blank,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    /// Byte offset of the first character of the line.
    pub start: usize,
    /// Byte offset just past the line terminator (or end of input).
    pub end: usize,
    /// Line content with surrounding whitespace trimmed.
    pub content: &'a str,
    pub kind: LineKind<'a>,
}

impl Line<'_> {
    pub fn is_blank(&self) -> bool {
        matches!(self.kind, LineKind::Blank)
    }

    pub fn heading_level(&self) -> Option<usize> {
        match self.kind {
            LineKind::Heading { level, .. } => Some(level),
            _ => None,
        }
    }
}

pub(crate) fn tokenize(text: &str) -> Vec<Line<'_>> {
    let mut offset = 0;
    text.split_inclusive('\n')
        .map(|raw| {
            let start = offset;
            offset += raw.len();
            let content = raw.trim();
            Line {
                start,
                end: offset,
                content,
                kind: classify(content),
            }
        })
        .collect()
}

fn classify(content: &str) -> LineKind<'_> {
    if content.is_empty() {
        return LineKind::Blank;
    }

    if content.starts_with('#') {
        let rest = content.trim_start_matches('#');
        return LineKind::Heading {
            level: content.len() - rest.len(),
            text: rest.trim(),
        };
    }

    if is_separator(content) {
        return LineKind::Separator;
    }

    if content.contains('|') {
        LineKind::Row
    } else {
        LineKind::Text
    }
}

fn is_separator(content: &str) -> bool {
    content.contains('-')
        && content
            .chars()
            .all(|ch| matches!(ch, '-' | ':' | '|' | ' ' | '\t'))
}

/// Split a row on `|`, trimming cells and dropping empty ones.
pub(crate) fn split_cells(content: &str) -> Vec<String> {
    content
        .split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_line_kind() {
        let lines = tokenize("### Top Gainers\nSym | Price\n---|:---:\n\nplain words");
        let kinds: Vec<_> = lines.iter().map(|line| line.kind).collect();

        assert_eq!(
            kinds,
            vec![
                LineKind::Heading {
                    level: 3,
                    text: "Top Gainers"
                },
                LineKind::Row,
                LineKind::Separator,
                LineKind::Blank,
                LineKind::Text,
            ]
        );
    }

    #[test]
    fn spans_cover_the_whole_input() {
        let text = "a\r\nb|c\n\nd";
        let lines = tokenize(text);

        assert_eq!(lines.first().map(|l| l.start), Some(0));
        assert_eq!(lines.last().map(|l| l.end), Some(text.len()));
        for pair in lines.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(lines[0].content, "a");
    }

    #[test]
    fn split_drops_pipe_artifacts_and_empty_cells() {
        assert_eq!(split_cells("| AAPL | 150 |"), vec!["AAPL", "150"]);
        assert_eq!(split_cells("A||B"), vec!["A", "B"]);
        assert!(split_cells(" | | ").is_empty());
    }

    #[test]
    fn heading_without_space_still_counts() {
        let lines = tokenize("####Most Active");
        assert_eq!(
            lines[0].kind,
            LineKind::Heading {
                level: 4,
                text: "Most Active"
            }
        );
    }
}
