//! # Table Extractor
//!
//! Pulls the market-movers tables ("Top Gainers", "Top Losers", "Most
//! Active") out of a chat reply and turns them into [`ParsedTable`] values.
//!
//! Text is tokenized line by line, then each section title is matched
//! against one of two grammars:
//!
//! | Grammar | Section start | Section end | Minimum lines |
//! |---------|---------------|-------------|---------------|
//! | [`TableGrammar::Strict`] | `### Title` heading | next `###` heading or end | header + separator + 1 row |
//! | [`TableGrammar::Lenient`] | any line reading `Title`, then a `|` row | blank line, heading, another title or end | header + 1 row |
//!
//! ```rust
//! use finbot_core::extractor::{extract_section, ExtractOptions, SectionOutcome};
//!
//! let text = "### Top Gainers\nSym|Price\n---|---\nAAPL|150\n";
//! let outcome = extract_section("Top Gainers", text, ExtractOptions::default());
//! let SectionOutcome::Found(table) = outcome else { panic!("table expected") };
//! assert_eq!(table.headers, vec!["Sym", "Price"]);
//! assert_eq!(table.rows, vec![vec!["AAPL", "150"]]);
//! ```

mod lexer;
mod parser;
mod render;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

pub use render::{render_message, RenderedMessage, Segment};

/// Section titles the renderer looks for, in display order.
pub const SECTION_TITLES: [&str; 3] = ["Top Gainers", "Top Losers", "Most Active"];

/// Header plus positionally aligned data rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Result of looking for one titled section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionOutcome {
    Found(ParsedTable),
    NotFound,
    Malformed(MalformedReason),
}

impl SectionOutcome {
    pub fn table(&self) -> Option<&ParsedTable> {
        match self {
            Self::Found(table) => Some(table),
            _ => None,
        }
    }

    pub fn into_table(self) -> Option<ParsedTable> {
        match self {
            Self::Found(table) => Some(table),
            _ => None,
        }
    }
}

/// Why a section whose title was present could not be read as a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    TooFewLines { found: usize, required: usize },
    EmptyHeader,
    NoDataRows,
    RowWidthMismatch { row: usize, expected: usize, found: usize },
}

impl Display for MalformedReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewLines { found, required } => {
                write!(f, "section has {found} line(s), needs at least {required}")
            }
            Self::EmptyHeader => f.write_str("header row has no cells"),
            Self::NoDataRows => f.write_str("section has no data rows"),
            Self::RowWidthMismatch { row, expected, found } => write!(
                f,
                "row {row} has {found} cell(s), header has {expected}"
            ),
        }
    }
}

/// Table layout accepted under a section title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableGrammar {
    /// `### Title`, header, `---` separator, rows. Emitted by the `/query` backend.
    #[default]
    Strict,
    /// Bare title line, header, optional separator, rows; ends at a blank line.
    Lenient,
}

impl TableGrammar {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }

    pub(crate) const fn min_lines(self) -> usize {
        match self {
            Self::Strict => 3,
            Self::Lenient => 2,
        }
    }
}

impl FromStr for TableGrammar {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(ValidationError::InvalidGrammar {
                value: value.to_owned(),
            }),
        }
    }
}

/// What to do with data rows whose cell count differs from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAlignment {
    /// Keep rows exactly as split.
    #[default]
    Preserve,
    /// Pad short rows with empty cells and truncate long ones.
    Pad,
    /// Treat any mismatch as a malformed section.
    Reject,
}

impl RowAlignment {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preserve => "preserve",
            Self::Pad => "pad",
            Self::Reject => "reject",
        }
    }
}

impl FromStr for RowAlignment {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "pad" => Ok(Self::Pad),
            "reject" => Ok(Self::Reject),
            _ => Err(ValidationError::InvalidRowAlignment {
                value: value.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractOptions {
    pub grammar: TableGrammar,
    pub rows: RowAlignment,
}

impl ExtractOptions {
    pub const fn new(grammar: TableGrammar, rows: RowAlignment) -> Self {
        Self { grammar, rows }
    }
}

/// Find `title` in `text` and parse the table beneath it.
///
/// Only the first occurrence of the title is considered.
pub fn extract_section(title: &str, text: &str, options: ExtractOptions) -> SectionOutcome {
    let lines = lexer::tokenize(text);
    parser::locate(title, &lines, options)
        .map_or(SectionOutcome::NotFound, |located| located.outcome)
}
