use std::fmt::Write as _;
use std::io::{self, Write};

use finbot_core::{
    NewsBoard, ParsedTable, PollSnapshot, PollStatus, PriceBoard, RenderedMessage, Segment,
    NEWS_DISPLAY_LIMIT, SUMMARY_PREVIEW_CHARS,
};
use serde::Serialize;

use crate::error::CliError;

/// Print `value` as one JSON document on stdout.
pub fn emit_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    emit_text(&payload)
}

pub fn emit_text(text: &str) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}")?;
    stdout.flush()?;
    Ok(())
}

pub fn format_rendered(message: &RenderedMessage) -> String {
    let mut out = String::new();
    for (index, segment) in message.segments.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        match segment {
            Segment::Table { title, table } => {
                let _ = writeln!(out, "{title}");
                out.push_str(&format_table(table));
            }
            Segment::Markdown { text } => {
                out.push_str(text.trim_end());
                out.push('\n');
            }
        }
    }
    out
}

/// Box-drawn table; rows wider than the header get unnamed columns.
pub fn format_table(table: &ParsedTable) -> String {
    let columns = table
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.headers.len()))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0_usize; columns];
    for row in std::iter::once(&table.headers).chain(table.rows.iter()) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = |out: &mut String| {
        out.push('+');
        for width in &widths {
            out.push_str(&"-".repeat(width + 2));
            out.push('+');
        }
        out.push('\n');
    };
    let line = |out: &mut String, row: &[String]| {
        out.push('|');
        for (index, &width) in widths.iter().enumerate() {
            let cell = row.get(index).map(String::as_str).unwrap_or("");
            let _ = write!(out, " {cell:<width$} |");
        }
        out.push('\n');
    };

    let mut out = String::new();
    rule(&mut out);
    line(&mut out, &table.headers);
    rule(&mut out);
    for row in &table.rows {
        line(&mut out, row);
    }
    rule(&mut out);
    out
}

pub fn format_price(symbol: &str, snapshot: &PollSnapshot<PriceBoard>) -> String {
    let mut out = String::new();
    match &snapshot.status {
        PollStatus::Loading => {
            let _ = writeln!(out, "{symbol}: loading...");
            return out;
        }
        PollStatus::Error { message } => {
            let _ = writeln!(out, "{symbol}: error: {message}");
        }
        PollStatus::Success => {}
    }

    if let Some(point) = &snapshot.model.current {
        let arrow = if point.is_gain() { '▲' } else { '▼' };
        let _ = writeln!(
            out,
            "{symbol} {price:.2} {arrow} {change:+.2} ({percent:+.2}%)  at {time}",
            price = point.price,
            change = point.change,
            percent = point.percent_change,
            time = point.timestamp,
        );
        let _ = writeln!(
            out,
            "  open {:.2}  high {:.2}  low {:.2}  prev close {:.2}",
            point.open, point.high, point.low, point.previous_close
        );
    }

    if !snapshot.model.history.is_empty() {
        let prices: Vec<String> = snapshot
            .model
            .history
            .iter()
            .map(|point| format!("{:.2}", point.price))
            .collect();
        let _ = writeln!(
            out,
            "  history ({}/{}): {}",
            snapshot.model.history.len(),
            snapshot.model.history.capacity(),
            prices.join(" ")
        );
    }
    out
}

pub fn format_news(feed: &str, snapshot: &PollSnapshot<NewsBoard>) -> String {
    let mut out = String::new();
    match &snapshot.status {
        PollStatus::Loading => {
            let _ = writeln!(out, "{feed}: loading news...");
            return out;
        }
        PollStatus::Error { message } => {
            let _ = writeln!(out, "{feed}: error: {message}");
        }
        PollStatus::Success if snapshot.model.articles.is_empty() => {
            let _ = writeln!(out, "{feed}: no news articles available");
            return out;
        }
        PollStatus::Success => {
            let total = snapshot.model.articles.len();
            if total > NEWS_DISPLAY_LIMIT {
                let _ = writeln!(out, "{feed}: {NEWS_DISPLAY_LIMIT} of {total} articles");
            } else {
                let _ = writeln!(out, "{feed}: {total} articles");
            }
        }
    }

    for article in snapshot.model.articles.iter().take(NEWS_DISPLAY_LIMIT) {
        let _ = writeln!(out, "* {}", article.title);
        let mut byline = format!("  {}", article.source);
        if let Some(author) = article.author.as_deref().filter(|a| !a.is_empty()) {
            let _ = write!(byline, " by {author}");
        }
        let published = match article.time_published.as_str() {
            "" => "Unknown date",
            stamp => stamp,
        };
        let _ = write!(byline, " ({published})");
        let _ = writeln!(out, "{byline}");

        let preview = article.summary_preview(SUMMARY_PREVIEW_CHARS);
        if !preview.is_empty() {
            let _ = writeln!(out, "  {preview}");
        }
        if let Some(url) = &article.url {
            let _ = writeln!(out, "  {url}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use finbot_core::{NewsArticle, PricePoint};

    use super::*;

    fn table() -> ParsedTable {
        ParsedTable {
            headers: vec![String::from("Sym"), String::from("Price")],
            rows: vec![
                vec![String::from("AAPL"), String::from("150")],
                vec![String::from("MSFT"), String::from("410.25"), String::from("extra")],
            ],
        }
    }

    #[test]
    fn table_columns_are_aligned() {
        let text = format_table(&table());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "+------+--------+-------+");
        assert_eq!(lines[1], "| Sym  | Price  |       |");
        assert_eq!(lines[3], "| AAPL | 150    |       |");
        assert_eq!(lines[4], "| MSFT | 410.25 | extra |");
        assert!(lines.iter().all(|line| line.chars().count() == lines[0].chars().count()));
    }

    #[test]
    fn rendered_message_keeps_segment_order() {
        let message = RenderedMessage {
            segments: vec![
                Segment::Markdown {
                    text: String::from("Here you go:\n"),
                },
                Segment::Table {
                    title: String::from("Top Gainers"),
                    table: table(),
                },
            ],
        };

        let text = format_rendered(&message);
        let intro = text.find("Here you go:").expect("markdown printed");
        let title = text.find("Top Gainers").expect("title printed");
        assert!(intro < title);
    }

    #[test]
    fn price_error_keeps_last_known_quote() {
        let mut snapshot: PollSnapshot<PriceBoard> = PollSnapshot::default();
        snapshot.model.record(PricePoint {
            timestamp: String::from("09:30:05"),
            price: 189.5,
            change: -1.0,
            percent_change: -0.52,
            high: 191.0,
            low: 188.0,
            open: 190.5,
            previous_close: 190.5,
        });
        snapshot.status = PollStatus::Error {
            message: String::from("Failed to fetch stock data."),
        };

        let text = format_price("AAPL", &snapshot);
        assert!(text.starts_with("AAPL: error: Failed to fetch stock data."));
        assert!(text.contains("189.50 ▼ -1.00 (-0.52%)"));
        assert!(text.contains("history (1/20): 189.50"));
    }

    fn article(title: &str, time_published: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_owned(),
            source: String::from("Reuters"),
            time_published: time_published.to_owned(),
            author: None,
            summary: None,
            image_url: None,
            url: None,
            ticker_sentiment: None,
        }
    }

    #[test]
    fn news_summary_is_previewed() {
        let mut snapshot: PollSnapshot<NewsBoard> = PollSnapshot::default();
        snapshot.status = PollStatus::Success;
        snapshot.model.articles = vec![NewsArticle {
            summary: Some("x".repeat(200)),
            ..article("Chipmakers rally", "20250301T140000")
        }];

        let text = format_news("NVDA", &snapshot);
        assert!(text.contains("* Chipmakers rally"));
        assert!(text.contains("  Reuters (20250301T140000)"));
        assert!(text.contains(&format!("  {}...", "x".repeat(150))));
    }

    #[test]
    fn news_listing_shows_first_ten_articles() {
        let mut snapshot: PollSnapshot<NewsBoard> = PollSnapshot::default();
        snapshot.status = PollStatus::Success;
        snapshot.model.articles = (1..=12)
            .map(|n| article(&format!("Story {n}"), "20250301T140000"))
            .collect();

        let text = format_news("general", &snapshot);

        assert!(text.starts_with("general: 10 of 12 articles\n"));
        assert!(text.contains("* Story 10\n"));
        assert!(!text.contains("* Story 11"));
        assert_eq!(text.matches("* Story").count(), NEWS_DISPLAY_LIMIT);
    }

    #[test]
    fn missing_publish_time_reads_unknown_date() {
        let mut snapshot: PollSnapshot<NewsBoard> = PollSnapshot::default();
        snapshot.status = PollStatus::Success;
        snapshot.model.articles = vec![article("Undated", "")];

        let text = format_news("AAPL", &snapshot);
        assert!(text.contains("  Reuters (Unknown date)"));
    }

    #[test]
    fn empty_news_list_is_reported() {
        let mut snapshot: PollSnapshot<NewsBoard> = PollSnapshot::default();
        snapshot.status = PollStatus::Success;
        assert_eq!(
            format_news("general", &snapshot),
            "general: no news articles available\n"
        );
    }
}
