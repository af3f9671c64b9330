//! Line scanner that turns raw plan text into a [`PlanDocument`].
//!
//! Classification order is fixed: heading, then bullet, then paragraph.
//! A line such as `1. - something` is therefore a heading.

use crate::blocks::{Block, PlanDocument};
use tracing::debug;

const BULLET_PREFIXES: [&str; 3] = ["- ", "* ", "• "];
const EMPHASIS_MARKERS: [&str; 2] = ["**", "__"];

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Heading(&'a str),
    Bullet(&'a str),
    Paragraph(&'a str),
}

fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if is_heading(line) {
        return Line::Heading(line);
    }
    for prefix in BULLET_PREFIXES {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Line::Bullet(rest.trim());
        }
    }
    Line::Paragraph(line)
}

/// `12 Something`, `7`, or `1. Something`.
fn is_heading(line: &str) -> bool {
    let mut chars = line.chars();
    let first = chars.next();
    let second = chars.next();
    let leading: Vec<char> = first.into_iter().chain(second).collect();
    if !leading.is_empty() && leading.iter().all(|c| c.is_numeric()) {
        return true;
    }
    line.chars().count() > 2 && first.is_some_and(char::is_numeric) && second == Some('.')
}

/// Every line break the model might emit becomes `\n`.
fn normalize_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace(
        [
            '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}',
            '\u{2029}',
        ],
        "\n",
    )
}

fn strip_emphasis(line: &str) -> String {
    EMPHASIS_MARKERS
        .iter()
        .fold(line.to_string(), |acc, marker| acc.replace(marker, ""))
}

/// Parse generated plan text into a titled document.
///
/// Never fails: every line lands in some block. Bullets accumulate until a
/// non-bullet line, a blank line, or the end of input.
pub fn parse_plan(text: &str, company_name: &str) -> PlanDocument {
    let mut doc = PlanDocument::with_title(company_name);
    let mut pending: Vec<String> = Vec::new();

    fn flush(doc: &mut PlanDocument, pending: &mut Vec<String>) {
        if !pending.is_empty() {
            doc.push(Block::BulletList(std::mem::take(pending)));
        }
    }

    for raw in normalize_breaks(text).lines() {
        match classify(raw) {
            Line::Blank => {
                flush(&mut doc, &mut pending);
                doc.push(Block::Spacer);
            }
            Line::Heading(line) => {
                flush(&mut doc, &mut pending);
                doc.push(Block::Heading(line.to_string()));
            }
            Line::Bullet(item) => pending.push(item.to_string()),
            Line::Paragraph(line) => {
                flush(&mut doc, &mut pending);
                doc.push(Block::Paragraph(strip_emphasis(line)));
            }
        }
    }
    flush(&mut doc, &mut pending);

    debug!(
        blocks = doc.blocks().len(),
        headings = doc.headings().len(),
        "Parsed plan text"
    );
    doc
}
