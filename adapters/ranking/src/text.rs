//! Human-readable ranking export.
//!
//! ```text
//! === RANKING ===
//!
//! 1. Alice: 200 points
//! 2. Bob: 90 points
//! ```
//!
//! Codes are not part of the export.

use std::fmt::Write as _;

use crate::{Ranking, RankingEntry, RankingError};

/// First line of every text export.
pub const TEXT_HEADER: &str = "=== RANKING ===";
const POINTS_SUFFIX: &str = " points";

/// Renders the ranking in the text export format.
#[must_use]
pub fn render_text(ranking: &Ranking) -> String {
    let mut text = format!("{TEXT_HEADER}\n\n");
    for (index, entry) in ranking.entries().iter().enumerate() {
        let _ = writeln!(
            text,
            "{}. {}: {}{POINTS_SUFFIX}",
            index + 1,
            entry.name(),
            entry.score()
        );
    }
    text
}

/// Parses a text export back into a ranking.
pub fn parse_text(contents: &str) -> Result<Ranking, RankingError> {
    let mut lines = contents.lines();
    if lines.next().map(str::trim) != Some(TEXT_HEADER) {
        return Err(RankingError::MissingHeader);
    }

    let mut entries = Vec::new();
    for (index, line) in lines.enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let entry = parse_line(trimmed).ok_or_else(|| RankingError::MalformedLine {
            line_number: index + 2,
            line: line.to_owned(),
        })?;
        entries.push(entry);
    }
    Ok(Ranking::from_entries(entries))
}

fn parse_line(line: &str) -> Option<RankingEntry> {
    let (position, rest) = line.split_once(". ")?;
    let _: usize = position.parse().ok()?;
    let (name, score) = rest.rsplit_once(": ")?;
    let score = score.strip_suffix(POINTS_SUFFIX)?.parse().ok()?;
    Some(RankingEntry::new(name, None, score))
}
