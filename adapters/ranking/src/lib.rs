#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persistent high-score ranking shared between rounds.
//!
//! The ranking keeps the best [`RANKING_CAPACITY`] scores ordered from highest
//! to lowest. Stores never fail a round: unreadable or corrupt data degrades to
//! an empty ranking and failed writes are logged.

mod file;
mod text;

use std::{io, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use file::FileRankingStore;
pub use text::{parse_text, render_text, TEXT_HEADER};

/// Number of entries a ranking retains.
pub const RANKING_CAPACITY: usize = 10;
/// Maximum number of characters kept from a player name.
pub const MAX_NAME_CHARS: usize = 15;
/// Maximum number of characters kept from a player code.
pub const MAX_CODE_CHARS: usize = 10;
/// Name recorded when the player leaves the name blank.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Errors raised while reading or writing ranking files.
#[derive(Debug, Error)]
pub enum RankingError {
    /// The ranking file could not be read or written.
    #[error("failed to access ranking file {path}")]
    Io {
        /// File that could not be accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The JSON ranking could not be encoded or decoded.
    #[error("invalid ranking json")]
    Json(#[from] serde_json::Error),
    /// The text export did not start with the expected header.
    #[error("ranking text export is missing its header line")]
    MissingHeader,
    /// A ranking line in the text export could not be parsed.
    #[error("malformed ranking line {line_number}: {line:?}")]
    MalformedLine {
        /// One-based line number within the file.
        line_number: usize,
        /// Offending line contents.
        line: String,
    },
}

/// A single recorded score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredEntry")]
pub struct RankingEntry {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    score: u32,
}

impl RankingEntry {
    /// Creates an entry, trimming and truncating the name and code.
    ///
    /// Control characters become spaces so every entry fits on one line of
    /// the text export. A blank name is replaced by [`DEFAULT_PLAYER_NAME`]; a blank code is dropped.
    #[must_use]
    pub fn new(name: &str, code: Option<&str>, score: u32) -> Self {
        let name = sanitize(name, MAX_NAME_CHARS);
        let name = if name.is_empty() {
            DEFAULT_PLAYER_NAME.to_owned()
        } else {
            name
        };
        let code = code
            .map(|code| sanitize(code, MAX_CODE_CHARS))
            .filter(|code| !code.is_empty());

        Self { name, code, score }
    }

    /// Player name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional player code.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Recorded score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }
}

#[derive(Deserialize)]
struct StoredEntry {
    name: String,
    #[serde(default)]
    code: Option<String>,
    score: u32,
}

impl From<StoredEntry> for RankingEntry {
    fn from(stored: StoredEntry) -> Self {
        Self::new(&stored.name, stored.code.as_deref(), stored.score)
    }
}

fn sanitize(value: &str, limit: usize) -> String {
    let printable: String = value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let truncated: String = printable.trim().chars().take(limit).collect();
    truncated.trim_end().to_owned()
}

/// Ordered, bounded list of the best scores.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RankingEntry>", into = "Vec<RankingEntry>")]
pub struct Ranking {
    entries: Vec<RankingEntry>,
}

impl Ranking {
    /// Builds a ranking from arbitrary entries, sorting and truncating them.
    ///
    /// Entries with equal scores keep their relative order.
    #[must_use]
    pub fn from_entries(mut entries: Vec<RankingEntry>) -> Self {
        entries.sort_by(|left, right| right.score.cmp(&left.score));
        entries.truncate(RANKING_CAPACITY);
        Self { entries }
    }

    /// Inserts `entry` and returns its one-based position, or `None` when it
    /// did not make the cut.
    ///
    /// The new entry ranks below existing entries with the same score.
    pub fn merge(&mut self, entry: RankingEntry) -> Option<usize> {
        let index = self
            .entries
            .iter()
            .position(|existing| existing.score < entry.score)
            .unwrap_or(self.entries.len());
        if index >= RANKING_CAPACITY {
            return None;
        }

        self.entries.insert(index, entry);
        self.entries.truncate(RANKING_CAPACITY);
        Some(index + 1)
    }

    /// Entries ordered from highest to lowest score.
    #[must_use]
    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One-based position of the first entry matching `name` and `score`.
    #[must_use]
    pub fn position_of(&self, name: &str, score: u32) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.name == name && entry.score == score)
            .map(|index| index + 1)
    }
}

impl From<Vec<RankingEntry>> for Ranking {
    fn from(entries: Vec<RankingEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<Ranking> for Vec<RankingEntry> {
    fn from(ranking: Ranking) -> Self {
        ranking.entries
    }
}

/// Read/write contract between a finished round and the ranking storage.
pub trait RankingStore {
    /// Returns the stored ranking, or an empty one when nothing usable exists.
    fn load(&self) -> Ranking;

    /// Merges `entry` into the stored ranking and returns the updated ranking.
    fn record(&mut self, entry: RankingEntry) -> Ranking;
}

/// Ranking store that lives only as long as the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryRankingStore {
    ranking: Ranking,
}

impl MemoryRankingStore {
    /// Creates a store seeded with an existing ranking.
    #[must_use]
    pub fn new(ranking: Ranking) -> Self {
        Self { ranking }
    }
}

impl RankingStore for MemoryRankingStore {
    fn load(&self) -> Ranking {
        self.ranking.clone()
    }

    fn record(&mut self, entry: RankingEntry) -> Ranking {
        let _ = self.ranking.merge(entry);
        self.ranking.clone()
    }
}
