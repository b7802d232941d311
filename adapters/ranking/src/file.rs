//! Ranking store backed by a JSON file and a text export in one directory.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{parse_text, render_text, Ranking, RankingEntry, RankingError, RankingStore};

const JSON_FILE_NAME: &str = "ranking.json";
const TEXT_FILE_NAME: &str = "ranking.txt";

/// Persists the ranking as `ranking.json` alongside a `ranking.txt` export.
///
/// Loading prefers the JSON file and falls back to the text export. Any read
/// failure yields an empty ranking.
#[derive(Clone, Debug)]
pub struct FileRankingStore {
    json_path: PathBuf,
    text_path: PathBuf,
}

impl FileRankingStore {
    /// Stores both files inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            json_path: dir.join(JSON_FILE_NAME),
            text_path: dir.join(TEXT_FILE_NAME),
        }
    }

    /// Path of the primary JSON file.
    #[must_use]
    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    /// Path of the text export.
    #[must_use]
    pub fn text_path(&self) -> &Path {
        &self.text_path
    }

    /// Writes `ranking` to both files.
    pub fn save(&self, ranking: &Ranking) -> Result<(), RankingError> {
        if let Some(parent) = self.json_path.parent() {
            fs::create_dir_all(parent).map_err(|source| RankingError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(ranking)?;
        write_file(&self.json_path, &json)?;
        write_file(&self.text_path, &render_text(ranking))
    }

    fn load_json(&self) -> Result<Option<Ranking>, RankingError> {
        let Some(contents) = read_optional(&self.json_path)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn load_text(&self) -> Result<Option<Ranking>, RankingError> {
        let Some(contents) = read_optional(&self.text_path)? else {
            return Ok(None);
        };
        parse_text(&contents).map(Some)
    }
}

impl RankingStore for FileRankingStore {
    fn load(&self) -> Ranking {
        match self.load_json() {
            Ok(Some(ranking)) => return ranking,
            Ok(None) => debug!(path = %self.json_path.display(), "no ranking json yet"),
            Err(error) => warn!(
                path = %self.json_path.display(),
                error = %error,
                "ranking json unusable; trying text export"
            ),
        }

        match self.load_text() {
            Ok(Some(ranking)) => ranking,
            Ok(None) => Ranking::default(),
            Err(error) => {
                warn!(
                    path = %self.text_path.display(),
                    error = %error,
                    "ranking text export unusable; starting empty"
                );
                Ranking::default()
            }
        }
    }

    fn record(&mut self, entry: RankingEntry) -> Ranking {
        let mut ranking = self.load();
        let name = entry.name().to_owned();
        let score = entry.score();
        match ranking.merge(entry) {
            Some(position) => info!(%name, score, position, "score entered the ranking"),
            None => info!(%name, score, "score did not reach the ranking"),
        }

        if let Err(error) = self.save(&ranking) {
            warn!(error = %error, "failed to persist ranking");
        }
        ranking
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, RankingError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(RankingError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), RankingError> {
    fs::write(path, contents).map_err(|source| RankingError::Io {
        path: path.to_path_buf(),
        source,
    })
}
