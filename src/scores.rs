/// High-score persistence: a JSON file holding the top ten runs,
/// sorted by score descending.  A missing or corrupt file degrades to
/// an empty table; saving failures are logged and swallowed so the
/// game loop never sees an I/O error.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::error;
use serde::{Deserialize, Serialize};

use crate::entities::Difficulty;

const MAX_ENTRIES: usize = 10;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    pub difficulty: String,
    pub level_reached: u32,
    pub recorded_at_unix: u64,
}

#[derive(Debug)]
pub struct HighScores {
    path: PathBuf,
    entries: Vec<ScoreEntry>,
}

impl HighScores {
    /// Load the table from `path`, falling back to an empty table.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<ScoreEntry>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    error!("corrupt high-score file {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        let mut scores = HighScores { path, entries };
        scores.sort_and_truncate();
        scores
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when `score` would make the table: room left, or it beats
    /// the current last place.
    pub fn is_high_score(&self, score: u32) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map_or(true, |last| score > last.score)
    }

    /// Record a run and persist the table.  Returns the 0-based rank
    /// the score lands at.
    pub fn add_score(
        &mut self,
        name: &str,
        score: u32,
        difficulty: Difficulty,
        level_reached: u32,
    ) -> usize {
        self.entries.push(ScoreEntry {
            name: name.to_string(),
            score,
            difficulty: difficulty.label().to_string(),
            level_reached,
            recorded_at_unix: unix_now(),
        });
        self.sort_and_truncate();
        self.save();
        self.position_of(score)
    }

    /// The top `count` entries, best first.
    pub fn top_scores(&self, count: usize) -> &[ScoreEntry] {
        &self.entries[..count.min(self.entries.len())]
    }

    pub fn best(&self) -> u32 {
        self.entries.first().map_or(0, |e| e.score)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.save();
    }

    fn position_of(&self, score: u32) -> usize {
        self.entries
            .iter()
            .position(|e| score >= e.score)
            .unwrap_or(self.entries.len())
    }

    fn sort_and_truncate(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }

    fn save(&self) {
        let encoded = match serde_json::to_string_pretty(&self.entries) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!("failed to encode high scores: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, encoded) {
            error!("failed to write {}: {}", self.path.display(), e);
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
