//! Leaderboard module - high score persistence
//!
//! Scores are ranked descending, capped at a fixed number of entries, and
//! stored as a JSON file. A missing or unparseable file reads as an empty
//! table rather than an error, so a corrupt save never blocks a new game.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Maximum number of persisted entries
pub const MAX_ENTRIES: usize = 10;

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    /// Seconds since the Unix epoch at submission time
    pub timestamp: u64,
}

/// File-backed high score table
#[derive(Debug, Clone)]
pub struct Leaderboard {
    path: PathBuf,
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Open the leaderboard at `path`, tolerating missing or corrupt data
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self { path, entries }
    }

    /// Entries ranked descending by score (ties keep insertion order)
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Whether `score` would make it onto the table
    pub fn is_high_score(&self, score: u32) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        match self.entries.last() {
            Some(last) => score > last.score,
            None => true,
        }
    }

    /// Insert a score, re-rank, trim to capacity, and persist.
    ///
    /// Returns true if the entry survived the cut. A blank name is stored
    /// as "Anonymous".
    pub fn add_score(&mut self, name: &str, score: u32, level: u32, lines: u32) -> Result<bool> {
        let name = name.trim();
        let entry = LeaderboardEntry {
            name: if name.is_empty() {
                "Anonymous".to_string()
            } else {
                name.to_string()
            },
            score,
            level,
            lines,
            timestamp: unix_timestamp(),
        };

        self.entries.push(entry.clone());
        // Stable sort: equal scores keep insertion order.
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);

        self.save()?;
        Ok(self.entries.contains(&entry))
    }

    /// Remove all entries and persist the empty table
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

fn load_entries(path: &Path) -> Vec<LeaderboardEntry> {
    let Ok(data) = fs::read_to_string(path) else {
        return Vec::new();
    };
    serde_json::from_str(&data).unwrap_or_default()
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        (dir, path)
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let (_dir, path) = temp_path("missing.json");
        let board = Leaderboard::open(path);
        assert!(board.entries().is_empty());
    }

    #[test]
    fn test_open_corrupt_file_is_empty() {
        let (_dir, path) = temp_path("corrupt.json");
        fs::write(&path, "not json {{{").unwrap();

        let board = Leaderboard::open(&path);
        assert!(board.entries().is_empty());
    }

    #[test]
    fn test_add_score_ranks_descending() {
        let (_dir, path) = temp_path("rank.json");
        let mut board = Leaderboard::open(path);

        board.add_score("a", 100, 1, 3).unwrap();
        board.add_score("b", 300, 2, 12).unwrap();
        board.add_score("c", 200, 1, 7).unwrap();

        let scores: Vec<u32> = board.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200, 100]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let (_dir, path) = temp_path("ties.json");
        let mut board = Leaderboard::open(path);

        board.add_score("first", 500, 1, 5).unwrap();
        board.add_score("second", 500, 1, 5).unwrap();

        assert_eq!(board.entries()[0].name, "first");
        assert_eq!(board.entries()[1].name, "second");
    }

    #[test]
    fn test_capped_at_max_entries() {
        let (_dir, path) = temp_path("cap.json");
        let mut board = Leaderboard::open(path);

        for i in 0..15u32 {
            board.add_score(&format!("p{}", i), i * 10, 1, 0).unwrap();
        }

        assert_eq!(board.entries().len(), MAX_ENTRIES);
        // The lowest scores fell off.
        assert!(board.entries().iter().all(|e| e.score >= 50));
    }

    #[test]
    fn test_add_score_reports_cut() {
        let (_dir, path) = temp_path("cut.json");
        let mut board = Leaderboard::open(path);

        for i in 0..MAX_ENTRIES as u32 {
            board.add_score("filler", 100 + i, 1, 0).unwrap();
        }

        assert!(board.add_score("good", 1000, 5, 40).unwrap());
        assert!(!board.add_score("bad", 1, 1, 0).unwrap());
    }

    #[test]
    fn test_is_high_score() {
        let (_dir, path) = temp_path("high.json");
        let mut board = Leaderboard::open(path);

        // Any score qualifies while the table has room.
        assert!(board.is_high_score(0));

        for i in 0..MAX_ENTRIES as u32 {
            board.add_score("filler", (i + 1) * 100, 1, 0).unwrap();
        }

        // Must beat the current last entry (100).
        assert!(!board.is_high_score(100));
        assert!(board.is_high_score(101));
    }

    #[test]
    fn test_blank_name_becomes_anonymous() {
        let (_dir, path) = temp_path("anon.json");
        let mut board = Leaderboard::open(path);
        board.add_score("   ", 50, 1, 0).unwrap();
        assert_eq!(board.entries()[0].name, "Anonymous");
    }

    #[test]
    fn test_persists_across_opens() {
        let (_dir, path) = temp_path("persist.json");
        {
            let mut board = Leaderboard::open(&path);
            board.add_score("keeper", 700, 3, 21).unwrap();
        }

        let reopened = Leaderboard::open(&path);
        assert_eq!(reopened.entries().len(), 1);
        assert_eq!(reopened.entries()[0].name, "keeper");
        assert_eq!(reopened.entries()[0].score, 700);
    }

    #[test]
    fn test_clear_empties_table_and_file() {
        let (_dir, path) = temp_path("clear.json");
        let mut board = Leaderboard::open(&path);
        board.add_score("gone", 900, 4, 33).unwrap();

        board.clear().unwrap();
        assert!(board.entries().is_empty());

        let reopened = Leaderboard::open(&path);
        assert!(reopened.entries().is_empty());
    }
}
