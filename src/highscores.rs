//! High score lists
//!
//! One list per campaign, stored as a text file named after the campaign's
//! short name. The first line is the campaign name; every following line is
//! `score<TAB>level`. The whole file is rewritten, sorted by descending score,
//! after each append.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::tuning::CampaignConfig;

/// File extension of score files
pub const SCORE_FILE_EXT: &str = "scores";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Round the score was set in
    pub level: String,
}

/// High score list of one campaign, sorted by descending score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    /// Campaign name header
    pub campaign: String,
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create an empty list
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
            entries: Vec::new(),
        }
    }

    /// Add a score, keeping descending order; equal scores keep insertion order.
    /// Returns the rank achieved (1-indexed).
    pub fn add_score(&mut self, score: u64, level: impl Into<String>) -> usize {
        let entry = HighScoreEntry {
            score,
            level: level.into(),
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
        match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        }
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Parse the text format. Malformed score lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut lines = text.lines();
        let campaign = lines.next().unwrap_or_default().trim().to_string();
        let mut entries: Vec<HighScoreEntry> = lines
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                let parsed = line.split_once('\t').and_then(|(score, level)| {
                    score.trim().parse().ok().map(|score| HighScoreEntry {
                        score,
                        level: level.trim().to_string(),
                    })
                });
                if parsed.is_none() {
                    log::warn!("Skipping malformed score line: {:?}", line);
                }
                parsed
            })
            .collect();
        // Files edited by hand may be out of order
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Self { campaign, entries }
    }

    /// Render the text format
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(32 * (self.entries.len() + 1));
        out.push_str(&self.campaign);
        out.push('\n');
        for entry in &self.entries {
            out.push_str(&format!("{}\t{}\n", entry.score, entry.level));
        }
        out
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScoreStoreError {
    #[error("score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Score store collaborator
pub trait ScoreStore {
    /// Append a score to `campaign`'s list and persist the re-sorted list
    fn append_score(
        &mut self,
        campaign: &CampaignConfig,
        score: u64,
        level: &str,
    ) -> Result<(), ScoreStoreError>;

    /// Current list for `campaign`
    fn load(&self, campaign: &CampaignConfig) -> Result<HighScores, ScoreStoreError>;
}

/// One text file per campaign in a directory
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    dir: PathBuf,
}

impl FileScoreStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, short_name: &str) -> PathBuf {
        self.dir.join(format!("{short_name}.{SCORE_FILE_EXT}"))
    }

    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ScoreStoreError + '_ {
        move |source| ScoreStoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ScoreStore for FileScoreStore {
    fn append_score(
        &mut self,
        campaign: &CampaignConfig,
        score: u64,
        level: &str,
    ) -> Result<(), ScoreStoreError> {
        let mut scores = self.load(campaign)?;
        let rank = scores.add_score(score, level);

        let path = self.path_for(&campaign.short_name);
        std::fs::create_dir_all(&self.dir).map_err(Self::io_error(&self.dir))?;
        std::fs::write(&path, scores.render()).map_err(Self::io_error(&path))?;
        log::info!(
            "High score {} ({}) saved at rank {} in {}",
            score,
            level,
            rank,
            path.display()
        );
        Ok(())
    }

    fn load(&self, campaign: &CampaignConfig) -> Result<HighScores, ScoreStoreError> {
        let path = self.path_for(&campaign.short_name);
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let mut scores = HighScores::parse(&text);
                if scores.campaign.is_empty() {
                    scores.campaign = campaign.name.clone();
                }
                Ok(scores)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(HighScores::new(campaign.name.clone()))
            }
            Err(e) => Err(Self::io_error(&path)(e)),
        }
    }
}

/// In-memory store keyed by campaign short name
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    pub lists: HashMap<String, HighScores>,
}

impl ScoreStore for MemoryScoreStore {
    fn append_score(
        &mut self,
        campaign: &CampaignConfig,
        score: u64,
        level: &str,
    ) -> Result<(), ScoreStoreError> {
        self.lists
            .entry(campaign.short_name.clone())
            .or_insert_with(|| HighScores::new(campaign.name.clone()))
            .add_score(score, level);
        Ok(())
    }

    fn load(&self, campaign: &CampaignConfig) -> Result<HighScores, ScoreStoreError> {
        Ok(self
            .lists
            .get(&campaign.short_name)
            .cloned()
            .unwrap_or_else(|| HighScores::new(campaign.name.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_score_sorted_descending() {
        let mut scores = HighScores::new("Test");
        assert_eq!(scores.add_score(100, "Round 0"), 1);
        assert_eq!(scores.add_score(300, "Round 2"), 1);
        assert_eq!(scores.add_score(200, "Round 1"), 2);
        assert_eq!(scores.add_score(200, "Round 4"), 3);
        assert_eq!(scores.add_score(5, "Round 0"), 5);

        let values: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![300, 200, 200, 100, 5]);
        assert_eq!(scores.entries[1].level, "Round 1");
        assert_eq!(scores.top_score(), Some(300));
    }

    #[test]
    fn test_parse_render() {
        let text = "My Campaign\n10\tRound 0: A\n50\tRound 2: C\nbogus line\n\n30\tRound 1: B\n";
        let scores = HighScores::parse(text);
        assert_eq!(scores.campaign, "My Campaign");
        let values: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![50, 30, 10]);
        assert_eq!(
            scores.render(),
            "My Campaign\n50\tRound 2: C\n30\tRound 1: B\n10\tRound 0: A\n"
        );
    }

    #[test]
    fn test_parse_empty() {
        let scores = HighScores::parse("");
        assert!(scores.campaign.is_empty());
        assert!(scores.is_empty());
    }

    #[test]
    fn test_file_store_rewrites_sorted_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileScoreStore::new(dir.path().join("scores"));
        let campaign = CampaignConfig::builtin();

        store.append_score(&campaign, 40, "Round 1: Crossfire").unwrap();
        store.append_score(&campaign, 90, "Round 3: Slants").unwrap();
        store.append_score(&campaign, 10, "Round 0: Warm Up").unwrap();

        let text = std::fs::read_to_string(store.path_for(&campaign.short_name)).unwrap();
        assert_eq!(
            text,
            "InfiniCube\n90\tRound 3: Slants\n40\tRound 1: Crossfire\n10\tRound 0: Warm Up\n"
        );
        assert_eq!(store.load(&campaign).unwrap().top_score(), Some(90));
    }

    #[test]
    fn test_file_store_preserves_existing_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileScoreStore::new(dir.path());
        let campaign = CampaignConfig::builtin();
        std::fs::write(store.path_for(&campaign.short_name), "Legacy Header\n5\tRound 0\n").unwrap();

        store.append_score(&campaign, 7, "Round 1").unwrap();
        let text = std::fs::read_to_string(store.path_for(&campaign.short_name)).unwrap();
        assert_eq!(text, "Legacy Header\n7\tRound 1\n5\tRound 0\n");
    }

    #[test]
    fn test_file_store_reports_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        // A plain file where the score directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut store = FileScoreStore::new(&blocker);
        let campaign = CampaignConfig::builtin();
        assert!(store.append_score(&campaign, 1, "Round 0").is_err());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryScoreStore::default();
        let campaign = CampaignConfig::builtin();
        assert!(store.load(&campaign).unwrap().is_empty());
        store.append_score(&campaign, 3, "Round 0").unwrap();
        store.append_score(&campaign, 8, "Round 1").unwrap();
        let scores = store.load(&campaign).unwrap();
        assert_eq!(scores.campaign, "InfiniCube");
        assert_eq!(scores.top_score(), Some(8));
    }
}
