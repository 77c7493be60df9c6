//! Save-file progress tracking
//!
//! Persisted as JSON, records which levels are completed and the best score
//! per level. Level 1 is always unlocked; each later level unlocks once its
//! predecessor is completed.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Per-save progress, keyed by 1-based level number
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Progress {
    /// Completed level numbers, kept sorted
    pub completed: Vec<u32>,
    /// Best score achieved per level
    pub best_scores: Vec<(u32, u32)>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, level: u32) -> bool {
        self.completed.binary_search(&level).is_ok()
    }

    /// Level 1 is free; later levels need the previous one completed
    pub fn is_unlocked(&self, level: u32) -> bool {
        level == 1 || self.is_completed(level - 1)
    }

    /// Record a completion and the score achieved. Keeps the best score.
    pub fn record_completion(&mut self, level: u32, score: u32) {
        if let Err(pos) = self.completed.binary_search(&level) {
            self.completed.insert(pos, level);
        }
        match self.best_scores.iter_mut().find(|(l, _)| *l == level) {
            Some((_, best)) => *best = (*best).max(score),
            None => self.best_scores.push((level, score)),
        }
    }

    pub fn best_score(&self, level: u32) -> Option<u32> {
        self.best_scores
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, s)| *s)
    }

    /// Load from disk. A missing or unreadable file yields fresh progress;
    /// corruption is logged rather than propagated so a bad save never
    /// blocks play.
    pub fn load_from(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("no progress file at {}, starting fresh", path.display());
                return Self::new();
            }
            Err(e) => {
                log::warn!("failed to read {}: {e}", path.display());
                return Self::new();
            }
        };
        match serde_json::from_str(&json) {
            Ok(progress) => progress,
            Err(e) => {
                log::warn!("corrupt progress file {}: {e}", path.display());
                Self::new()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }
}
