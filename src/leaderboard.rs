//! Best finishing times, kept on disk between sessions.

use crate::game_logic::LEADERBOARD_CAPACITY;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const LEADERBOARD_FILE: &str = "leaderboard.json";

#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("leaderboard I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard could not be encoded: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub time: f32,
    /// RFC 3339 timestamp of when the race finished.
    pub date: String,
    pub position: usize,
}

/// Finishing times in ascending order, at most `LEADERBOARD_CAPACITY` long.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses stored JSON. Anything unreadable counts as an empty board.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Vec<LeaderboardEntry>>(json) {
            Ok(entries) => Self::from_entries(entries),
            Err(err) => {
                warn!("Ignoring malformed leaderboard: {}", err);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, LeaderboardError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| a.time.total_cmp(&b.time));
        entries.truncate(LEADERBOARD_CAPACITY);
        Self { entries }
    }

    /// Adds a finished race stamped with the current time.
    pub fn record(&mut self, time: f32, position: usize) -> &[LeaderboardEntry] {
        let date = chrono::Utc::now().to_rfc3339();
        self.insert(LeaderboardEntry {
            time,
            date,
            position,
        })
    }

    pub fn insert(&mut self, entry: LeaderboardEntry) -> &[LeaderboardEntry] {
        let mut entries = std::mem::take(&mut self.entries);
        entries.push(entry);
        *self = Self::from_entries(entries);
        &self.entries
    }

    /// Whether `time` made it onto the board.
    pub fn contains_time(&self, time: f32) -> bool {
        self.entries.iter().any(|entry| entry.time == time)
    }
}

/// File-backed storage for the leaderboard.
#[derive(Resource, Debug, Clone)]
pub struct LeaderboardStore {
    path: PathBuf,
}

impl LeaderboardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files load as an empty leaderboard.
    pub fn load(&self) -> Leaderboard {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Leaderboard::from_json(&json),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Leaderboard::default(),
            Err(err) => {
                warn!("Could not read {}: {}", self.path.display(), err);
                Leaderboard::default()
            }
        }
    }

    pub fn save(&self, leaderboard: &Leaderboard) -> Result<(), LeaderboardError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, leaderboard.to_json()?)?;
        Ok(())
    }
}

impl Default for LeaderboardStore {
    fn default() -> Self {
        let path = directories::ProjectDirs::from("io", "momentumx", "momentum-x")
            .map(|dirs| dirs.data_dir().join(LEADERBOARD_FILE))
            .unwrap_or_else(|| PathBuf::from(LEADERBOARD_FILE));
        Self::new(path)
    }
}
