//! Best score persistence
//!
//! One record: the best score ever reached, read once at startup and written
//! whenever a round ends with a new best.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading or writing persisted state
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// The persisted best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
    /// Level reached in the round that set it
    #[serde(default)]
    pub level: u32,
}

/// Where the best score lives
pub trait ScoreStore {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&mut self) -> Result<Option<HighScore>, PersistError>;
    fn save(&mut self, score: &HighScore) -> Result<(), PersistError>;
}

/// Read the best score, degrading to zero on any failure
pub fn load_best(store: &mut dyn ScoreStore) -> u64 {
    match store.load() {
        Ok(Some(score)) => {
            log::info!("Loaded best score {} (level {})", score.best, score.level);
            score.best
        }
        Ok(None) => {
            log::info!("No best score found, starting fresh");
            0
        }
        Err(err) => {
            log::warn!("Could not read best score: {}", err);
            0
        }
    }
}

/// Write the best score, logging failures
pub fn save_best(store: &mut dyn ScoreStore, score: HighScore) {
    match store.save(&score) {
        Ok(()) => log::info!("Best score saved ({})", score.best),
        Err(err) => log::warn!("Could not save best score: {}", err),
    }
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<Option<HighScore>, PersistError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save(&mut self, score: &HighScore) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(score)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory store (tests, sessions without a save location)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub stored: Option<HighScore>,
    /// Number of successful saves
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u64) -> Self {
        Self {
            stored: Some(HighScore { best, level: 1 }),
            writes: 0,
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Result<Option<HighScore>, PersistError> {
        Ok(self.stored)
    }

    fn save(&mut self, score: &HighScore) -> Result<(), PersistError> {
        self.stored = Some(*score);
        self.writes += 1;
        Ok(())
    }
}
