use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::HighScoreStore;

/// On-disk layout of the high score file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u32,
}

/// Stores the high score as a small JSON document
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

    /// Read the record, `Ok(None)` when the file does not exist yet
    pub fn read_record(&self) -> Result<Option<HighScoreRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read high score from {:?}", self.path))?;
        let record: HighScoreRecord =
            serde_json::from_str(&json).context("Failed to deserialize high score")?;

        Ok(Some(record))
    }

    /// Write the record, creating parent directories if needed
    pub fn write_record(&self, record: HighScoreRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let json =
            serde_json::to_string_pretty(&record).context("Failed to serialize high score")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write high score to {:?}", self.path))?;

        Ok(())
    }
}

impl HighScoreStore for JsonFileStore {
    fn get_high_score(&self) -> u32 {
        match self.read_record() {
            Ok(record) => record.unwrap_or_default().high_score,
            Err(err) => {
                warn!("Ignoring unreadable high score file: {:#}", err);
                0
            }
        }
    }

    fn set_high_score(&mut self, score: u32) {
        if let Err(err) = self.write_record(HighScoreRecord { high_score: score }) {
            warn!("Could not persist high score {}: {:#}", score, err);
        }
    }
}

/// Keeps the high score for the lifetime of the process only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    high_score: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing high score
    pub fn with_high_score(high_score: u32) -> Self {
        Self { high_score }
    }
}

impl HighScoreStore for MemoryStore {
    fn get_high_score(&self) -> u32 {
        self.high_score
    }

    fn set_high_score(&mut self, score: u32) {
        self.high_score = score;
    }
}
