use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square board, in board units
    pub board_size: u32,
    /// Side length of one cell, in board units
    pub cell_size: u32,

    // Speed ramp
    /// Delay between ticks at the start of a run
    pub base_tick_interval_ms: u64,
    /// How much the delay shrinks per food eaten
    pub tick_interval_step_ms: u64,
    /// The delay never drops below this
    pub min_tick_interval_ms: u64,

    /// Points awarded per food
    pub food_score: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 400,
            cell_size: 20,
            base_tick_interval_ms: 100,
            tick_interval_step_ms: 2,
            min_tick_interval_ms: 50,
            food_score: 10,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom board and cell size
    pub fn new(board_size: u32, cell_size: u32) -> Self {
        Self {
            board_size,
            cell_size,
            ..Default::default()
        }
    }

    /// Create a configuration with exactly `tiles` cells per side
    pub fn with_tiles(tiles: u32) -> Self {
        Self::new(tiles, 1)
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::with_tiles(10)
    }

    /// Number of cells along each side of the grid
    pub fn tile_count(&self) -> u32 {
        self.board_size.checked_div(self.cell_size).unwrap_or(0)
    }

    pub fn base_tick_interval(&self) -> Duration {
        Duration::from_millis(self.base_tick_interval_ms)
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            bail!("cell size must be greater than zero");
        }
        // A single cell leaves no room for food beside the snake
        ensure!(
            self.tile_count() >= 2,
            "board size {} fits fewer than 2 cells of size {}",
            self.board_size,
            self.cell_size
        );
        ensure!(
            i32::try_from(self.tile_count()).is_ok(),
            "grid of {} tiles is too large",
            self.tile_count()
        );
        ensure!(
            self.min_tick_interval_ms > 0,
            "minimum tick interval must be greater than zero"
        );
        ensure!(
            self.base_tick_interval_ms >= self.min_tick_interval_ms,
            "base tick interval ({}ms) is below the minimum ({}ms)",
            self.base_tick_interval_ms,
            self.min_tick_interval_ms
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.tile_count(), 20);
        assert_eq!(config.base_tick_interval(), Duration::from_millis(100));
        assert_eq!(config.min_tick_interval_ms, 50);
        assert_eq!(config.food_score, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(300, 15);
        assert_eq!(config.tile_count(), 20);

        // Partial cells are dropped
        let config = GameConfig::new(310, 20);
        assert_eq!(config.tile_count(), 15);

        assert_eq!(GameConfig::with_tiles(4).tile_count(), 4);
    }

    #[test]
    fn test_validation_rejects_bad_sizes() {
        assert!(GameConfig::new(400, 0).validate().is_err());
        assert!(GameConfig::new(10, 20).validate().is_err());
        assert!(GameConfig::with_tiles(1).validate().is_err());
        assert!(GameConfig::new(39, 20).validate().is_err());
        assert!(GameConfig::with_tiles(2).validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_intervals() {
        let config = GameConfig {
            min_tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            base_tick_interval_ms: 40,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "board_size": 200, "min_tick_interval_ms": 60 }}"#).unwrap();

        let config = GameConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.board_size, 200);
        assert_eq!(config.cell_size, 20);
        assert_eq!(config.tile_count(), 10);
        assert_eq!(config.min_tick_interval_ms, 60);
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(GameConfig::from_json_file(file.path()).is_err());
    }
}
