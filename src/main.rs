use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use grid_snake::game::GameConfig;
use grid_snake::persistence::{HighScoreStore, JsonFileStore, MemoryStore};
use grid_snake::session::PlaySession;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// Board side length in board units (overrides the config file)
    #[arg(long)]
    board_size: Option<u32>,

    /// Cell side length in board units; the grid has board-size / cell-size tiles per side
    #[arg(long)]
    cell_size: Option<u32>,

    /// JSON game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the high score is kept
    #[arg(long, default_value = "snake_high_score.json")]
    high_score_file: PathBuf,

    /// Keep the high score in memory only
    #[arg(long)]
    no_persist: bool,

    /// Write logs to this file instead of the (hidden) terminal
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(board_size) = self.board_size {
            config.board_size = board_size;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }

    fn high_score_store(&self) -> Box<dyn HighScoreStore> {
        if self.no_persist {
            Box::new(MemoryStore::new())
        } else {
            Box::new(JsonFileStore::new(&self.high_score_file))
        }
    }
}

/// Route `log` output to a file, or keep it quiet unless `RUST_LOG` says otherwise
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {:?}", path))?;
            let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
            builder.target(Target::Pipe(Box::new(file)));
            builder
        }
        None => env_logger::Builder::from_env(Env::default().default_filter_or("off")),
    };

    builder.try_init().context("Failed to initialise logger")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref())?;

    let config = cli.game_config()?;
    log::info!(
        "Starting with a {0}x{0} grid ({1:?})",
        config.tile_count(),
        config
    );

    let mut session = PlaySession::new(config, cli.high_score_store())?;
    session.run().await?;

    Ok(())
}
