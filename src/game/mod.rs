//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Timing, input, drawing and high score storage are supplied by the caller.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, TickResult};
pub use state::{CollisionType, GameSnapshot, Position, RunState, Snake};
