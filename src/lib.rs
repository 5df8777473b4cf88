//! Grid Snake - a tick-driven Snake game
//!
//! This library provides:
//! - Core game logic (game module), free of I/O
//! - High score persistence behind a small trait (persistence module)
//! - Terminal input mapping and TUI rendering (input, render modules)
//! - The interactive play session and its tick timer (session module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod persistence;
pub mod render;
pub mod session;
