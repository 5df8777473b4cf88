//! High score persistence
//!
//! The engine only talks to a [`HighScoreStore`]; where the number lives is
//! up to the implementation. Stores never fail loudly: a missing or broken
//! backing store reads as "no high score yet".

pub mod store;

pub use store::{HighScoreRecord, JsonFileStore, MemoryStore};

/// Key-value access to the persisted high score
pub trait HighScoreStore {
    /// The stored high score, or 0 if there is none
    fn get_high_score(&self) -> u32;

    /// Persist a new high score
    fn set_high_score(&mut self, score: u32);
}

impl<T: HighScoreStore + ?Sized> HighScoreStore for Box<T> {
    fn get_high_score(&self) -> u32 {
        (**self).get_high_score()
    }

    fn set_high_score(&mut self, score: u32) {
        (**self).set_high_score(score)
    }
}
