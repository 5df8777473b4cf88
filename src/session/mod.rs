//! Terminal play session and the timer that paces it

pub mod play;
pub mod scheduler;

pub use play::PlaySession;
pub use scheduler::TickTimer;
