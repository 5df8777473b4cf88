use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// A single re-armable tick deadline.
///
/// The play loop arms it after every tick with the engine's current interval
/// and awaits [`TickTimer::fired`] inside `tokio::select!`.
#[derive(Debug, Default)]
pub struct TickTimer {
    deadline: Option<Instant>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to fire `delay` from now, replacing any pending deadline
    pub fn schedule_after(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }

    /// Drop the pending deadline, if any
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolves once the armed deadline passes, disarming the timer.
    ///
    /// Never resolves while disarmed. Cancel safe: dropping the future keeps
    /// the deadline armed.
    pub async fn fired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                sleep_until(deadline).await;
                self.deadline = None;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
