use std::time::{Duration, Instant};

/// Per-session numbers shown in the header, separate from the persisted high score
pub struct SessionStats {
    run_started: Option<Instant>,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub runs_played: u32,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            run_started: None,
            elapsed_time: Duration::ZERO,
            best_score: 0,
            runs_played: 0,
        }
    }

    /// Refresh the run clock; frozen once the run is over
    pub fn update(&mut self) {
        if let Some(started) = self.run_started {
            self.elapsed_time = started.elapsed();
        }
    }

    pub fn on_run_start(&mut self) {
        self.run_started = Some(Instant::now());
        self.elapsed_time = Duration::ZERO;
    }

    /// A run ended by collision
    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.run_started = None;
        self.runs_played += 1;
        self.best_score = self.best_score.max(final_score);
    }

    /// A run abandoned with the stop key; not counted
    pub fn on_run_stopped(&mut self) {
        self.run_started = None;
        self.elapsed_time = Duration::ZERO;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
