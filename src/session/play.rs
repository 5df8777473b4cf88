use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::debug;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};

use super::scheduler::TickTimer;
use crate::game::{GameConfig, GameEngine, TickResult};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionStats;
use crate::persistence::HighScoreStore;
use crate::render::Renderer;

/// Interactive terminal game: owns the engine and drives it from keyboard
/// input and the tick timer.
pub struct PlaySession<S> {
    engine: GameEngine<S>,
    timer: TickTimer,
    stats: SessionStats,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl<S: HighScoreStore> PlaySession<S> {
    pub fn new(config: GameConfig, store: S) -> Result<Self> {
        Ok(Self {
            engine: GameEngine::new(config, store)?,
            timer: TickTimer::new(),
            stats: SessionStats::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        loop {
            self.stats.update();
            terminal
                .draw(|frame| {
                    self.renderer
                        .render(frame, &self.engine.snapshot(), &self.stats);
                })
                .context("Failed to draw frame")?;

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = self.timer.fired() => {
                    self.on_tick();
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Steer(direction) => {
                if !self.engine.set_pending_direction(direction) {
                    debug!("Ignored turn {:?}", direction);
                }
            }
            KeyAction::Start => self.start_run(),
            KeyAction::Stop => self.stop_run(),
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn start_run(&mut self) {
        if self.engine.is_running() {
            return;
        }

        self.engine.start();
        self.stats.on_run_start();
        self.timer.schedule_after(self.engine.tick_interval());
    }

    fn stop_run(&mut self) {
        if self.engine.is_running() {
            self.stats.on_run_stopped();
        }
        self.engine.stop();
        self.timer.cancel();
    }

    fn on_tick(&mut self) {
        if !self.engine.is_running() {
            return;
        }

        match self.engine.tick() {
            TickResult::Continue => {
                self.timer.schedule_after(self.engine.tick_interval());
            }
            TickResult::GameOver => {
                self.stats.on_game_over(self.engine.score());
                self.timer.cancel();
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, RunState};
    use crate::persistence::MemoryStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::time::Duration;

    fn session() -> PlaySession<MemoryStore> {
        PlaySession::new(GameConfig::small(), MemoryStore::new()).unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_session_starts_idle() {
        let session = session();
        assert_eq!(session.engine.run_state(), RunState::Idle);
        assert!(!session.timer.is_scheduled());
    }

    #[test]
    fn test_start_schedules_first_tick() {
        let mut session = session();
        session.handle_event(key(KeyCode::Enter));

        assert_eq!(session.engine.run_state(), RunState::Running);
        assert!(session.timer.is_scheduled());
    }

    #[test]
    fn test_steering_before_start_is_ignored() {
        let mut session = session();
        session.handle_event(key(KeyCode::Up));
        assert_eq!(session.engine.pending_direction(), None);

        session.handle_event(key(KeyCode::Enter));
        session.handle_event(key(KeyCode::Char('w')));
        assert_eq!(session.engine.pending_direction(), Some(Direction::Up));
    }

    #[test]
    fn test_tick_reschedules_until_game_over() {
        let mut session = session();
        session.handle_action(KeyAction::Start);
        session.handle_action(KeyAction::Steer(Direction::Left));

        let mut ticks = 0;
        while session.timer.is_scheduled() {
            session.on_tick();
            ticks += 1;
            assert!(ticks <= 20, "run never ended");
        }

        assert_eq!(session.engine.run_state(), RunState::Ended);
        assert_eq!(session.stats.runs_played, 1);
        assert_eq!(session.stats.best_score, session.engine.score());
    }

    #[test]
    fn test_stop_cancels_pending_tick() {
        let mut session = session();
        session.handle_action(KeyAction::Start);
        session.handle_event(key(KeyCode::Char('p')));

        assert_eq!(session.engine.run_state(), RunState::Idle);
        assert!(!session.timer.is_scheduled());
        assert_eq!(session.stats.runs_played, 0);
    }

    #[test]
    fn test_start_after_game_over() {
        let mut session = session();
        session.handle_action(KeyAction::Start);
        session.handle_action(KeyAction::Steer(Direction::Down));
        while session.timer.is_scheduled() {
            session.on_tick();
        }

        session.handle_action(KeyAction::Start);
        assert_eq!(session.engine.run_state(), RunState::Running);
        assert_eq!(session.engine.score(), 0);
        assert_eq!(session.engine.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut session = session();
        let mut release = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        session.handle_event(Event::Key(release));

        assert_eq!(session.engine.run_state(), RunState::Idle);
    }

    #[test]
    fn test_quit() {
        let mut session = session();
        session.handle_event(key(KeyCode::Char('q')));
        assert!(session.should_quit);
    }
}
