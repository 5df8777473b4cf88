use anyhow::Result;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use super::{
    config::GameConfig,
    direction::Direction,
    state::{CollisionType, GameSnapshot, Position, RunState, Snake},
};
use crate::persistence::HighScoreStore;

/// Result of a game tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// The run goes on; schedule the next tick
    Continue,
    /// The run is over (or was not running); do not schedule again
    GameOver,
}

/// The game engine that owns and advances all game state
pub struct GameEngine<S, R = StdRng> {
    config: GameConfig,
    tile_count: i32,
    snake: Snake,
    food: Position,
    /// Applied on the tick in progress
    current_direction: Option<Direction>,
    /// Latest accepted input, snapshotted into `current_direction` at tick start
    pending_direction: Option<Direction>,
    score: u32,
    high_score: u32,
    tick_interval_ms: u64,
    run_state: RunState,
    last_collision: Option<CollisionType>,
    store: S,
    rng: R,
}

impl<S: HighScoreStore> GameEngine<S, StdRng> {
    /// Create a new game engine with the given configuration and high score store
    pub fn new(config: GameConfig, store: S) -> Result<Self> {
        Self::with_rng(config, store, StdRng::from_entropy())
    }
}

impl<S: HighScoreStore, R: Rng> GameEngine<S, R> {
    /// Create an engine drawing food positions from `rng`
    pub fn with_rng(config: GameConfig, store: S, rng: R) -> Result<Self> {
        config.validate()?;

        let tile_count = config.tile_count() as i32;
        let high_score = store.get_high_score();
        let center = Position::new(tile_count / 2, tile_count / 2);

        let mut engine = Self {
            tick_interval_ms: config.base_tick_interval_ms,
            config,
            tile_count,
            snake: Snake::new(center),
            food: center,
            current_direction: None,
            pending_direction: None,
            score: 0,
            high_score,
            run_state: RunState::Idle,
            last_collision: None,
            store,
            rng,
        };
        engine.reset();

        Ok(engine)
    }

    /// Put snake, direction, score, speed and food back to their starting values.
    ///
    /// Leaves the run state alone; use [`GameEngine::start`] to begin a run.
    pub fn reset(&mut self) {
        let center = Position::new(self.tile_count / 2, self.tile_count / 2);

        self.snake = Snake::new(center);
        self.current_direction = None;
        self.pending_direction = None;
        self.score = 0;
        self.tick_interval_ms = self.config.base_tick_interval_ms;
        self.last_collision = None;
        self.spawn_food();
    }

    /// Begin a new run. Ignored while a run is already in progress.
    pub fn start(&mut self) {
        if self.run_state == RunState::Running {
            return;
        }

        self.reset();
        self.run_state = RunState::Running;
        info!(
            "Run started on a {0}x{0} grid, high score {1}",
            self.tile_count, self.high_score
        );
    }

    /// Abandon the current run without a collision
    pub fn stop(&mut self) {
        if self.run_state == RunState::Running {
            info!("Run stopped at score {}", self.score);
        }
        self.run_state = RunState::Idle;
    }

    /// Queue a direction for the next tick.
    ///
    /// Returns whether it was accepted. Requests are dropped while no run is
    /// in progress, and when they would reverse the snake onto itself.
    pub fn set_pending_direction(&mut self, direction: Direction) -> bool {
        if self.run_state != RunState::Running {
            return false;
        }

        if self
            .current_direction
            .is_some_and(|current| current.is_opposite(direction))
        {
            return false;
        }

        self.pending_direction = Some(direction);
        true
    }

    /// Advance the simulation by one grid step
    pub fn tick(&mut self) -> TickResult {
        if self.run_state != RunState::Running {
            return TickResult::GameOver;
        }

        self.current_direction = self.pending_direction;

        // Nothing pressed since the reset: sit still
        let Some(direction) = self.current_direction else {
            return TickResult::Continue;
        };

        let new_head = self.snake.head().moved_in_direction(direction);

        if let Some(collision) = self.check_collision(new_head) {
            self.end_run(collision);
            return TickResult::GameOver;
        }

        self.snake.push_head(new_head);

        if new_head == self.food {
            self.eat_food();
        } else {
            self.snake.drop_tail();
        }

        TickResult::Continue
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        // Walls first
        if !pos.is_within(self.tile_count) {
            return Some(CollisionType::Wall);
        }

        if self.snake.occupies_excluding_tail(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    fn eat_food(&mut self) {
        self.score = self.score.saturating_add(self.config.food_score);

        let faster = self
            .tick_interval_ms
            .saturating_sub(self.config.tick_interval_step_ms)
            .max(self.config.min_tick_interval_ms);
        if faster != self.tick_interval_ms {
            debug!("Tick interval {}ms -> {}ms", self.tick_interval_ms, faster);
            self.tick_interval_ms = faster;
        }

        debug!("Food eaten at {:?}, score {}", self.food, self.score);
        self.spawn_food();
    }

    fn end_run(&mut self, collision: CollisionType) {
        self.run_state = RunState::Ended;
        self.last_collision = Some(collision);
        info!("Game over ({:?}) with score {}", collision, self.score);

        if self.score > self.high_score {
            info!("New high score {} (was {})", self.score, self.high_score);
            self.high_score = self.score;
            self.store.set_high_score(self.score);
        }
    }

    /// Place food on a uniformly random cell not covered by the snake
    fn spawn_food(&mut self) {
        let cells = (self.tile_count as usize).pow(2);
        if self.snake.len() >= cells {
            warn!("No free cell left for food");
            return;
        }

        loop {
            let x = self.rng.gen_range(0..self.tile_count);
            let y = self.rng.gen_range(0..self.tile_count);
            let pos = Position::new(x, y);

            if !self.snake.occupies(pos) {
                self.food = pos;
                return;
            }
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn current_direction(&self) -> Option<Direction> {
        self.current_direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// Delay the scheduler should wait before the next tick
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// What ended the last run, if it ended in a collision
    pub fn last_collision(&self) -> Option<CollisionType> {
        self.last_collision
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> GameSnapshot<'_> {
        GameSnapshot {
            snake: &self.snake,
            food: self.food,
            score: self.score,
            high_score: self.high_score,
            run_state: self.run_state,
            tick_interval: self.tick_interval(),
            tile_count: self.tile_count as u32,
        }
    }
}
