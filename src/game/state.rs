use std::collections::VecDeque;
use std::time::Duration;

use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Whether this position lies on a square grid of `tiles` cells per side
    pub fn is_within(&self, tiles: i32) -> bool {
        (0..tiles).contains(&self.x) && (0..tiles).contains(&self.y)
    }
}

/// The snake, head first. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// A single-segment snake
    pub fn new(head: Position) -> Self {
        Self {
            body: VecDeque::from([head]),
        }
    }

    /// Build a snake from its segments, head first. Returns `None` for an empty list.
    pub fn from_segments(segments: impl IntoIterator<Item = Position>) -> Option<Self> {
        let body: VecDeque<Position> = segments.into_iter().collect();
        if body.is_empty() {
            None
        } else {
            Some(Self { body })
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// The last segment; the one that vacates its cell on a normal move
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; kept for parity with `len`
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Segments from head to tail
    pub fn segments(&self) -> impl Iterator<Item = &Position> + '_ {
        self.body.iter()
    }

    /// Check if position is covered by any segment
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Check if position is covered by any segment other than the tail.
    ///
    /// The tail cell is free by the time a new head would enter it, unless
    /// the snake grows on the same tick.
    pub fn occupies_excluding_tail(&self, pos: Position) -> bool {
        self.body.iter().take(self.body.len() - 1).any(|&s| s == pos)
    }

    pub(crate) fn push_head(&mut self, head: Position) {
        self.body.push_front(head);
    }

    pub(crate) fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }
}

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Before the first start, or after an explicit stop
    #[default]
    Idle,
    Running,
    /// After a fatal collision, until the next start
    Ended,
}

/// What a fatal collision hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Read-only view of the engine handed to renderers
#[derive(Debug, Clone, Copy)]
pub struct GameSnapshot<'a> {
    pub snake: &'a Snake,
    pub food: Position,
    pub score: u32,
    pub high_score: u32,
    pub run_state: RunState,
    pub tick_interval: Duration,
    pub tile_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(i32, i32)]) -> Snake {
        Snake::from_segments(cells.iter().map(|&(x, y)| Position::new(x, y))).unwrap()
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_bounds_checking() {
        assert!(Position::new(0, 0).is_within(20));
        assert!(Position::new(19, 19).is_within(20));
        assert!(!Position::new(-1, 0).is_within(20));
        assert!(!Position::new(0, -1).is_within(20));
        assert!(!Position::new(20, 0).is_within(20));
        assert!(!Position::new(0, 20).is_within(20));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), snake.tail());
        assert!(Snake::from_segments(Vec::new()).is_none());
    }

    #[test]
    fn test_head_and_tail() {
        let snake = row(&[(5, 5), (4, 5), (3, 5)]);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.tail(), Position::new(3, 5));
        assert_eq!(snake.segments().count(), 3);
    }

    #[test]
    fn test_occupancy_excluding_tail() {
        let snake = row(&[(5, 5), (4, 5), (3, 5)]);
        assert!(snake.occupies(Position::new(3, 5)));
        assert!(!snake.occupies_excluding_tail(Position::new(3, 5)));
        assert!(snake.occupies_excluding_tail(Position::new(5, 5)));
        assert!(snake.occupies_excluding_tail(Position::new(4, 5)));
        assert!(!snake.occupies(Position::new(10, 10)));

        // A lone head is also its own tail
        let single = Snake::new(Position::new(1, 1));
        assert!(!single.occupies_excluding_tail(Position::new(1, 1)));
    }

    #[test]
    fn test_push_and_drop() {
        let mut snake = row(&[(5, 5), (4, 5)]);
        snake.push_head(Position::new(6, 5));
        assert_eq!(snake.len(), 3);
        snake.drop_tail();
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.tail(), Position::new(5, 5));

        let mut single = Snake::new(Position::new(0, 0));
        single.drop_tail();
        assert_eq!(single.len(), 1);
    }
}
