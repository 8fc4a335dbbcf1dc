use std::collections::VecDeque;

use super::action::Direction;

/// Number of cells along each side of the (square) playfield
pub const GRID_SIZE: i32 = 16;

/// A cell on the game grid. Always within `0..GRID_SIZE` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta, wrapping around the grid edges
    pub fn wrapped_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: (self.x + dx).rem_euclid(GRID_SIZE),
            y: (self.y + dy).rem_euclid(GRID_SIZE),
        }
    }

    /// Step one cell in a direction on the toroidal grid
    pub fn stepped(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.wrapped_by(dx, dy)
    }

    pub fn is_in_bounds(&self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }

    /// Every cell of the grid, column by column
    pub fn all() -> impl Iterator<Item = Position> {
        (0..GRID_SIZE).flat_map(|x| (0..GRID_SIZE).map(move |y| Position::new(x, y)))
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: VecDeque<Position>,
}

impl Snake {
    /// Create a snake whose body trails behind `head`, opposite to `direction`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.reversed().delta();
        let mut body = VecDeque::with_capacity(length.max(1));
        let mut segment = head;
        body.push_back(segment);

        for _ in 1..length {
            segment = segment.wrapped_by(dx, dy);
            body.push_back(segment);
        }

        Self { body }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments(segments: impl IntoIterator<Item = Position>) -> Self {
        Self {
            body: segments.into_iter().collect(),
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Segments from head to tail
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Position> + '_ {
        self.body.iter()
    }

    /// Check if any segment, head and tail included, occupies `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Prepend a new head, dropping the tail unless the snake grows
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);

        if !grow {
            self.body.pop_back();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Complete game state.
///
/// Cloning this gives an immutable snapshot that can be handed to other
/// consumers while the engine keeps mutating its own copy.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    /// Direction the snake travelled on the last tick
    pub direction: Direction,
    /// Buffered input, applied at the start of the next tick
    pub pending_direction: Direction,
    pub score: u32,
    pub steps: u32,
    pub is_over: bool,
}

impl GameState {
    /// Create a new game state heading in `direction`
    pub fn new(snake: Snake, food: Position, direction: Direction) -> Self {
        Self {
            snake,
            food,
            direction,
            pending_direction: direction,
            score: 0,
            steps: 0,
            is_over: false,
        }
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    /// Cells the snake does not cover
    pub fn empty_cells(&self) -> Vec<Position> {
        Position::all()
            .filter(|pos| !self.is_occupied_by_snake(*pos))
            .collect()
    }
}
