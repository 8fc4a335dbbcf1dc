use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::debug;

use super::{
    action::Direction,
    config::GameConfig,
    state::{GameState, Position, Snake, GRID_SIZE},
};

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    /// The new head landed on the snake's own body
    SelfCollision,
    /// No free cell was left for food. Ends the round like a loss.
    BoardFull,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the game is still running after this tick
    pub continues: bool,
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Set on the tick that ended the round
    pub end: Option<GameEnd>,
}

impl StepResult {
    fn running(ate_food: bool) -> Self {
        Self {
            continues: true,
            ate_food,
            end: None,
        }
    }

    fn stopped(ate_food: bool, end: Option<GameEnd>) -> Self {
        Self {
            continues: false,
            ate_food,
            end,
        }
    }
}

/// The game engine. Owns the game state and applies one tick per call.
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new engine with a freshly reset game
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine with a deterministic food sequence
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let snake = Snake::new(
            Self::start_position(),
            Direction::Right,
            config.start_length(),
        );
        let state = GameState::new(snake, Self::start_position(), Direction::Right);
        let mut engine = Self { config, state, rng };
        engine.reset();
        engine
    }

    fn start_position() -> Position {
        Position::new(GRID_SIZE / 2, GRID_SIZE / 2)
    }

    /// Reset the game to its initial state
    pub fn reset(&mut self) {
        let snake = Snake::new(
            Self::start_position(),
            Direction::Right,
            self.config.start_length(),
        );
        self.state = GameState::new(snake, Self::start_position(), Direction::Right);

        match self.spawn_food() {
            Some(food) => self.state.food = food,
            None => self.state.is_over = true,
        }
    }

    /// Buffer a direction change for the next tick.
    ///
    /// A reversal of the active direction is dropped when the tick resolves
    /// it; nothing is queued.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        self.state.pending_direction = direction;
    }

    /// Advance the game by one tick
    pub fn tick(&mut self) -> StepResult {
        if self.state.is_over {
            return StepResult::stopped(false, None);
        }

        let pending = self.state.pending_direction;
        if !self.state.direction.is_opposite(pending) {
            self.state.direction = pending;
        }

        let new_head = self.state.snake.head().stepped(self.state.direction);

        // The tail has not moved yet, so stepping onto it is fatal too
        if self.state.snake.occupies(new_head) {
            self.state.is_over = true;
            self.state.steps += 1;
            debug!(x = new_head.x, y = new_head.y, "snake hit itself");
            return StepResult::stopped(false, Some(GameEnd::SelfCollision));
        }

        let ate_food = new_head == self.state.food;
        self.state.snake.advance(new_head, ate_food);
        self.state.steps += 1;

        if ate_food {
            self.state.score += 1;
            debug!(score = self.state.score, "snake ate food");

            match self.spawn_food() {
                Some(food) => self.state.food = food,
                None => {
                    self.state.is_over = true;
                    return StepResult::stopped(true, Some(GameEnd::BoardFull));
                }
            }
        }

        StepResult::running(ate_food)
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over
    }

    /// Read-only view of the live state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Pick a uniformly random cell not covered by the snake
    fn spawn_food(&mut self) -> Option<Position> {
        let empty = self.state.empty_cells();
        let food = empty.choose(&mut self.rng).copied();
        if let Some(pos) = food {
            debug!(x = pos.x, y = pos.y, "food placed");
        }
        food
    }
}
