use std::time::Duration;

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use super::state::GRID_SIZE;

/// Shortest snake a round may start with
pub const MIN_SNAKE_LENGTH: usize = 3;

/// Configuration for the game and its pacing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Initial length of the snake, between 3 and the grid width
    pub initial_snake_length: usize,

    // Pacing
    /// Delay between ticks at score 0, in milliseconds
    pub base_tick_ms: u64,
    /// Shortest delay between ticks, in milliseconds
    pub min_tick_ms: u64,
    /// How much faster each point makes the game, in milliseconds
    pub speedup_per_point_ms: u64,
    /// Pause between the fatal tick and the game-over frame
    pub game_over_pause_ms: u64,
    /// How long the game-over frame stays up before a new round
    pub game_over_hold_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_snake_length: 3,
            base_tick_ms: 300,
            min_tick_ms: 100,
            speedup_per_point_ms: 5,
            game_over_pause_ms: 500,
            game_over_hold_ms: 2000,
        }
    }
}

impl GameConfig {
    /// Reject settings a round can't start with
    pub fn validate(&self) -> Result<()> {
        let max = GRID_SIZE as usize;
        ensure!(
            (MIN_SNAKE_LENGTH..=max).contains(&self.initial_snake_length),
            "initial_snake_length must be between {} and {}, got {}",
            MIN_SNAKE_LENGTH,
            max,
            self.initial_snake_length
        );
        Ok(())
    }

    /// Starting length actually used, kept within what fits in one row
    pub fn start_length(&self) -> usize {
        self.initial_snake_length
            .clamp(MIN_SNAKE_LENGTH, GRID_SIZE as usize)
    }

    /// Delay before the next tick: `max(min, base - step * score)`
    pub fn tick_delay(&self, score: u32) -> Duration {
        let speedup = self.speedup_per_point_ms.saturating_mul(u64::from(score));
        let millis = self
            .base_tick_ms
            .saturating_sub(speedup)
            .max(self.min_tick_ms);
        Duration::from_millis(millis)
    }

    pub fn game_over_pause(&self) -> Duration {
        Duration::from_millis(self.game_over_pause_ms)
    }

    pub fn game_over_hold(&self) -> Duration {
        Duration::from_millis(self.game_over_hold_ms)
    }
}
