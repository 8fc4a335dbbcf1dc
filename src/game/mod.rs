//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The grid is a 16x16 torus: the snake wraps at the edges and only dies by
//! running into itself.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{GameEnd, GameEngine, StepResult};
pub use state::{GameState, Position, Snake, GRID_SIZE};
