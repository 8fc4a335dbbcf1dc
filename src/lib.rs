//! Pixoo Snake - Snake on a 64x64 LED matrix
//!
//! This library provides:
//! - Core game logic on a 16x16 wrap-around grid (game module)
//! - Frame rendering and the terminal preview (render module)
//! - The device's HTTP/JSON protocol and frame publishing (device module)
//! - The paced game loop and its front-ends (modes module)

pub mod config;
pub mod device;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
