//! Turning game state into pixels: the 64x64 frames sent to the LED matrix
//! and the terminal preview of those frames.

pub mod font;
pub mod frame;
pub mod preview;
pub mod renderer;

pub use frame::{PixelBuffer, Rgb, FRAME_HEIGHT, FRAME_WIDTH};
pub use preview::PreviewRenderer;
pub use renderer::{FrameRenderer, CELL_SIZE};
