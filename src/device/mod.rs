//! Talking to the LED matrix: wire encoding, the HTTP client and the
//! two-call frame publish sequence.

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod streamer;

pub use client::{DisplayDevice, DryRunDevice, HttpDevice};
pub use config::DeviceConfig;
pub use error::DeviceError;
pub use protocol::{encode_frame, DeviceCommand, EncodedFrame, FrameMetadata};
pub use streamer::DisplayStreamer;
