//! Wire format of the LED matrix HTTP API.
//!
//! Every call is a JSON object POSTed to a single endpoint; the `Command`
//! field selects the operation. A frame is sent as one single-picture
//! animation whose pixels are base64-encoded R,G,B bytes, row-major.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use super::config::DeviceConfig;
use super::error::DeviceError;
use crate::render::{PixelBuffer, FRAME_WIDTH};

/// Commands understood by the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Command")]
pub enum DeviceCommand {
    /// Drop whatever animation the device has buffered
    #[serde(rename = "Draw/ResetHttpGifId")]
    ResetGifId {
        #[serde(rename = "PicID")]
        pic_id: u32,
    },

    /// Show one encoded frame
    #[serde(rename = "Draw/SendHttpGif")]
    SendGif(EncodedFrame),
}

impl DeviceCommand {
    pub fn reset(pic_id: u32) -> Self {
        DeviceCommand::ResetGifId { pic_id }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            DeviceCommand::ResetGifId { .. } => "Draw/ResetHttpGifId",
            DeviceCommand::SendGif(_) => "Draw/SendHttpGif",
        }
    }
}

/// Fixed picture metadata sent along with every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMetadata {
    pub pic_id: u32,
    pub pic_num: u32,
    pub pic_width: u32,
    pub pic_offset: u32,
    pub pic_speed: u32,
}

impl FrameMetadata {
    pub fn from_config(config: &DeviceConfig) -> Self {
        Self {
            pic_id: config.pic_id,
            pic_speed: config.pic_speed,
            ..Self::default()
        }
    }

    /// Bytes the device expects in the decoded payload
    pub fn payload_len(&self) -> usize {
        let side = self.pic_width as usize;
        side * side * 3
    }
}

impl Default for FrameMetadata {
    fn default() -> Self {
        Self {
            pic_id: 1,
            pic_num: 1,
            pic_width: FRAME_WIDTH as u32,
            pic_offset: 0,
            pic_speed: 100,
        }
    }
}

/// Body of a `Draw/SendHttpGif` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedFrame {
    #[serde(rename = "PicID")]
    pub pic_id: u32,
    #[serde(rename = "PicNum")]
    pub pic_num: u32,
    #[serde(rename = "PicWidth")]
    pub pic_width: u32,
    #[serde(rename = "PicOffset")]
    pub pic_offset: u32,
    #[serde(rename = "PicSpeed")]
    pub pic_speed: u32,
    /// Base64 (standard alphabet, unwrapped) of the R,G,B bytes
    #[serde(rename = "PicData")]
    pub pic_data: String,
}

/// Encode a frame into the command that displays it
pub fn encode_frame(
    frame: &PixelBuffer,
    metadata: &FrameMetadata,
) -> Result<EncodedFrame, DeviceError> {
    let bytes = frame.to_rgb_bytes();
    let expected = metadata.payload_len();
    if bytes.len() != expected {
        return Err(DeviceError::Encoding {
            expected,
            actual: bytes.len(),
        });
    }

    Ok(EncodedFrame {
        pic_id: metadata.pic_id,
        pic_num: metadata.pic_num,
        pic_width: metadata.pic_width,
        pic_offset: metadata.pic_offset,
        pic_speed: metadata.pic_speed,
        pic_data: STANDARD.encode(bytes),
    })
}
