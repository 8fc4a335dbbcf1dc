use tracing::trace;

use super::client::DisplayDevice;
use super::error::DeviceError;
use super::protocol::{encode_frame, DeviceCommand, FrameMetadata};
use crate::render::PixelBuffer;

/// Pushes whole frames to a display device.
///
/// Publishing is two calls: reset the device's animation buffer, then send
/// the frame. The first failing call aborts the publish; nothing is retried.
pub struct DisplayStreamer<D> {
    device: D,
    metadata: FrameMetadata,
}

impl<D: DisplayDevice> DisplayStreamer<D> {
    pub fn new(device: D, metadata: FrameMetadata) -> Self {
        Self { device, metadata }
    }

    /// Show `frame` on the device
    pub async fn publish(&self, frame: &PixelBuffer) -> Result<(), DeviceError> {
        let encoded = encode_frame(frame, &self.metadata)?;

        self.device
            .send(&DeviceCommand::reset(self.metadata.pic_id))
            .await?;
        self.device.send(&DeviceCommand::SendGif(encoded)).await?;

        trace!("frame published");
        Ok(())
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn metadata(&self) -> &FrameMetadata {
        &self.metadata
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every command and fails the calls it is told to fail
    #[derive(Clone, Default)]
    pub(crate) struct RecordingDevice {
        pub sent: Arc<Mutex<Vec<DeviceCommand>>>,
        /// Zero-based indexes of calls that should be rejected
        pub fail_calls: Arc<Mutex<Vec<usize>>>,
        pub fail_all: bool,
        calls: Arc<Mutex<usize>>,
    }

    impl RecordingDevice {
        pub fn failing() -> Self {
            Self {
                fail_all: true,
                ..Self::default()
            }
        }

        pub fn names(&self) -> Vec<&'static str> {
            self.sent.lock().unwrap().iter().map(|c| c.name()).collect()
        }
    }

    impl DisplayDevice for RecordingDevice {
        async fn send(&self, command: &DeviceCommand) -> Result<(), DeviceError> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls - 1
            };

            if self.fail_all || self.fail_calls.lock().unwrap().contains(&call) {
                return Err(DeviceError::Rejected {
                    status: 503,
                    body: "busy".to_string(),
                });
            }

            self.sent.lock().unwrap().push(command.clone());
            Ok(())
        }

        fn describe(&self) -> String {
            "recording".to_string()
        }
    }

    #[tokio::test]
    async fn test_publish_resets_before_sending() {
        let device = RecordingDevice::default();
        let streamer = DisplayStreamer::new(device.clone(), FrameMetadata::default());

        streamer.publish(&PixelBuffer::default()).await.unwrap();
        streamer.publish(&PixelBuffer::default()).await.unwrap();

        assert_eq!(
            device.names(),
            vec![
                "Draw/ResetHttpGifId",
                "Draw/SendHttpGif",
                "Draw/ResetHttpGifId",
                "Draw/SendHttpGif",
            ]
        );
        assert_eq!(device.sent.lock().unwrap()[0], DeviceCommand::reset(1));
    }

    #[tokio::test]
    async fn test_failed_reset_skips_frame() {
        let device = RecordingDevice::default();
        device.fail_calls.lock().unwrap().push(0);
        let streamer = DisplayStreamer::new(device.clone(), FrameMetadata::default());

        let err = streamer.publish(&PixelBuffer::default()).await.unwrap_err();

        assert!(matches!(err, DeviceError::Rejected { status: 503, .. }));
        assert!(device.names().is_empty());

        // The next publish goes through untouched
        streamer.publish(&PixelBuffer::default()).await.unwrap();
        assert_eq!(device.names().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_frame_after_reset() {
        let device = RecordingDevice::default();
        device.fail_calls.lock().unwrap().push(1);
        let streamer = DisplayStreamer::new(device.clone(), FrameMetadata::default());

        let err = streamer.publish(&PixelBuffer::default()).await.unwrap_err();

        assert!(matches!(err, DeviceError::Rejected { status: 503, .. }));
        assert_eq!(device.names(), vec!["Draw/ResetHttpGifId"]);

        streamer.publish(&PixelBuffer::default()).await.unwrap();
        assert_eq!(
            device.names(),
            vec![
                "Draw/ResetHttpGifId",
                "Draw/ResetHttpGifId",
                "Draw/SendHttpGif",
            ]
        );
    }

    #[tokio::test]
    async fn test_encoding_error_sends_nothing() {
        let device = RecordingDevice::default();
        let metadata = FrameMetadata {
            pic_width: 16,
            ..FrameMetadata::default()
        };
        let streamer = DisplayStreamer::new(device.clone(), metadata);

        let err = streamer.publish(&PixelBuffer::default()).await.unwrap_err();

        assert!(matches!(err, DeviceError::Encoding { .. }));
        assert!(device.names().is_empty());
    }
}
