use thiserror::Error;

/// Failure of a single device call
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Connection refused, timed out, or otherwise never got a response
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The device answered with a non-2xx status
    #[error("device rejected command with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// A frame whose byte length doesn't match the announced picture size.
    /// The device would reject it, so it is never sent.
    #[error("encoded frame is {actual} bytes, device expects {expected}")]
    Encoding { expected: usize, actual: usize },
}

impl DeviceError {
    /// Whether the next frame can reasonably be expected to succeed
    pub fn is_transient(&self) -> bool {
        !matches!(self, DeviceError::Encoding { .. })
    }
}
