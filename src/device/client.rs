use std::future::Future;

use reqwest::Client;
use tracing::{debug, trace};

use super::config::DeviceConfig;
use super::error::DeviceError;
use super::protocol::DeviceCommand;

/// Something that accepts display commands
pub trait DisplayDevice: Send + Sync {
    /// Deliver one command, resolving once the device has acknowledged it
    fn send(
        &self,
        command: &DeviceCommand,
    ) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Human-readable target, for logs and the preview
    fn describe(&self) -> String;
}

/// The real device, reached over its HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpDevice {
    client: Client,
    url: String,
}

impl HttpDevice {
    /// Build the HTTP client. Failing here is a setup problem, not a
    /// [`DeviceError`]: no command has been attempted yet.
    pub fn new(config: &DeviceConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

impl DisplayDevice for HttpDevice {
    async fn send(&self, command: &DeviceCommand) -> Result<(), DeviceError> {
        trace!(command = command.name(), url = %self.url, "posting command");

        let response = self.client.post(&self.url).json(command).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeviceError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(command = command.name(), "device accepted command");
        Ok(())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Accepts everything without touching the network, for running without hardware
#[derive(Debug, Clone, Default)]
pub struct DryRunDevice;

impl DisplayDevice for DryRunDevice {
    async fn send(&self, command: &DeviceCommand) -> Result<(), DeviceError> {
        trace!(command = command.name(), "dry run, command discarded");
        Ok(())
    }

    fn describe(&self) -> String {
        "dry run".to_string()
    }
}
