use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the LED matrix lives and how frames are announced to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Endpoint that accepts the JSON commands
    pub url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Animation slot the frames are written to
    pub pic_id: u32,
    /// Frame duration the device should use, in milliseconds
    pub pic_speed: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            url: "http://espressif:80/post".to_string(),
            timeout_ms: 2000,
            pic_id: 1,
            pic_speed: 100,
        }
    }
}

impl DeviceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DeviceConfig::default();
        assert_eq!(config.url, "http://espressif:80/post");
        assert_eq!(config.timeout(), Duration::from_secs(2));
        assert_eq!(config.pic_id, 1);
        assert_eq!(config.pic_speed, 100);
    }
}
