//! Room lifecycle configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Room lifecycle configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RoomsConfig {
    /// How long a room may wait for its second participant, in seconds
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

impl RoomsConfig {
    /// Get the room TTL as a Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Validate room configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ttl_secs == 0 {
            return Err(ValidationError::InvalidRoomTtl);
        }
        Ok(())
    }
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
        }
    }
}

// 5 minutes, matching the waiting-room expiry window.
fn default_ttl() -> u64 {
    300
}
