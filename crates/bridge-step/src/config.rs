//! # Step Configuration
//!
//! Configuration for route step execution.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::domain::DEFAULT_STATUS_CHECK_INTERVAL_MS;

/// Route step configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    /// How often to poll the remote status while a step is pending, in
    /// milliseconds.
    pub status_check_interval_ms: u64,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            status_check_interval_ms: DEFAULT_STATUS_CHECK_INTERVAL_MS,
        }
    }
}

impl StepConfig {
    /// Create a config with a custom poll period.
    pub fn with_status_check_interval_ms(status_check_interval_ms: u64) -> Self {
        Self {
            status_check_interval_ms,
        }
    }

    /// Create a config for testing (short poll period).
    pub fn for_testing() -> Self {
        Self {
            status_check_interval_ms: 100,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// - `BRIDGE_STATUS_CHECK_INTERVAL_MS`: poll period (default: 10000)
    pub fn from_env() -> Self {
        let status_check_interval_ms = env::var("BRIDGE_STATUS_CHECK_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_STATUS_CHECK_INTERVAL_MS);

        Self {
            status_check_interval_ms,
        }
    }

    /// Poll period as a [`Duration`].
    pub fn status_check_interval(&self) -> Duration {
        Duration::from_millis(self.status_check_interval_ms)
    }
}
