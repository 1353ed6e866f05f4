//! Cross-crate integration flows.

mod flows;

use bridge_telemetry::{init_telemetry, TelemetryConfig, TelemetryGuard};
use std::sync::OnceLock;

static TELEMETRY: OnceLock<Option<TelemetryGuard>> = OnceLock::new();

/// Install logging and metrics once for the whole test binary.
pub fn init_test_telemetry() {
    TELEMETRY.get_or_init(|| init_telemetry(TelemetryConfig::for_testing()).ok());
}
