//! Prometheus metrics for route-step execution.
//!
//! All metrics follow the naming convention: `bridge_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Approval evaluations by outcome
    pub static ref APPROVAL_CHECKS: CounterVec = CounterVec::new(
        Opts::new("bridge_step_approval_checks_total", "Approval requirement evaluations"),
        &["outcome"]  // outcome: required/sufficient/not_applicable
    ).expect("metric creation failed");

    /// Hash reports sent to the remote route service
    pub static ref STATUS_REPORTS: Counter = Counter::new(
        "bridge_step_status_reports_total",
        "Total status reports sent while polling route steps"
    ).expect("metric creation failed");

    /// Steps that reached a terminal status
    pub static ref STEPS_FINISHED: CounterVec = CounterVec::new(
        Opts::new("bridge_step_finished_total", "Route steps that reached a terminal status"),
        &["status"]
    ).expect("metric creation failed");

    /// Send transactions rejected by destination validation
    pub static ref DESTINATIONS_REJECTED: Counter = Counter::new(
        "bridge_step_destinations_rejected_total",
        "Send transactions whose destination was not in the allow-list"
    ).expect("metric creation failed");
}

/// Handle to the registry the metrics were registered with.
#[derive(Debug, Clone)]
pub struct MetricsHandle {
    registry: Arc<Registry>,
}

impl MetricsHandle {
    /// Registry holding the route-step metrics.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(APPROVAL_CHECKS.clone()),
        Box::new(STATUS_REPORTS.clone()),
        Box::new(STEPS_FINISHED.clone()),
        Box::new(DESTINATIONS_REJECTED.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
