//! Lifecycle metrics.
//!
//! # Metrics
//! - `proxy_runtime_applies_total` (counter): engine applies by operation, outcome
//! - `proxy_runtime_persist_failures_total` (counter): config writes downgraded to warnings
//! - `proxy_runtime_events_forwarded_total` (counter): engine events handed to the logger
//! - `proxy_runtime_started` (gauge): 1=running, 0=stopped
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! host process installs a recorder.

use metrics::{counter, gauge};

/// Switchable handle for recording lifecycle metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    enabled: bool,
}

impl Metrics {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Record one engine apply attempt.
    pub fn record_apply(&self, operation: &'static str, succeeded: bool) {
        if !self.enabled {
            return;
        }
        let outcome = if succeeded { "ok" } else { "error" };
        counter!(
            "proxy_runtime_applies_total",
            "operation" => operation,
            "outcome" => outcome
        )
        .increment(1);
    }

    pub fn record_persist_failure(&self, operation: &'static str) {
        if self.enabled {
            counter!("proxy_runtime_persist_failures_total", "operation" => operation).increment(1);
        }
    }

    pub fn record_event_forwarded(&self) {
        if self.enabled {
            counter!("proxy_runtime_events_forwarded_total").increment(1);
        }
    }

    pub fn set_started(&self, started: bool) {
        if self.enabled {
            gauge!("proxy_runtime_started").set(if started { 1.0 } else { 0.0 });
        }
    }
}
