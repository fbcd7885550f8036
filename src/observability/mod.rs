//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Lifecycle operations produce:
//!     → logging.rs (structured tracing events; Setup errors surface here)
//!     → metrics.rs (apply/persist counters, started gauge)
//!
//! Engine produces:
//!     → EventHub broadcast
//!     → bridge.rs (one forwarding thread)
//!     → RealTimeLogger registered by the host
//! ```
//!
//! # Design Decisions
//! - The engine's own event stream is separate from our tracing output
//! - Logger delivery is best-effort; no ordering across logger swaps
//! - Metrics are cheap and can be switched off in config

pub mod bridge;
pub mod logging;
pub mod metrics;

pub use bridge::{LogBridge, RealTimeLogger};
pub use logging::init_logging;
pub use metrics::Metrics;
