//! Lifecycle manager for an embedded proxy engine.
//!
//! Resolves engine configuration from a file path, base64 payload or raw
//! text, persists it under a home directory, drives the engine through
//! setup/reload/stop, and forwards the engine's event stream to one
//! pluggable logger.

pub mod config;
pub mod engine;
pub mod lifecycle;
pub mod observability;

pub use config::schema::RuntimeConfig;
pub use engine::{EngineError, EventHub, LogEvent, ProxyEngine};
pub use lifecycle::{LifecycleController, LifecycleError, RuntimeSnapshot};
pub use observability::RealTimeLogger;
