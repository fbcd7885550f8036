//! Boundary to the proxy engine being managed.
//!
//! # Data Flow
//! ```text
//! LifecycleController
//!     → ProxyEngine::set_home_dir / init_config_dir
//!     → ProxyEngine::apply(config bytes)
//!     → ProxyEngine::shutdown()
//!
//! Engine internals
//!     → EventHub::publish(level, payload)
//!     → broadcast::Receiver<LogEvent> (LogBridge)
//! ```
//!
//! # Design Decisions
//! - The engine is opaque: config bytes are never parsed on this side
//! - One engine handle per controller, shared via Arc
//! - The engine protects its own internals; every method takes `&self`

pub mod events;
pub mod layout;

pub use events::{EventHub, LogEvent};
pub use layout::HomeLayout;

use std::path::Path;
use tokio::sync::broadcast;

/// Error reported by the engine when it rejects a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Entry points a proxy engine exposes to the lifecycle layer.
pub trait ProxyEngine: Send + Sync {
    /// Register the home directory all derived engine paths hang off.
    fn set_home_dir(&self, home: &Path);

    /// Point the engine at the config file it should consider current.
    fn set_config_file(&self, path: &Path);

    /// Initialise the engine's own config subsystem under `home`.
    fn init_config_dir(&self, home: &Path) -> Result<(), EngineError>;

    /// Reconfigure the running services from raw configuration bytes.
    fn apply(&self, config: &[u8]) -> Result<(), EngineError>;

    /// Stop every running service.
    fn shutdown(&self);

    /// Subscribe to the engine's internal event stream.
    fn subscribe(&self) -> broadcast::Receiver<LogEvent>;
}
