//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! runtime.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RuntimeConfig (layout, observability, bridge)
//!
//! engine config source (path | base64 | raw text)
//!     → resolver.rs (classify & read)
//!     → ResolvedConfig { bytes, path }
//!     → store.rs (temp file + rename, engine pointer update)
//!
//! On external edit:
//!     watcher.rs detects change
//!     → reads file bytes
//!     → LifecycleController::apply_external_edit
//! ```
//!
//! # Design Decisions
//! - Engine config bytes are opaque; only the runtime's own config is typed
//! - All runtime config fields have defaults to allow minimal configs
//! - Resolution priority is fixed: file > base64 > raw text

pub mod loader;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use resolver::{ConfigResolver, ResolveError, ResolvedConfig, SourceKind};
pub use schema::{BridgeConfig, LayoutConfig, ObservabilityConfig, RuntimeConfig};
pub use store::{ConfigStore, StoreError};
pub use watcher::{spawn_reload_loop, ConfigWatcher};
