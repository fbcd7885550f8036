//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Setup (controller.rs):
//!     Prepare home (home.rs) → Resolve config → Persist (warn only)
//!     → Init engine config dir (warn only) → Provision dataset dirs
//!     → Apply → Cache bytes + path, started = true
//!
//! Reload variants:
//!     Cached or new bytes → Apply → (new bytes only) Cache + Persist
//!
//! Stop:
//!     started? → Engine shutdown → started = false
//! ```
//!
//! # Design Decisions
//! - One lock around every operation; a slow apply blocks the others
//! - Apply failures are fatal and leave state untouched
//! - Persist failures are warnings; the running engine wins over the file
//! - The log bridge starts on first setup or logger registration and
//!   survives stop/setup cycles

pub mod controller;
pub mod error;
pub mod home;

pub use controller::{LifecycleController, RuntimeSnapshot};
pub use error::LifecycleError;
