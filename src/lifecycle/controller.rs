//! The lifecycle controller.
//!
//! # States
//! ```text
//! Stopped ──setup──▶ Running
//! Running ──setup / reload / reload_with_*──▶ Running
//! Running ──stop──▶ Stopped
//! Stopped ──stop──▶ Stopped (no-op)
//! ```
//!
//! Every operation holds the state lock for its whole body, including the
//! engine apply call. State is only written after the apply succeeded, so a
//! failed operation leaves the previous state in place.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::resolver::decode_base64;
use crate::config::{ConfigResolver, ConfigStore, RuntimeConfig};
use crate::engine::{HomeLayout, ProxyEngine};
use crate::lifecycle::home::{ensure_dataset_dirs, prepare_home};
use crate::lifecycle::LifecycleError;
use crate::observability::{LogBridge, Metrics, RealTimeLogger};

#[derive(Debug, Default)]
struct RuntimeState {
    started: bool,
    config_cache: Vec<u8>,
    config_path: Option<PathBuf>,
    /// Set by the first successful setup.
    layout: Option<HomeLayout>,
}

/// Point-in-time copy of the controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSnapshot {
    pub started: bool,
    pub config: Vec<u8>,
    pub config_path: Option<PathBuf>,
    pub home: Option<PathBuf>,
}

/// Drives one proxy engine through setup, reload and stop.
pub struct LifecycleController {
    engine: Arc<dyn ProxyEngine>,
    config: RuntimeConfig,
    state: Mutex<RuntimeState>,
    bridge: LogBridge,
    metrics: Metrics,
}

impl LifecycleController {
    pub fn new(engine: Arc<dyn ProxyEngine>, config: RuntimeConfig) -> Self {
        let metrics = Metrics::new(config.observability.metrics_enabled);
        let bridge = LogBridge::new(&config.bridge, metrics);
        Self {
            engine,
            config,
            state: Mutex::new(RuntimeState::default()),
            bridge,
            metrics,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RuntimeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Prepare `home_dir`, resolve `config_source` and apply it.
    ///
    /// Failures are reported through the log only; use [`try_setup`] to
    /// observe them.
    ///
    /// [`try_setup`]: LifecycleController::try_setup
    pub fn setup(&self, home_dir: &str, config_source: &str) {
        if let Err(e) = self.try_setup(home_dir, config_source) {
            tracing::error!(home_dir, error = %e, "Setup failed");
        }
    }

    pub fn try_setup(&self, home_dir: &str, config_source: &str) -> Result<(), LifecycleError> {
        let mut state = self.lock();
        self.start_bridge();

        let home = prepare_home(home_dir)?;
        self.engine.set_home_dir(&home);
        let layout = HomeLayout::new(&home, &self.config.layout);

        let resolved = ConfigResolver::new(&layout).resolve(config_source)?;
        tracing::info!(
            source = %resolved.source,
            path = %resolved.path.display(),
            size = resolved.bytes.len(),
            "Config resolved"
        );

        self.persist_best_effort(&layout, &resolved.bytes, Some(resolved.path.as_path()), "setup");

        if let Err(e) = self.engine.init_config_dir(&home) {
            tracing::warn!(home = %home.display(), error = %e, "Initialise config directory warning");
        }

        ensure_dataset_dirs(&layout);

        self.apply(&resolved.bytes, "setup")?;

        state.config_cache = resolved.bytes;
        state.config_path = Some(resolved.path);
        state.layout = Some(layout);
        state.started = true;
        self.metrics.set_started(true);

        tracing::info!(home = %home.display(), "Proxy engine running");
        Ok(())
    }

    /// Re-apply the cached configuration.
    pub fn reload(&self) -> Result<(), LifecycleError> {
        let state = self.lock();
        if !state.started {
            return Err(LifecycleError::NotStarted);
        }

        self.apply(&state.config_cache, "reload")?;
        tracing::info!(size = state.config_cache.len(), "Config reloaded");
        Ok(())
    }

    /// Apply new configuration bytes, then cache and persist them.
    ///
    /// Requires a prior successful setup. Called after [`stop`](Self::stop),
    /// a successful apply marks the engine as running again.
    pub fn reload_with_config(&self, data: &[u8]) -> Result<(), LifecycleError> {
        let mut state = self.lock();
        self.reload_with_config_locked(&mut state, data)
    }

    /// Like [`reload_with_config`](Self::reload_with_config) with a standard
    /// base64 payload. Line breaks inside the payload are ignored.
    pub fn reload_with_base64(&self, payload: &str) -> Result<(), LifecycleError> {
        let mut state = self.lock();
        let data = decode_base64(payload).map_err(LifecycleError::Base64DecodeFailed)?;
        self.reload_with_config_locked(&mut state, &data)
    }

    fn reload_with_config_locked(
        &self,
        state: &mut RuntimeState,
        data: &[u8],
    ) -> Result<(), LifecycleError> {
        if data.is_empty() {
            return Err(LifecycleError::EmptyConfig);
        }
        let Some(layout) = state.layout.as_ref() else {
            return Err(LifecycleError::NotStarted);
        };

        self.apply(data, "reload_with_config")?;

        state.config_cache.clear();
        state.config_cache.extend_from_slice(data);
        if !state.started {
            state.started = true;
            self.metrics.set_started(true);
        }

        self.persist_best_effort(layout, data, state.config_path.as_deref(), "reload_with_config");
        tracing::info!(size = data.len(), "Config replaced");
        Ok(())
    }

    /// Apply the config file after it was edited on disk.
    ///
    /// Returns `Ok(false)` when the bytes match what is already applied,
    /// which is the case for the controller's own writes.
    pub fn apply_external_edit(&self, data: Vec<u8>) -> Result<bool, LifecycleError> {
        let mut state = self.lock();
        if data.is_empty() {
            return Err(LifecycleError::EmptyConfig);
        }
        if !state.started {
            return Err(LifecycleError::NotStarted);
        }
        if data == state.config_cache {
            return Ok(false);
        }

        self.apply(&data, "external_edit")?;
        state.config_cache = data;
        Ok(true)
    }

    /// Shut the engine down. Stopping a stopped engine does nothing.
    ///
    /// The cached config and path are kept, and the log bridge keeps running.
    pub fn stop(&self) {
        let mut state = self.lock();
        if !state.started {
            return;
        }

        self.engine.shutdown();
        state.started = false;
        self.metrics.set_started(false);
        tracing::info!("Proxy engine stopped");
    }

    /// Register the logger that receives engine events.
    pub fn setup_logger<L>(&self, logger: L)
    where
        L: RealTimeLogger + 'static,
    {
        self.bridge.set_logger(logger);
        self.start_bridge();
    }

    pub fn clear_logger(&self) {
        self.bridge.clear_logger();
    }

    /// Stop forwarding engine events. The bridge does not restart afterwards.
    pub fn shutdown_bridge(&self) {
        self.bridge.stop();
    }

    pub fn bridge_running(&self) -> bool {
        self.bridge.is_running()
    }

    pub fn is_started(&self) -> bool {
        self.lock().started
    }

    pub fn snapshot(&self) -> RuntimeSnapshot {
        let state = self.lock();
        RuntimeSnapshot {
            started: state.started,
            config: state.config_cache.clone(),
            config_path: state.config_path.clone(),
            home: state.layout.as_ref().map(|l| l.home.clone()),
        }
    }

    fn start_bridge(&self) {
        self.bridge.start(|| self.engine.subscribe());
    }

    fn apply(&self, data: &[u8], operation: &'static str) -> Result<(), LifecycleError> {
        if data.is_empty() {
            return Err(LifecycleError::EmptyConfig);
        }
        let result = self.engine.apply(data);
        self.metrics.record_apply(operation, result.is_ok());
        result.map_err(|e| {
            tracing::error!(operation, error = %e, "Engine rejected config");
            LifecycleError::ConfigApplyFailed(e)
        })
    }

    /// Write failures are logged, never returned.
    fn persist_best_effort(
        &self,
        layout: &HomeLayout,
        data: &[u8],
        target: Option<&std::path::Path>,
        operation: &'static str,
    ) {
        let store = ConfigStore::new(&layout.config_file).with_engine(self.engine.as_ref());
        if let Err(e) = store.persist(data, target).map_err(LifecycleError::from) {
            self.metrics.record_persist_failure(operation);
            tracing::warn!(operation, error = %e, "Persist config warning");
        }
    }
}
