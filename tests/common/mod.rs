//! Shared test fixtures: an in-memory engine that records every call.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use proxy_runtime::{
    EngineError, EventHub, LifecycleController, LogEvent, ProxyEngine, RealTimeLogger,
    RuntimeConfig,
};
use tokio::sync::broadcast;

#[derive(Default)]
pub struct FakeEngine {
    pub hub: EventHub,
    applied: Mutex<Vec<Vec<u8>>>,
    apply_calls: AtomicUsize,
    shutdowns: AtomicUsize,
    init_calls: AtomicUsize,
    home: Mutex<Option<PathBuf>>,
    config_file: Mutex<Option<PathBuf>>,
    fail_apply: AtomicBool,
    fail_init: AtomicBool,
    apply_delay_ms: AtomicU64,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn applied(&self) -> Vec<Vec<u8>> {
        self.applied.lock().unwrap().clone()
    }

    pub fn last_applied(&self) -> Option<Vec<u8>> {
        self.applied.lock().unwrap().last().cloned()
    }

    pub fn apply_calls(&self) -> usize {
        self.apply_calls.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn home(&self) -> Option<PathBuf> {
        self.home.lock().unwrap().clone()
    }

    pub fn config_file(&self) -> Option<PathBuf> {
        self.config_file.lock().unwrap().clone()
    }

    pub fn fail_apply(&self, fail: bool) {
        self.fail_apply.store(fail, Ordering::SeqCst);
    }

    pub fn fail_init(&self, fail: bool) {
        self.fail_init.store(fail, Ordering::SeqCst);
    }

    pub fn set_apply_delay(&self, delay: Duration) {
        self.apply_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl ProxyEngine for FakeEngine {
    fn set_home_dir(&self, home: &Path) {
        *self.home.lock().unwrap() = Some(home.to_path_buf());
    }

    fn set_config_file(&self, path: &Path) {
        *self.config_file.lock().unwrap() = Some(path.to_path_buf());
    }

    fn init_config_dir(&self, _home: &Path) -> Result<(), EngineError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(EngineError::new("config dir not writable"));
        }
        Ok(())
    }

    fn apply(&self, config: &[u8]) -> Result<(), EngineError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.apply_calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.apply_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            thread::sleep(Duration::from_millis(delay));
        }

        let result = if self.fail_apply.load(Ordering::SeqCst) {
            Err(EngineError::new("parse config: unknown proxy-mode"))
        } else {
            self.applied.lock().unwrap().push(config.to_vec());
            self.hub.publish("info", format!("applied {} bytes", config.len()));
            Ok(())
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        self.hub.publish("info", "all services stopped");
    }

    fn subscribe(&self) -> broadcast::Receiver<LogEvent> {
        self.hub.subscribe()
    }
}

pub fn controller(engine: &Arc<FakeEngine>) -> LifecycleController {
    controller_with(engine, RuntimeConfig::default())
}

pub fn controller_with(engine: &Arc<FakeEngine>, config: RuntimeConfig) -> LifecycleController {
    LifecycleController::new(engine.clone(), config)
}

/// A logger that keeps every event it receives.
#[derive(Clone, Default)]
pub struct CapturingLogger {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

impl CapturingLogger {
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn contains(&self, payload: &str) -> bool {
        self.events
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.payload == payload)
    }
}

impl RealTimeLogger for CapturingLogger {
    fn log(&self, level: &str, payload: &str) {
        self.events.lock().unwrap().push(LogEvent::new(level, payload));
    }
}

/// Poll `condition` for up to five seconds.
pub fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}
