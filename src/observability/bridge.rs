//! Forwarding of engine events to an external real-time logger.
//!
//! One forwarding thread per bridge, started at most once. It subscribes to
//! the engine's event stream and hands every event to whichever logger is
//! registered at that moment. Logger swaps are lock-free and not ordered
//! against in-flight events: an event racing a swap may reach either logger.
//!
//! The subscription outlives engine stop/setup cycles. It ends when the
//! engine closes its stream, when [`LogBridge::stop`] is called, or when the
//! bridge is dropped.

use std::sync::{Arc, Mutex, Once, PoisonError};
use std::thread;

use arc_swap::ArcSwapOption;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::config::BridgeConfig;
use crate::engine::LogEvent;
use crate::observability::metrics::Metrics;

/// External sink for engine log events.
pub trait RealTimeLogger: Send + Sync {
    fn log(&self, level: &str, payload: &str);
}

type LoggerSlot = ArcSwapOption<Box<dyn RealTimeLogger>>;

pub struct LogBridge {
    logger: Arc<LoggerSlot>,
    start_guard: Once,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    stop_tx: broadcast::Sender<()>,
    thread_name: String,
    metrics: Metrics,
}

impl LogBridge {
    pub fn new(config: &BridgeConfig, metrics: Metrics) -> Self {
        let (stop_tx, _) = broadcast::channel(1);
        Self {
            logger: Arc::new(ArcSwapOption::empty()),
            start_guard: Once::new(),
            worker: Mutex::new(None),
            stop_tx,
            thread_name: config.thread_name.clone(),
            metrics,
        }
    }

    /// Replace the active logger.
    pub fn set_logger<L>(&self, logger: L)
    where
        L: RealTimeLogger + 'static,
    {
        let logger: Box<dyn RealTimeLogger> = Box::new(logger);
        self.logger.store(Some(Arc::new(logger)));
    }

    /// Drop the active logger; subsequent events are discarded.
    pub fn clear_logger(&self) {
        self.logger.store(None);
    }

    pub fn has_logger(&self) -> bool {
        self.logger.load().is_some()
    }

    /// Start forwarding, unless this bridge has already been started or
    /// stopped. `subscribe` runs only when the bridge actually starts, on the
    /// caller's thread, so events published after `start` returns are seen.
    ///
    /// Returns `true` if this call started the bridge.
    pub fn start<F>(&self, subscribe: F) -> bool
    where
        F: FnOnce() -> broadcast::Receiver<LogEvent>,
    {
        let mut started = false;
        self.start_guard.call_once(|| {
            started = self.spawn_worker(subscribe());
        });
        started
    }

    fn spawn_worker(&self, events: broadcast::Receiver<LogEvent>) -> bool {
        let stop = self.stop_tx.subscribe();
        let logger = self.logger.clone();
        let metrics = self.metrics;

        let spawned = thread::Builder::new()
            .name(self.thread_name.clone())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        tracing::error!(error = %e, "Log bridge runtime failed to start");
                        return;
                    }
                };
                runtime.block_on(forward(events, stop, logger, metrics));
            });

        match spawned {
            Ok(handle) => {
                *self.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
                tracing::debug!(thread = %self.thread_name, "Log bridge started");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to spawn log bridge thread");
                false
            }
        }
    }

    /// Whether the forwarding thread is alive.
    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop forwarding and wait for the thread to exit. A stopped bridge
    /// cannot be started again.
    pub fn stop(&self) {
        self.start_guard.call_once(|| {});
        let _ = self.stop_tx.send(());

        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::warn!("Log bridge thread panicked");
            }
        }
    }
}

async fn forward(
    mut events: broadcast::Receiver<LogEvent>,
    mut stop: broadcast::Receiver<()>,
    logger: Arc<LoggerSlot>,
    metrics: Metrics,
) {
    loop {
        tokio::select! {
            _ = stop.recv() => break,
            received = events.recv() => match received {
                Ok(event) => {
                    let current = logger.load();
                    if let Some(logger) = &*current {
                        logger.log(&event.level, &event.payload);
                        metrics.record_event_forwarded();
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Log bridge lagged behind engine events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
    tracing::debug!("Log bridge stopped");
}
