//! Config file watcher for hot reload.
//!
//! The store replaces the config file by rename, which drops inode-level
//! watches, so the parent directory is watched and events are filtered by
//! file name.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::lifecycle::LifecycleController;

/// A watcher that reports the contents of the config file whenever it changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for the changed file contents.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. Events stop when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();
        let file_name: Option<OsString> = path.file_name().map(ToOwned::to_owned);
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    let touches_config = event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == file_name.as_deref());
                    if !touches_config {
                        return;
                    }
                    match std::fs::read(&path) {
                        Ok(bytes) if !bytes.is_empty() => {
                            let _ = tx.send(bytes);
                        }
                        Ok(_) => tracing::debug!(path = %path.display(), "Config file empty, ignoring"),
                        Err(e) => {
                            tracing::warn!(path = %path.display(), error = %e, "Failed to read changed config")
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Feed watcher output into the controller until the channel closes.
pub fn spawn_reload_loop(
    controller: Arc<LifecycleController>,
    mut updates: mpsc::UnboundedReceiver<Vec<u8>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(bytes) = updates.recv().await {
            let controller = controller.clone();
            let outcome =
                tokio::task::spawn_blocking(move || controller.apply_external_edit(bytes)).await;
            match outcome {
                Ok(Ok(true)) => tracing::info!("Applied edited config file"),
                Ok(Ok(false)) => {}
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Edited config rejected, keeping current configuration")
                }
                Err(e) => tracing::error!(error = %e, "Reload task failed"),
            }
        }
        tracing::debug!("Config update channel closed");
    })
}
