//! Error kinds surfaced by lifecycle operations.

use std::path::PathBuf;

use crate::config::{ResolveError, StoreError};
use crate::engine::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("home directory is empty")]
    EmptyHomeDir,
    #[error("resolve home dir {} failed: {source}", path.display())]
    HomeDirResolveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("create home dir {} failed: {source}", path.display())]
    HomeDirCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration is empty")]
    EmptyConfig,
    #[error("read config file {} failed: {source}", path.display())]
    ConfigReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("persist config failed: {0}")]
    ConfigWriteFailed(#[source] StoreError),
    #[error("apply config failed: {0}")]
    ConfigApplyFailed(#[source] EngineError),
    #[error("proxy engine has not been started")]
    NotStarted,
    #[error("decode config failed: {0}")]
    Base64DecodeFailed(#[source] base64::DecodeError),
}

impl From<ResolveError> for LifecycleError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::EmptyConfig => LifecycleError::EmptyConfig,
            ResolveError::ReadFailed { path, source } => {
                LifecycleError::ConfigReadFailed { path, source }
            }
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmptyConfig => LifecycleError::EmptyConfig,
            other => LifecycleError::ConfigWriteFailed(other),
        }
    }
}
