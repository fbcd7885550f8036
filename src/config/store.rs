//! Durable persistence of engine configuration bytes.
//!
//! Bytes go to a temp file in the target directory first and are renamed
//! into place, so a reader sees either the old or the new file, never a
//! partial one. The file is owner read/write only.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::engine::ProxyEngine;

#[cfg(unix)]
const CONFIG_DIR_MODE: u32 = 0o700;
#[cfg(unix)]
const CONFIG_FILE_MODE: u32 = 0o600;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("configuration payload is empty")]
    EmptyConfig,
    #[error("prepare config directory {} failed: {source}", path.display())]
    MkdirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write config {} failed: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes config bytes to disk and repoints the engine at them.
pub struct ConfigStore<'a> {
    default_path: &'a Path,
    engine: Option<&'a dyn ProxyEngine>,
}

impl<'a> ConfigStore<'a> {
    /// A store that only touches the filesystem.
    pub fn new(default_path: &'a Path) -> Self {
        Self {
            default_path,
            engine: None,
        }
    }

    /// Also update the engine's config-file pointer after each write.
    pub fn with_engine(mut self, engine: &'a dyn ProxyEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Persist `bytes` to `target`, or to the default path when unset.
    ///
    /// Returns the path actually written.
    pub fn persist(&self, bytes: &[u8], target: Option<&Path>) -> Result<PathBuf, StoreError> {
        if bytes.is_empty() {
            return Err(StoreError::EmptyConfig);
        }

        let target = match target {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => self.default_path,
        };

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        create_private_dir(dir).map_err(|source| StoreError::MkdirFailed {
            path: dir.to_path_buf(),
            source,
        })?;

        write_replace(dir, target, bytes).map_err(|source| StoreError::WriteFailed {
            path: target.to_path_buf(),
            source,
        })?;

        if let Some(engine) = self.engine {
            engine.set_config_file(target);
        }

        tracing::debug!(path = %target.display(), size = bytes.len(), "Config persisted");
        Ok(target.to_path_buf())
    }
}

fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(CONFIG_DIR_MODE);
    }
    builder.create(dir)
}

fn write_replace(dir: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(CONFIG_FILE_MODE))?;
    }
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
