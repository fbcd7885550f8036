//! Home directory preparation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::HomeLayout;
use crate::lifecycle::LifecycleError;

#[cfg(unix)]
const HOME_DIR_MODE: u32 = 0o755;

/// Resolve `home_dir` to an absolute path and make sure it exists.
pub fn prepare_home(home_dir: &str) -> Result<PathBuf, LifecycleError> {
    if home_dir.is_empty() {
        return Err(LifecycleError::EmptyHomeDir);
    }

    let home = std::path::absolute(home_dir).map_err(|source| {
        LifecycleError::HomeDirResolveFailed {
            path: PathBuf::from(home_dir),
            source,
        }
    })?;

    create_dir(&home).map_err(|source| LifecycleError::HomeDirCreateFailed {
        path: home.clone(),
        source,
    })?;

    Ok(home)
}

/// Create the directories the geo datasets live in. Population of the
/// datasets is up to the engine, so failures are only logged.
pub fn ensure_dataset_dirs(layout: &HomeLayout) {
    for dir in layout.dataset_dirs() {
        if let Err(e) = create_dir(&dir) {
            tracing::debug!(path = %dir.display(), error = %e, "Dataset directory not created");
        }
    }
}

fn create_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(HOME_DIR_MODE);
    }
    builder.create(dir)
}
