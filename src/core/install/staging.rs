use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::error::{LauncherError, LauncherResult};

/// A scratch directory for one install attempt.
///
/// Removed on drop unless [`StagingDir::commit`] moved it into place, so
/// every early return or `?` leaves nothing behind.
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
    armed: bool,
}

impl StagingDir {
    pub async fn create(parent: &Path, version_id: &str) -> LauncherResult<Self> {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| LauncherError::io(parent, e))?;

        let path = parent.join(format!(".{}.{}.partial", version_id, Uuid::new_v4().simple()));
        tokio::fs::create_dir(&path)
            .await
            .map_err(|e| LauncherError::io(&path, e))?;

        debug!("Staging install in {:?}", path);
        Ok(Self { path, armed: true })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the staged contents to `dest`, replacing whatever is there.
    pub async fn commit(mut self, dest: &Path) -> LauncherResult<()> {
        if tokio::fs::try_exists(dest).await.unwrap_or(false) {
            warn!("Replacing orphaned version directory {:?}", dest);
            tokio::fs::remove_dir_all(dest)
                .await
                .map_err(|e| LauncherError::io(dest, e))?;
        }

        tokio::fs::rename(&self.path, dest)
            .await
            .map_err(|e| LauncherError::io(dest, e))?;
        self.armed = false;
        Ok(())
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to clean up staging dir {:?}: {}", self.path, e);
            }
        } else {
            debug!("Discarded staging dir {:?}", self.path);
        }
    }
}
