//! Working directory save and restore.

use std::io;
use std::path::{Path, PathBuf};

/// Records the current working directory and returns to it on
/// [`restore`](CwdGuard::restore) or drop.
#[derive(Debug)]
pub struct CwdGuard {
    saved: PathBuf,
}

impl CwdGuard {
    pub fn save() -> io::Result<Self> {
        Ok(Self {
            saved: std::env::current_dir()?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.saved
    }

    /// Change back to the saved directory. May be called repeatedly.
    pub fn restore(&self) -> io::Result<()> {
        std::env::set_current_dir(&self.saved)
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::warn!(path = %self.saved.display(), %err, "failed to restore working directory");
        }
    }
}
