//! Disposable per-call working directories
//!
//! The toolchain writes auxiliary files next to its input, so every compile
//! call gets a directory of its own. Names combine the process id with a
//! process-wide counter, and creation never reuses an existing directory,
//! so concurrent calls in one process or across processes sharing a temp
//! root cannot collide.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(0);

const PREFIX: &str = "texdok";

/// A uniquely named directory removed when dropped
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
}

impl WorkDir {
    /// Create a fresh directory under `root`
    ///
    /// Names that already exist are skipped by moving on to the next
    /// counter value.
    pub fn create_in(root: &Path) -> io::Result<Self> {
        let pid = std::process::id();
        loop {
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let path = root.join(format!("{PREFIX}{pid}_{n}"));
            match fs::create_dir(&path) {
                Ok(()) => return Ok(Self { path }),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside the directory
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => log::trace!("Removed {}", self.path.display()),
            Err(e) => log::warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}
