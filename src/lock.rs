//! Exclusive PID lock file.
//!
//! The lock file is a single-slot advisory marker: creating it fails if the
//! path already exists, so at most one mock instance runs per path. The file
//! holds the owner's PID as decimal text followed by a newline, and only the
//! owning process ever removes it.

use crate::error::{MockError, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

/// A lock file created by this process.
///
/// Dropping an unreleased `LockFile` removes the file, so the lock does not
/// outlive a panicking or early-returning owner.
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
    pid: u32,
    held: bool,
}

impl LockFile {
    /// Create the lock file with exclusive-create semantics and record our PID.
    ///
    /// A pre-existing file is never modified or removed.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        Self::create_for(path, std::process::id())
    }

    pub(crate) fn create_for(path: impl Into<PathBuf>, pid: u32) -> Result<Self> {
        let path = path.into();

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o644)
            .open(&path)
            .map_err(|source| {
                if source.kind() == ErrorKind::AlreadyExists {
                    MockError::LockAlreadyExists { path: path.clone() }
                } else {
                    MockError::LockCreate {
                        path: path.clone(),
                        source,
                    }
                }
            })?;

        // From here on the file is ours, so construct the guard before writing
        // and let Drop clean up a half-written lock.
        let lock = Self {
            path,
            pid,
            held: true,
        };

        writeln!(file, "{pid}")
            .and_then(|()| file.flush())
            .map_err(|source| MockError::LockWrite {
                path: lock.path.clone(),
                source,
            })?;

        tracing::debug!(path = %lock.path.display(), pid, "lock file created");
        Ok(lock)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Remove the lock file. A file that is already gone counts as released.
    pub fn release(mut self) -> Result<()> {
        self.held = false;
        remove_lock(&self.path)
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if self.held {
            let _ = remove_lock(&self.path);
        }
    }
}

fn remove_lock(path: &Path) -> Result<()> {
    // Ignore NotFound to avoid a TOCTOU check before removal
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "lock file removed");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(MockError::LockRemove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read the PID recorded in a lock file.
///
/// # Returns
/// * `Ok(Some(pid))` - The lock file exists and holds a PID
/// * `Ok(None)` - No lock file at `path`
/// * `Err(_)` - The file could not be read or does not hold a PID
pub fn read_owner_pid(path: &Path) -> Result<Option<u32>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(MockError::LockRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    content
        .trim()
        .parse::<u32>()
        .map(Some)
        .map_err(|_| MockError::InvalidLockContent {
            path: path.to_path_buf(),
            content,
        })
}
