//! Inspect or stop a running mock client through its lock file.

use crate::error::Result;
use crate::lock::read_owner_pid;
use crate::signals::terminate;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    Active { pid: u32 },
    Inactive,
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockStatus::Active { pid } => write!(f, "Active (PID {pid})"),
            LockStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

/// Report whether a lock file is present at `lock_path`.
///
/// Only the file's presence is checked; the recorded PID is not probed for
/// liveness, so a stale lock reads as active.
pub fn status(lock_path: &Path) -> Result<LockStatus> {
    Ok(match read_owner_pid(lock_path)? {
        Some(pid) => LockStatus::Active { pid },
        None => LockStatus::Inactive,
    })
}

/// Send the termination signal to the PID recorded in the lock file.
///
/// # Returns
/// * `Ok(Some(pid))` - The owner was signalled
/// * `Ok(None)` - No lock file, nothing to stop
pub fn stop(lock_path: &Path) -> Result<Option<u32>> {
    let Some(pid) = read_owner_pid(lock_path)? else {
        tracing::debug!(path = %lock_path.display(), "no lock file to stop");
        return Ok(None);
    };

    terminate(pid)?;
    tracing::info!(pid, "sent termination signal to lock owner");
    Ok(Some(pid))
}
