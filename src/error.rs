//! Error types for the mock client lifecycle.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MockError {
    /// Another instance (or a stale lock from a crashed run) holds the path.
    #[error("Could not create lock file {}: lock file already exists", path.display())]
    LockAlreadyExists { path: PathBuf },

    #[error("Could not create lock file {}: {source}", path.display())]
    LockCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write PID to lock file {}: {source}", path.display())]
    LockWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not remove lock file {}: {source}", path.display())]
    LockRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read lock file {}: {source}", path.display())]
    LockRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock file {} does not contain a PID: {content:?}", path.display())]
    InvalidLockContent { path: PathBuf, content: String },

    #[error("Failed to signal process {pid}: {source}")]
    Signal {
        pid: u32,
        #[source]
        source: nix::Error,
    },

    #[error("Failed to install termination listener: {0}")]
    ListenerInstall(#[source] nix::Error),

    #[error("Failed to spawn termination listener thread: {0}")]
    ListenerSpawn(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MockError>;
