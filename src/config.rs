//! Runtime configuration for a mock client instance.

use std::path::PathBuf;
use std::time::Duration;

/// Well-known lock file location used when no path is given.
pub const DEFAULT_LOCK_PATH: &str = "/tmp/gpclient.lock";

/// Environment variable that overrides [`DEFAULT_LOCK_PATH`].
pub const LOCK_PATH_ENV: &str = "GPCLIENT_MOCK_LOCK_FILE";

/// Simulated work duration when `--timeout` is not given.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Upper bound on the credential line read from stdin.
pub const COOKIE_BUFFER_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConfig {
    /// Path of the exclusive lock file
    pub lock_path: PathBuf,
    /// Read one credential line from stdin before taking the lock
    pub cookie_on_stdin: bool,
    /// How long to hold the lock absent a stop request
    pub timeout: Duration,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            lock_path: PathBuf::from(DEFAULT_LOCK_PATH),
            cookie_on_stdin: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl MockConfig {
    pub fn with_lock_path(mut self, lock_path: impl Into<PathBuf>) -> Self {
        self.lock_path = lock_path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cookie_on_stdin(mut self, enabled: bool) -> Self {
        self.cookie_on_stdin = enabled;
        self
    }
}
