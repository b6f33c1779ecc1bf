//! Mock gpclient process for exercising VPN client lifecycle management.
//!
//! A running instance holds an exclusive PID lock file, optionally consumes a
//! credential line from stdin, waits for a bounded time or a termination
//! signal, and removes its lock file on either exit path.

pub mod config;
pub mod control;
pub mod credential;
pub mod error;
pub mod lifecycle;
pub mod lock;
pub mod signals;

pub use config::MockConfig;
pub use error::{MockError, Result};
pub use lifecycle::{Console, MockClient, Outcome, Phase};
pub use lock::LockFile;
