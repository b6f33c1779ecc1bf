//! Mock client lifecycle: lock, wait, clean up.
//!
//! The lifecycle moves through [`Phase`]s in a straight line. The wait step
//! races the configured timeout against a [`StopRequest`] channel, and both
//! edges converge on removing the lock file before returning.

use crate::config::MockConfig;
use crate::credential::read_cookie;
use crate::error::Result;
use crate::lock::LockFile;
use crate::signals::StopRequest;
use std::io::{BufRead, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    LockAcquired,
    Waiting,
    Terminating,
}

/// Which edge led into [`Phase::Terminating`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The configured wait elapsed without interruption
    TimedOut,
    /// A termination request arrived during the wait
    StopRequested,
}

/// Output streams for status lines and diagnostics.
///
/// Write failures are ignored; a closed stdout must not keep the lock alive.
pub struct Console<O: Write, E: Write> {
    pub out: O,
    pub err: E,
}

impl<O: Write, E: Write> Console<O, E> {
    fn status(&mut self, line: &str) {
        let _ = writeln!(self.out, "{line}");
        let _ = self.out.flush();
    }

    fn diagnostic(&mut self, line: &str) {
        let _ = writeln!(self.err, "{line}");
        let _ = self.err.flush();
    }
}

pub struct MockClient {
    config: MockConfig,
    phase: Phase,
}

impl MockClient {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            phase: Phase::Initializing,
        }
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "phase transition");
        self.phase = phase;
    }

    /// Run the full lifecycle.
    ///
    /// # Arguments
    /// * `stdin` - Source of the optional credential line
    /// * `install_listener` - Called once the lock is held; returns the
    ///   channel that delivers stop requests
    /// * `console` - Destination for status and diagnostic lines
    ///
    /// # Returns
    /// The [`Outcome`] once the lock file has been removed, or an error if
    /// the lock could not be created, written or removed. A lock that
    /// already exists is never touched.
    pub fn run<R, F, O, E>(
        &mut self,
        stdin: R,
        install_listener: F,
        console: &mut Console<O, E>,
    ) -> Result<Outcome>
    where
        R: BufRead,
        F: FnOnce() -> Result<Receiver<StopRequest>>,
        O: Write,
        E: Write,
    {
        if self.config.cookie_on_stdin {
            if let Some(cookie) = read_cookie(stdin) {
                console.diagnostic(&format!("Received: {cookie}"));
            }
        }

        let lock = LockFile::create(&self.config.lock_path)?;
        self.enter(Phase::LockAcquired);

        // On failure the lock guard is dropped and removes our own file
        let stop = install_listener()?;

        console.status(&format!(
            "Lock file created: {} with PID: {}",
            lock.path().display(),
            lock.pid()
        ));

        let timeout = self.config.timeout;
        console.status(&format!(
            "Waiting {} seconds before exiting",
            timeout.as_secs()
        ));
        self.enter(Phase::Waiting);
        let outcome = wait_for_stop(&stop, timeout);

        self.enter(Phase::Terminating);
        lock.release()?;
        match outcome {
            Outcome::StopRequested => console.status("Lock file removed. Exiting..."),
            Outcome::TimedOut => console.status("Timeout elapsed. Lock file removed. Exiting..."),
        }

        Ok(outcome)
    }
}

/// Block until `timeout` elapses or a stop request arrives, whichever is first.
///
/// If the sending side disconnects, the remainder of the timeout is still
/// honoured.
pub fn wait_for_stop(stop: &Receiver<StopRequest>, timeout: Duration) -> Outcome {
    let started = Instant::now();

    match stop.recv_timeout(timeout) {
        Ok(request) => {
            tracing::info!(signal = %request.signal, elapsed = ?started.elapsed(), "stop requested");
            Outcome::StopRequested
        }
        Err(RecvTimeoutError::Timeout) => Outcome::TimedOut,
        Err(RecvTimeoutError::Disconnected) => {
            tracing::warn!("stop channel closed; sleeping out the timeout");
            thread::sleep(timeout.saturating_sub(started.elapsed()));
            Outcome::TimedOut
        }
    }
}
