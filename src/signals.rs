//! Termination signal plumbing.
//!
//! SIGTERM is not handled by an asynchronous handler. It is blocked on the
//! calling thread and collected synchronously by a listener thread, which
//! forwards it as a [`StopRequest`] over a channel. The lifecycle then races
//! that channel against its timer.

use crate::error::{MockError, Result};
use nix::sys::signal::{kill, SigSet, Signal};
use nix::unistd::Pid;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// An external request to stop the mock client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopRequest {
    pub signal: Signal,
}

/// Block SIGTERM and start a thread that reports it as a [`StopRequest`].
///
/// Must be called before any other thread is spawned so every thread
/// inherits the blocked mask and the signal can only be consumed by the
/// listener.
pub fn install_termination_listener() -> Result<Receiver<StopRequest>> {
    let mut set = SigSet::empty();
    set.add(Signal::SIGTERM);
    set.thread_block().map_err(MockError::ListenerInstall)?;

    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("sigterm-listener".to_string())
        .spawn(move || listen(set, tx))
        .map_err(MockError::ListenerSpawn)?;

    tracing::debug!("termination listener installed");
    Ok(rx)
}

fn listen(set: SigSet, tx: Sender<StopRequest>) {
    match set.wait() {
        Ok(signal) => {
            tracing::debug!(%signal, "termination signal received");
            // Receiver is gone only once the lifecycle has already finished
            let _ = tx.send(StopRequest { signal });
        }
        Err(e) => {
            tracing::warn!(error = %e, "termination listener failed; relying on timeout");
        }
    }
}

/// Ask the process `pid` to stop gracefully.
pub fn terminate(pid: u32) -> Result<()> {
    let raw = i32::try_from(pid).map_err(|_| MockError::Signal {
        pid,
        source: nix::Error::EINVAL,
    })?;

    kill(Pid::from_raw(raw), Signal::SIGTERM).map_err(|source| MockError::Signal { pid, source })
}
