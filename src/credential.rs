//! Best-effort read of a credential ("cookie") line from stdin.

use crate::config::COOKIE_BUFFER_LEN;
use std::io::{BufRead, Read};

/// Read at most one line, bounded to [`COOKIE_BUFFER_LEN`] bytes.
///
/// Returns `None` when the input is closed, empty or unreadable. Failures
/// are never propagated since the credential is optional.
pub fn read_cookie<R: BufRead>(input: R) -> Option<String> {
    let mut buf = Vec::with_capacity(COOKIE_BUFFER_LEN);
    let mut bounded = input.take(COOKIE_BUFFER_LEN as u64);

    match bounded.read_until(b'\n', &mut buf) {
        Ok(0) => {
            tracing::debug!("stdin closed before a credential line arrived");
            return None;
        }
        Ok(_) => {}
        Err(e) => {
            tracing::debug!(error = %e, "skipping credential read");
            return None;
        }
    }

    let line = String::from_utf8_lossy(&buf);
    let line = line.trim_end_matches(['\n', '\r']);
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}
