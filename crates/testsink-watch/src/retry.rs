//! Bounded-backoff retry for opening freshly written report files.
//!
//! The test station holds an exclusive lock on a report while it is still
//! being written; the open is retried with growing delays until the lock
//! clears or the policy is exhausted. The sleep is async, so waiting on one
//! file never stalls the handling of other notifications.

use crate::error::{Error, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Retry policy for transiently locked files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts before giving up.
    pub max_attempts: u32,

    /// Delay before the second attempt.
    pub initial_delay: Duration,

    /// Upper bound for the growing delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            max_delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        // 5s matches the station's historical write cadence; doubling up to
        // a minute keeps the total wait bounded at a few minutes.
        Self::new(8, Duration::from_secs(5), Duration::from_secs(60))
    }
}

/// Run `op` until it succeeds, sleeping between transient failures.
///
/// Non-transient errors return immediately; a transient failure on the last
/// attempt returns that failure.
pub async fn retry_transient<T, F>(policy: &RetryPolicy, mut op: F) -> io::Result<T>
where
    F: FnMut() -> io::Result<T>,
{
    let mut delay = policy.initial_delay;
    let mut attempt = 1u32;

    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if is_transient(&err) && attempt < policy.max_attempts => {
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(policy.max_delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Open a file for shared read access, waiting out a writer's lock.
///
/// Exhausting the policy yields [`Error::FileBusy`]; any non-transient open
/// failure is returned as-is.
pub async fn open_when_unlocked(path: &Path, policy: &RetryPolicy) -> Result<File> {
    retry_transient(policy, || File::open(path))
        .await
        .map_err(|err| {
            if is_transient(&err) {
                Error::FileBusy {
                    path: path.to_path_buf(),
                    attempts: policy.max_attempts,
                }
            } else {
                Error::Io(err)
            }
        })
}

/// Whether an open failure looks like another process still holding the file.
///
/// Raw OS error 32 is ERROR_SHARING_VIOLATION on Windows, which does not map
/// to a stable `ErrorKind`.
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::PermissionDenied
    ) || err.raw_os_error() == Some(32)
}
