//! Bounded-retry cleanup for temporary files.
//!
//! Deleting a just-written file can fail transiently on some platforms
//! (antivirus scanners and indexers hold short-lived locks, most commonly
//! on Windows). Rather than inlining an ad-hoc loop at every call site,
//! this module provides one bounded-retry utility and a file-removal
//! helper built on it.
//!
//! Cleanup failure is never a batch failure: after all retries the
//! leftover file is reported with `tracing::warn!` and the batch result is
//! unaffected. A dangling temp file is an acceptable, logged degradation.

use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Attempts made before giving up on a cleanup operation.
pub const CLEANUP_MAX_ATTEMPTS: u32 = 5;

/// Pause between cleanup attempts.
pub const CLEANUP_RETRY_PAUSE: Duration = Duration::from_secs(1);

/// Run `op` up to `max_attempts` times, pausing `pause` between attempts.
///
/// Returns the first `Ok`, or the last `Err` once attempts are exhausted.
/// `max_attempts` of 0 is treated as 1.
pub async fn retry<T, E, F>(
    mut op: F,
    max_attempts: u32,
    pause: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
{
    let attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if attempt >= attempts => return Err(e),
            Err(_) => {
                attempt += 1;
                tokio::time::sleep(pause).await;
            }
        }
    }
}

/// Delete a temporary file, retrying on transient failure.
///
/// Returns `true` when the file is gone (deleted now, or already absent).
/// A failure after all retries logs an advisory warning and returns
/// `false`; it is never escalated to the caller as an error.
pub async fn remove_file_with_retries(
    path: &Path,
    max_attempts: u32,
    pause: Duration,
) -> bool {
    if !path.exists() {
        return true;
    }

    let result = retry(
        || match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            // Racing deletions are fine; the goal is "file absent".
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        },
        max_attempts,
        pause,
    )
    .await;

    match result {
        Ok(()) => {
            debug!("Removed temporary file {}", path.display());
            true
        }
        Err(e) => {
            warn!(
                "Could not remove temporary file {} after {} attempts: {}",
                path.display(),
                max_attempts.max(1),
                e
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn retry_returns_first_success() {
        let calls = Cell::new(0u32);
        let result: Result<u32, ()> = retry(
            || {
                calls.set(calls.get() + 1);
                Ok(7)
            },
            5,
            Duration::ZERO,
        )
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn retry_recovers_from_transient_failure() {
        let calls = Cell::new(0u32);
        let result: Result<&str, &str> = retry(
            || {
                calls.set(calls.get() + 1);
                if calls.get() < 3 {
                    Err("locked")
                } else {
                    Ok("done")
                }
            },
            5,
            Duration::ZERO,
        )
        .await;
        assert_eq!(result, Ok("done"));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn retry_exhausts_attempts() {
        let calls = Cell::new(0u32);
        let result: Result<(), &str> = retry(
            || {
                calls.set(calls.get() + 1);
                Err("locked")
            },
            5,
            Duration::ZERO,
        )
        .await;
        assert_eq!(result, Err("locked"));
        assert_eq!(calls.get(), 5);
    }

    #[tokio::test]
    async fn remove_missing_file_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never-existed.tmp");
        assert!(remove_file_with_retries(&path, 5, Duration::ZERO).await);
    }

    #[tokio::test]
    async fn remove_existing_file_deletes_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staged.tmp");
        std::fs::write(&path, b"scratch").unwrap();

        assert!(remove_file_with_retries(&path, 5, Duration::ZERO).await);
        assert!(!path.exists());
    }
}
