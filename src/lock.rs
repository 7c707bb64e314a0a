//! Single-instance enforcement via an advisory file lock.

use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result, bail};
use nix::fcntl::{Flock, FlockArg};

/// Exclusive advisory lock held for the lifetime of the process.
///
/// Dropping the guard releases the lock on clean exit; if the process dies
/// without unwinding, the OS releases it on process teardown. The file's
/// content is irrelevant, only the lock matters.
pub struct InstanceLock {
    _lock: Flock<File>,
}

impl InstanceLock {
    /// Open (creating if absent) `path` and take a non-blocking exclusive
    /// lock on it. Contention means another instance is active, which is a
    /// fatal condition for the caller.
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("opening lock file {}", path.display()))?;

        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(lock) => Ok(Self { _lock: lock }),
            Err((_, errno)) => {
                tracing::debug!(path = %path.display(), %errno, "lock contention");
                bail!("another instance is already running");
            }
        }
    }
}
