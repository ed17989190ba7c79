use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::error::MoveError;
use crate::fsops::{FileOps, Sleeper, StdFileOps, ThreadSleeper};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Bounded attempts with a fixed delay between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_attempts,
            retry_delay,
        }
    }

    /// Attempts actually made; a policy of zero still tries once.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait after failed attempt number `attempt` (1-based), or
    /// `None` when that was the last attempt.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        (attempt < self.attempts()).then_some(self.retry_delay)
    }
}

/// Best-effort side branches a move can take. They never decide success on
/// their own but are reported so callers and tests can see them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// A file already at the destination was deleted before copying.
    StaleDestinationRemoved,
    /// A file already at the destination could not be deleted; the copy
    /// went ahead and may overwrite it or fail.
    StaleDestinationKept(io::ErrorKind),
    /// The copy failed and the partially written destination was deleted.
    PartialCopyRemoved,
    /// The copy failed and the partially written destination could not be
    /// deleted.
    PartialCopyKept(io::ErrorKind),
    /// The source could not be deleted so the fresh copy was removed.
    CopyRolledBack,
    /// The source could not be deleted and neither could the fresh copy.
    RollbackFailed(io::ErrorKind),
}

/// What a successful move did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub attempts: u32,
    pub bytes_copied: u64,
    pub fallbacks: Vec<Fallback>,
}

/// Copy-then-delete mover with bounded retries.
///
/// After [`SafeMover::move_file`] returns the file is either fully at `dst`
/// (source gone) or still only at `src`.
#[derive(Clone)]
pub struct SafeMover {
    policy: RetryPolicy,
    fs: Arc<dyn FileOps>,
    sleeper: Arc<dyn Sleeper>,
}

impl Default for SafeMover {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl std::fmt::Debug for SafeMover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeMover").field("policy", &self.policy).finish()
    }
}

impl SafeMover {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_parts(policy, Arc::new(StdFileOps), Arc::new(ThreadSleeper))
    }

    pub fn with_parts(policy: RetryPolicy, fs: Arc<dyn FileOps>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { policy, fs, sleeper }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Move `src` to `dst`, retrying per the policy.
    pub fn move_file(&self, src: &Path, dst: &Path) -> Result<MoveOutcome, MoveError> {
        if src == dst {
            return Err(MoveError::SamePath {
                path: src.to_path_buf(),
            });
        }

        let mut fallbacks = Vec::new();
        let mut attempt = 1;
        loop {
            tracing::debug!(src = %src.display(), dst = %dst.display(), attempt, "moving file");
            match self.attempt_move(src, dst, &mut fallbacks) {
                Ok(bytes_copied) => {
                    return Ok(MoveOutcome {
                        attempts: attempt,
                        bytes_copied,
                        fallbacks,
                    });
                }
                Err(source) => match self.policy.delay_after(attempt) {
                    Some(delay) => {
                        tracing::warn!(
                            src = %src.display(),
                            attempt,
                            error = %source,
                            "move attempt failed, retrying in {}",
                            humantime::format_duration(delay)
                        );
                        self.sleeper.sleep(delay);
                        attempt += 1;
                    }
                    None => {
                        return Err(MoveError::Move {
                            src: src.to_path_buf(),
                            dst: dst.to_path_buf(),
                            attempts: attempt,
                            fallbacks,
                            source,
                        });
                    }
                },
            }
        }
    }

    /// Delete `path`, retrying per the policy.
    pub fn remove_file(&self, path: &Path) -> Result<u32, MoveError> {
        let mut attempt = 1;
        loop {
            match self.fs.remove(path) {
                Ok(()) => return Ok(attempt),
                Err(source) => match self.policy.delay_after(attempt) {
                    Some(delay) => {
                        tracing::warn!(path = %path.display(), attempt, error = %source, "remove failed, retrying");
                        self.sleeper.sleep(delay);
                        attempt += 1;
                    }
                    None => {
                        return Err(MoveError::Remove {
                            path: path.to_path_buf(),
                            attempts: attempt,
                            source,
                        });
                    }
                },
            }
        }
    }

    fn attempt_move(&self, src: &Path, dst: &Path, fallbacks: &mut Vec<Fallback>) -> io::Result<u64> {
        if self.fs.exists(dst) {
            match self.fs.remove(dst) {
                Ok(()) => fallbacks.push(Fallback::StaleDestinationRemoved),
                Err(e) => {
                    tracing::warn!(dst = %dst.display(), error = %e, "could not clear existing destination");
                    fallbacks.push(Fallback::StaleDestinationKept(e.kind()));
                }
            }
        }

        // Only a destination this attempt created may be cleaned up after a
        // failed copy; a stale one that could not be removed is not ours.
        let dst_was_free = !self.fs.exists(dst);
        let bytes = match self.fs.copy(src, dst) {
            Ok(bytes) => bytes,
            Err(e) => {
                if dst_was_free && self.fs.exists(dst) {
                    match self.fs.remove(dst) {
                        Ok(()) => fallbacks.push(Fallback::PartialCopyRemoved),
                        Err(cleanup) => {
                            tracing::error!(
                                dst = %dst.display(),
                                error = %cleanup,
                                "could not remove partial copy"
                            );
                            fallbacks.push(Fallback::PartialCopyKept(cleanup.kind()));
                        }
                    }
                }
                return Err(e);
            }
        };

        if let Err(e) = self.fs.remove(src) {
            match self.fs.remove(dst) {
                Ok(()) => fallbacks.push(Fallback::CopyRolledBack),
                Err(rollback) => {
                    tracing::error!(
                        src = %src.display(),
                        dst = %dst.display(),
                        error = %rollback,
                        "rollback failed, file now exists at both paths"
                    );
                    fallbacks.push(Fallback::RollbackFailed(rollback.kind()));
                }
            }
            return Err(e);
        }
        Ok(bytes)
    }
}
