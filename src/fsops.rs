use std::io;
use std::path::Path;
use std::time::Duration;

use filetime::FileTime;

/// The three primitive filesystem effects the mover is built from.
///
/// Kept behind a trait so tests can simulate files that refuse to be deleted.
pub trait FileOps: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    /// Copy content and metadata from `src` to `dst`, returning bytes copied.
    fn copy(&self, src: &Path, dst: &Path) -> io::Result<u64>;

    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileOps;

impl FileOps for StdFileOps {
    fn exists(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path).is_ok()
    }

    fn copy(&self, src: &Path, dst: &Path) -> io::Result<u64> {
        // std::fs::copy carries permissions; timestamps are restored separately.
        let bytes = std::fs::copy(src, dst)?;
        let metadata = std::fs::metadata(src)?;
        let atime = FileTime::from_last_access_time(&metadata);
        let mtime = FileTime::from_last_modification_time(&metadata);
        filetime::set_file_times(dst, atime, mtime)?;
        Ok(bytes)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Waits between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
