use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crate::fsops::{FileOps, Sleeper, StdFileOps};

/// Real filesystem, except that locked paths can be neither deleted nor
/// overwritten.
pub struct LockedFs {
    locked: Mutex<HashSet<PathBuf>>,
}

impl LockedFs {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            locked: Mutex::new(paths.into_iter().collect()),
        }
    }

    pub fn unlock(&self, path: &Path) {
        self.locked.lock().unwrap().remove(path);
    }

    fn check(&self, path: &Path) -> io::Result<()> {
        if self.locked.lock().unwrap().contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "file is locked"));
        }
        Ok(())
    }
}

impl FileOps for LockedFs {
    fn exists(&self, path: &Path) -> bool {
        StdFileOps.exists(path)
    }

    fn copy(&self, src: &Path, dst: &Path) -> io::Result<u64> {
        self.check(dst)?;
        StdFileOps.copy(src, dst)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        StdFileOps.remove(path)
    }
}

/// Records requested delays instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn calls(&self) -> usize {
        self.delays.lock().unwrap().len()
    }

    pub fn total(&self) -> Duration {
        self.delays.lock().unwrap().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

/// Copies only the first `limit` bytes, then fails as if the disk filled up.
pub struct TruncatingFs {
    limit: usize,
    lock_written: bool,
    written: Mutex<HashSet<PathBuf>>,
}

impl TruncatingFs {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            lock_written: false,
            written: Mutex::new(HashSet::new()),
        }
    }

    /// Make every partial file this writes impossible to delete.
    pub fn locking_written(self) -> Self {
        Self {
            lock_written: true,
            ..self
        }
    }
}

impl FileOps for TruncatingFs {
    fn exists(&self, path: &Path) -> bool {
        StdFileOps.exists(path)
    }

    fn copy(&self, src: &Path, dst: &Path) -> io::Result<u64> {
        let data = std::fs::read(src)?;
        std::fs::write(dst, &data[..self.limit.min(data.len())])?;
        self.written.lock().unwrap().insert(dst.to_path_buf());
        Err(io::Error::new(io::ErrorKind::StorageFull, "no space left on device"))
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        if self.lock_written && self.written.lock().unwrap().contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "file is locked"));
        }
        StdFileOps.remove(path)
    }
}

/// Blocks in `sleep` until released, announcing each call first.
pub struct GateSleeper {
    entered: crossbeam_channel::Sender<()>,
    release: crossbeam_channel::Receiver<()>,
}

impl GateSleeper {
    /// Returns the sleeper, a receiver signalled when a sleep starts, and a
    /// sender whose drop releases every sleep for good.
    pub fn new() -> (
        Self,
        crossbeam_channel::Receiver<()>,
        crossbeam_channel::Sender<()>,
    ) {
        let (entered_tx, entered_rx) = crossbeam_channel::unbounded();
        let (release_tx, release_rx) = crossbeam_channel::unbounded();
        let sleeper = Self {
            entered: entered_tx,
            release: release_rx,
        };
        (sleeper, entered_rx, release_tx)
    }
}

impl Sleeper for GateSleeper {
    fn sleep(&self, _duration: Duration) {
        let _ = self.entered.send(());
        let _ = self.release.recv();
    }
}
