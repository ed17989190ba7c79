#![allow(dead_code)]

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use image::{Rgb, RgbImage};
use imgroup::fsops::{FileOps, Sleeper, StdFileOps};

/// Filesystem where locked paths can be neither deleted nor overwritten.
/// Same rule as the unit-test `LockedFs` in `src/test_support.rs`.
pub struct LockedFs {
    locked: Mutex<HashSet<PathBuf>>,
}

impl LockedFs {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            locked: Mutex::new(paths.into_iter().collect()),
        }
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

pub struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _duration: Duration) {}
}

pub struct Dirs {
    pub root: tempfile::TempDir,
    pub pool: PathBuf,
    pub horizontal: PathBuf,
    pub vertical: PathBuf,
}

pub fn dirs() -> Dirs {
    let root = tempfile::tempdir().unwrap();
    let pool = root.path().join("pool");
    let horizontal = root.path().join("horizontal");
    let vertical = root.path().join("vertical");
    for dir in [&pool, &horizontal, &vertical] {
        std::fs::create_dir(dir).unwrap();
    }
    Dirs {
        root,
        pool,
        horizontal,
        vertical,
    }
}

/// Write a solid PNG of the given size and return its bytes.
pub fn write_png(path: &Path, width: u32, height: u32) -> Vec<u8> {
    RgbImage::from_pixel(width, height, Rgb([10, 20, 30]))
        .save(path)
        .unwrap();
    std::fs::read(path).unwrap()
}
