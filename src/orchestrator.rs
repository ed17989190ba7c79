use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytesize::ByteSize;
use path_absolutize::Absolutize;
use walkdir::WalkDir;

use crate::channel::ProgressSender;
use crate::classify::classify;
use crate::config::{GrouperConfig, TestImageConfig, progress_due};
use crate::generate::{test_image_spec, write_test_image};
use crate::ledger::UndoLedger;
use crate::model::{MoveRecord, is_supported_image};
use crate::mover::SafeMover;

/// Sends `Done` when dropped, so every operation ends with it even if the
/// worker panics. A panic is reported as an `Error` first.
struct FinishGuard<'a>(&'a ProgressSender);

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::error!("worker panicked");
            self.0.error("Operation failed unexpectedly");
        }
        self.0.done();
    }
}

/// Runs group, undo and test-image batches. Each method runs synchronously on
/// the calling thread and reports only through `events`.
#[derive(Debug)]
pub struct BatchOrchestrator {
    config: GrouperConfig,
    mover: SafeMover,
    ledger: Mutex<UndoLedger>,
}

impl BatchOrchestrator {
    pub fn new(config: GrouperConfig) -> Self {
        Self::with_mover(config, SafeMover::new(config.retry))
    }

    pub fn with_mover(config: GrouperConfig, mover: SafeMover) -> Self {
        Self {
            config,
            mover,
            ledger: Mutex::new(UndoLedger::new()),
        }
    }

    /// Start from previously recorded, still outstanding moves.
    pub fn with_ledger(self, ledger: UndoLedger) -> Self {
        Self {
            ledger: Mutex::new(ledger),
            ..self
        }
    }

    pub fn config(&self) -> &GrouperConfig {
        &self.config
    }

    /// Copy of the current ledger. Records an undo is reversing right now are
    /// not part of it.
    pub fn ledger_snapshot(&self) -> UndoLedger {
        self.lock_ledger().clone()
    }

    fn lock_ledger(&self) -> MutexGuard<'_, UndoLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sort every supported image in `pool` into `horizontal` or `vertical`.
    pub fn run(&self, pool: &Path, horizontal: &Path, vertical: &Path, events: &ProgressSender) {
        let _finish = FinishGuard(events);

        if [pool, horizontal, vertical]
            .iter()
            .any(|path| path.as_os_str().is_empty())
        {
            events.error("Please select all folders");
            return;
        }
        let (pool, horizontal, vertical) =
            match (absolute(pool), absolute(horizontal), absolute(vertical)) {
                (Ok(pool), Ok(horizontal), Ok(vertical)) => (pool, horizontal, vertical),
                (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                    events.error(format!("Invalid folder path: {e}"));
                    return;
                }
            };

        let images = match list_images(&pool) {
            Ok(images) => images,
            Err(e) => {
                events.error(format!("Cannot read Pool folder {}: {e}", pool.display()));
                return;
            }
        };
        let total = images.len();
        if total == 0 {
            events.warning("No image files found in Pool folder");
            return;
        }

        tracing::info!(pool = %pool.display(), total, "grouping images");
        let mut errors = Vec::new();
        let mut moved = 0usize;
        let mut bytes = 0u64;

        for (index, src) in images.iter().enumerate() {
            match self.group_one(src, &horizontal, &vertical) {
                Ok((record, copied)) => {
                    self.lock_ledger().record(record);
                    moved += 1;
                    bytes += copied;
                }
                Err(message) => errors.push(message),
            }

            let processed = index + 1;
            if progress_due(processed, total, self.config.batch_size) {
                events.progress(processed, total, format!("Processing: {processed}/{total} files"));
            }
        }

        tracing::info!(
            moved,
            failed = errors.len(),
            bytes = %ByteSize::b(bytes),
            "grouping finished"
        );
        if errors.is_empty() {
            events.info("Images grouped successfully!");
        } else {
            events.warning(errors.join("\n"));
        }
    }

    /// Classify and move one file, returning its ledger record and the bytes
    /// copied, or the user-facing error message.
    fn group_one(&self, src: &Path, horizontal: &Path, vertical: &Path) -> Result<(MoveRecord, u64), String> {
        let name = file_name(src);
        let (destination, _) = classify(src).map_err(|e| {
            tracing::warn!(file = %src.display(), error = %e, "skipping unreadable image");
            format!("Error processing {name}: {e}")
        })?;

        let dst = destination.select(horizontal, vertical).join(&name);
        let outcome = self.mover.move_file(src, &dst).map_err(|e| {
            tracing::warn!(file = %src.display(), error = %e, "move failed");
            format!("Could not move {name}")
        })?;
        Ok((MoveRecord::new(dst, src), outcome.bytes_copied))
    }

    /// Move every outstanding ledger record back to where it came from.
    pub fn undo(&self, events: &ProgressSender) {
        let _finish = FinishGuard(events);

        let mut pending = std::mem::take(&mut *self.lock_ledger());
        if pending.is_empty() {
            events.info("Nothing to undo");
            return;
        }

        tracing::info!(records = pending.len(), "undoing moves");
        let batch_size = self.config.batch_size;
        let failures = pending.reverse(&self.mover, |processed, total| {
            if progress_due(processed, total, batch_size) {
                events.progress(processed, total, format!("Undoing: {processed}/{total} files"));
            }
        });
        self.lock_ledger().restore(pending);

        if failures.is_empty() {
            events.info("Undo completed successfully!");
        } else {
            let messages: Vec<String> = failures
                .iter()
                .map(|failure| format!("Could not move back {}", failure.record.display_name()))
                .collect();
            events.warning(messages.join("\n"));
        }
    }

    /// Write sample landscape and portrait PNGs into `pool`.
    pub fn generate_test_images(&self, pool: &Path, events: &ProgressSender) {
        let _finish = FinishGuard(events);

        if pool.as_os_str().is_empty() {
            events.error("Please select Pool folder first");
            return;
        }

        let TestImageConfig { count, batch_size } = self.config.test_images;
        let mut errors = Vec::new();
        for index in 0..count {
            let (path, size) = test_image_spec(pool, index, count);
            if let Err(e) = write_test_image(&path, size) {
                tracing::warn!(path = %path.display(), error = %e, "could not write test image");
                errors.push(format!("Could not write {}: {e}", file_name(&path)));
            }

            let processed = index + 1;
            if progress_due(processed, count, batch_size) {
                events.progress(processed, count, format!("Generating: {processed}/{count} images"));
            }
        }

        if errors.is_empty() {
            events.info("Test images generated in Pool folder!");
        } else {
            events.warning(errors.join("\n"));
        }
    }
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    Ok(path.absolutize()?.into_owned())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Supported images directly inside `pool`, sorted by file name.
fn list_images(pool: &Path) -> walkdir::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in WalkDir::new(pool).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported_image(entry.path()) {
            images.push(entry.into_path());
        }
    }
    Ok(images)
}
