use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, MoveError};
use crate::model::MoveRecord;
use crate::mover::SafeMover;

pub const DEFAULT_LEDGER_FILE: &str = "undo_ledger.jsonl";

/// A record whose reversal failed; it stays in the ledger.
#[derive(Debug)]
pub struct ReverseFailure {
    pub record: MoveRecord,
    pub error: MoveError,
}

/// Ordered record of confirmed moves that have not been reversed yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoLedger {
    records: Vec<MoveRecord>,
}

impl UndoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<MoveRecord>) -> Self {
        Self { records }
    }

    /// Append a confirmed move.
    ///
    /// A move onto a path an older record still names replaced that file, so
    /// the older record is dropped.
    pub fn record(&mut self, record: MoveRecord) {
        self.records.retain(|existing| existing.current != record.current);
        self.records.push(record);
    }

    /// Put records back after a partial reversal, ahead of anything recorded
    /// since they were taken.
    pub fn restore(&mut self, outstanding: UndoLedger) {
        let newer = std::mem::replace(&mut self.records, outstanding.records);
        for record in newer {
            self.record(record);
        }
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Move every recorded file back, in recorded order.
    ///
    /// Each record is dropped only if its reversal succeeds, so a later call
    /// retries exactly what is still outstanding. `on_processed` is called
    /// after each record with `(processed, total)`.
    pub fn reverse(
        &mut self,
        mover: &SafeMover,
        mut on_processed: impl FnMut(usize, usize),
    ) -> Vec<ReverseFailure> {
        let pending = std::mem::take(&mut self.records);
        let total = pending.len();
        let mut failures = Vec::new();

        for (index, record) in pending.into_iter().enumerate() {
            match mover.move_file(&record.current, &record.original) {
                Ok(_) => {
                    tracing::debug!(
                        from = %record.current.display(),
                        to = %record.original.display(),
                        "reversed move"
                    );
                }
                Err(error) => {
                    tracing::warn!(file = %record.current.display(), error = %error, "could not reverse move");
                    self.records.push(record.clone());
                    failures.push(ReverseFailure { record, error });
                }
            }
            on_processed(index + 1, total);
        }
        failures
    }
}

/// NDJSON file holding the outstanding records between processes.
pub struct LedgerFile {
    path: PathBuf,
}

impl LedgerFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the ledger; a missing file is an empty ledger.
    pub fn load(&self) -> Result<UndoLedger, LedgerError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(UndoLedger::new()),
            Err(source) => {
                return Err(LedgerError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let records = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|source| LedgerError::Parse {
                    line: index + 1,
                    source,
                })
            })
            .collect::<Result<Vec<MoveRecord>, _>>()?;
        Ok(UndoLedger::from_records(records))
    }

    /// Replace the file with the given ledger, or delete it when empty.
    pub fn save(&self, ledger: &UndoLedger) -> Result<(), LedgerError> {
        let io_err = |source| LedgerError::Io {
            path: self.path.clone(),
            source,
        };
        if ledger.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(io_err(e)),
                _ => Ok(()),
            };
        }

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        for record in ledger.records() {
            let line = serde_json::to_string(record)?;
            writeln!(tmp, "{}", line).map_err(io_err)?;
        }
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}
