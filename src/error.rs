use std::path::PathBuf;
use thiserror::Error;

use crate::mover::Fallback;

/// The file could not be decoded as an image. Never retried.
#[derive(Debug, Error)]
#[error("cannot read image {}: {source}", .path.display())]
pub struct ClassifyError {
    pub path: PathBuf,
    #[source]
    pub source: image::ImageError,
}

/// A move or remove that still failed after every attempt.
#[derive(Debug, Error)]
pub enum MoveError {
    #[error("could not move {} to {} after {attempts} attempt(s): {source}", .src.display(), .dst.display())]
    Move {
        src: PathBuf,
        dst: PathBuf,
        attempts: u32,
        fallbacks: Vec<Fallback>,
        #[source]
        source: std::io::Error,
    },
    #[error("could not remove {} after {attempts} attempt(s): {source}", .path.display())]
    Remove {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },
    #[error("source and destination are the same path: {}", .path.display())]
    SamePath { path: PathBuf },
}

impl MoveError {
    /// Number of attempts made before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            MoveError::Move { attempts, .. } | MoveError::Remove { attempts, .. } => *attempts,
            MoveError::SamePath { .. } => 0,
        }
    }

    /// Fallback branches taken across all attempts.
    pub fn fallbacks(&self) -> &[Fallback] {
        match self {
            MoveError::Move { fallbacks, .. } => fallbacks,
            _ => &[],
        }
    }
}

/// Refusals from the worker launcher.
#[derive(Debug, Error)]
pub enum GrouperError {
    #[error("operation in progress, please wait")]
    Busy,
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to access ledger file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid ledger line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize ledger record: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid session file {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
