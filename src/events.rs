use serde::{Deserialize, Serialize};

/// Status update or outcome sent from a worker to its poller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Progress { percent: f64, message: String },
    Warning { message: String },
    Error { message: String },
    Info { message: String },
    /// Sole authoritative end-of-operation signal.
    Done,
}

impl ProgressEvent {
    /// Progress for `processed` of `total` items.
    pub fn progress(processed: usize, total: usize, message: impl Into<String>) -> Self {
        let percent = if total == 0 {
            100.0
        } else {
            processed as f64 / total as f64 * 100.0
        };
        ProgressEvent::Progress {
            percent,
            message: message.into(),
        }
    }

    /// Warning, Error and Info close out an operation before Done.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProgressEvent::Warning { .. } | ProgressEvent::Error { .. } | ProgressEvent::Info { .. }
        )
    }
}
