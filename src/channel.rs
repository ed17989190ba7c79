//! Progress channel between a batch worker and the thread polling it.
//!
//! Unbounded, so the worker never blocks on a slow poller; the volume is
//! bounded by the number of files in a batch.

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::events::ProgressEvent;

/// Create a connected sender/receiver pair.
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (ProgressSender { tx }, ProgressReceiver { rx })
}

#[derive(Debug, Clone)]
pub struct ProgressSender {
    tx: Sender<ProgressEvent>,
}

impl ProgressSender {
    /// Queue an event. If the poller has gone away the event is dropped.
    pub fn send(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("progress receiver dropped, discarding event");
        }
    }

    pub fn progress(&self, processed: usize, total: usize, message: impl Into<String>) {
        self.send(ProgressEvent::progress(processed, total, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.send(ProgressEvent::Info {
            message: message.into(),
        });
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.send(ProgressEvent::Warning {
            message: message.into(),
        });
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(ProgressEvent::Error {
            message: message.into(),
        });
    }

    pub fn done(&self) {
        self.send(ProgressEvent::Done);
    }
}

#[derive(Debug)]
pub struct ProgressReceiver {
    rx: Receiver<ProgressEvent>,
}

impl ProgressReceiver {
    /// Everything queued right now, without blocking.
    pub fn drain(&self) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}
