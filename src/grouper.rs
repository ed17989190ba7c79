use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::channel::{ProgressReceiver, ProgressSender, progress_channel};
use crate::config::GrouperConfig;
use crate::error::GrouperError;
use crate::events::ProgressEvent;
use crate::ledger::UndoLedger;
use crate::orchestrator::BatchOrchestrator;
use crate::state::OperationState;

/// Fixed interval between polls of the progress channel.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Entry points for a caller that must stay responsive.
///
/// Each `start_*` call returns immediately after launching one worker thread.
/// Outcomes arrive only through [`ImageGrouper::poll`]; the grouper goes back
/// to idle when `poll` hands out the worker's `Done`.
pub struct ImageGrouper {
    orchestrator: Arc<BatchOrchestrator>,
    state: Arc<OperationState>,
    sender: ProgressSender,
    receiver: ProgressReceiver,
}

impl ImageGrouper {
    pub fn new(config: GrouperConfig) -> Self {
        Self::from_orchestrator(BatchOrchestrator::new(config))
    }

    pub fn from_orchestrator(orchestrator: BatchOrchestrator) -> Self {
        let (sender, receiver) = progress_channel();
        Self {
            orchestrator: Arc::new(orchestrator),
            state: Arc::new(OperationState::new()),
            sender,
            receiver,
        }
    }

    pub fn start_group(
        &self,
        pool: impl Into<PathBuf>,
        horizontal: impl Into<PathBuf>,
        vertical: impl Into<PathBuf>,
    ) -> Result<(), GrouperError> {
        let (pool, horizontal, vertical) = (pool.into(), horizontal.into(), vertical.into());
        self.spawn("group", move |orchestrator, events| {
            orchestrator.run(&pool, &horizontal, &vertical, events)
        })
    }

    pub fn start_undo(&self) -> Result<(), GrouperError> {
        self.spawn("undo", |orchestrator, events| orchestrator.undo(events))
    }

    pub fn start_generate_test_images(&self, pool: impl Into<PathBuf>) -> Result<(), GrouperError> {
        let pool = pool.into();
        self.spawn("generate", move |orchestrator, events| {
            orchestrator.generate_test_images(&pool, events)
        })
    }

    fn spawn<F>(&self, operation: &str, job: F) -> Result<(), GrouperError>
    where
        F: FnOnce(&BatchOrchestrator, &ProgressSender) + Send + 'static,
    {
        self.state.try_begin()?;
        let orchestrator = Arc::clone(&self.orchestrator);
        let events = self.sender.clone();
        let spawned = thread::Builder::new()
            .name(format!("imgroup-{operation}"))
            .spawn(move || job(&orchestrator, &events));
        if let Err(e) = spawned {
            self.state.end();
            return Err(GrouperError::Spawn(e));
        }
        tracing::debug!(operation, "worker started");
        Ok(())
    }

    /// Drain every queued event without blocking.
    pub fn poll(&self) -> Vec<ProgressEvent> {
        let events = self.receiver.drain();
        if events.contains(&ProgressEvent::Done) {
            self.state.end();
        }
        events
    }

    /// Poll at `interval` until the running operation reports `Done`.
    /// Returns at once when nothing is running.
    pub fn wait(&self, interval: Duration, mut on_event: impl FnMut(&ProgressEvent)) {
        while self.state.is_running() {
            for event in self.poll() {
                on_event(&event);
            }
            if self.state.is_running() {
                thread::sleep(interval);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Copy of the outstanding move records.
    pub fn ledger(&self) -> UndoLedger {
        self.orchestrator.ledger_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{LANDSCAPE, PORTRAIT, write_test_image};
    use crate::mover::{RetryPolicy, SafeMover};
    use crate::test_support::{GateSleeper, LockedFs};
    use tempfile::tempdir;

    fn collect(grouper: &ImageGrouper) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        grouper.wait(POLL_INTERVAL, |event| events.push(event.clone()));
        events
    }

    #[test]
    fn test_second_start_while_running_is_busy() {
        let dir = tempdir().unwrap();
        let grouper = ImageGrouper::new(GrouperConfig::default());
        grouper.start_generate_test_images(dir.path()).unwrap();

        assert!(matches!(grouper.start_undo(), Err(GrouperError::Busy)));

        let events = collect(&grouper);
        assert_eq!(events.last(), Some(&ProgressEvent::Done));
        assert!(!grouper.is_running());
        assert!(grouper.start_undo().is_ok());
        collect(&grouper);
    }

    #[test]
    fn test_state_stays_running_until_done_is_polled() {
        let grouper = ImageGrouper::new(GrouperConfig::default());
        grouper.start_undo().unwrap();

        // Give the worker time to finish; the flag still waits for the poller.
        thread::sleep(Duration::from_millis(100));
        assert!(grouper.is_running());

        let events = grouper.poll();
        assert_eq!(events.last(), Some(&ProgressEvent::Done));
        assert!(!grouper.is_running());
    }

    #[test]
    fn test_ledger_readable_while_batch_retries() {
        let dir = tempdir().unwrap();
        let (pool, horizontal, vertical) = (
            dir.path().join("pool"),
            dir.path().join("horizontal"),
            dir.path().join("vertical"),
        );
        for d in [&pool, &horizontal, &vertical] {
            std::fs::create_dir(d).unwrap();
        }
        write_test_image(&pool.join("a.png"), LANDSCAPE).unwrap();
        write_test_image(&pool.join("b.png"), PORTRAIT).unwrap();
        let (sleeper, entered, release) = GateSleeper::new();
        let mover = SafeMover::with_parts(
            RetryPolicy::default(),
            Arc::new(LockedFs::new([vertical.join("b.png")])),
            Arc::new(sleeper),
        );
        let grouper = ImageGrouper::from_orchestrator(BatchOrchestrator::with_mover(
            GrouperConfig::default(),
            mover,
        ));

        grouper.start_group(&pool, &horizontal, &vertical).unwrap();
        entered.recv_timeout(Duration::from_secs(10)).unwrap();

        // The worker is parked in a retry delay for b.png.
        let snapshot = grouper.ledger();
        assert!(grouper.is_running());
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.records()[0].current, horizontal.join("a.png"));

        drop(release);
        let events = collect(&grouper);
        assert!(events.contains(&ProgressEvent::Warning {
            message: "Could not move b.png".into()
        }));
        assert!(pool.join("b.png").exists());
    }

    #[test]
    fn test_wait_when_idle_returns_immediately() {
        let grouper = ImageGrouper::new(GrouperConfig::default());
        let mut seen = 0;
        grouper.wait(POLL_INTERVAL, |_| seen += 1);
        assert_eq!(seen, 0);
    }
}
