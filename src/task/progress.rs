//! Build progress reporting

use tokio::sync::watch;
use crate::error::BuildError;
use super::cancel::CancelListener;

/// Stage a build is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildPhase {
    #[default]
    Pending,
    /// Indexing sources and expanding keys (join)
    Planning,
    /// Applying the join policy per key
    Filtering,
    /// Appending source records (union)
    Concatenating,
    Completed,
    Cancelled,
    Failed,
}

impl BuildPhase {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            BuildPhase::Completed | BuildPhase::Cancelled | BuildPhase::Failed
        )
    }
}

/// Snapshot of build progress: a counter within the current phase and its total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildProgress {
    pub phase: BuildPhase,
    pub completed: usize,
    pub total: usize,
}

impl BuildProgress {
    /// Fraction of the current phase that is done, in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            if self.phase.is_finished() { 1.0 } else { 0.0 }
        } else {
            (self.completed.min(self.total)) as f64 / self.total as f64
        }
    }
}

/// Writer side of the progress channel
#[derive(Debug)]
pub struct ProgressReporter {
    sender: watch::Sender<BuildProgress>,
}

impl ProgressReporter {
    pub fn new(sender: watch::Sender<BuildProgress>) -> Self {
        Self { sender }
    }

    /// A reporter nobody listens to
    pub fn detached() -> Self {
        let (tx, _) = watch::channel(BuildProgress::default());
        Self { sender: tx }
    }

    /// Enter `phase` with a known total; the counter restarts at zero
    pub fn start(&self, phase: BuildPhase, total: usize) {
        self.sender.send_modify(|p| {
            *p = BuildProgress {
                phase,
                completed: 0,
                total,
            }
        });
    }

    pub fn advance(&self, n: usize) {
        self.sender.send_modify(|p| p.completed += n);
    }

    /// Mark the build finished, keeping the last counter values
    pub fn finish(&self, phase: BuildPhase) {
        self.sender.send_modify(|p| p.phase = phase);
    }

    pub fn snapshot(&self) -> BuildProgress {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<BuildProgress> {
        self.sender.subscribe()
    }
}

/// What a build loop needs from its runner: progress and cancellation
#[derive(Debug)]
pub struct BuildContext {
    cancel: CancelListener,
    progress: ProgressReporter,
}

impl BuildContext {
    pub fn new(cancel: CancelListener, progress: ProgressReporter) -> Self {
        Self { cancel, progress }
    }

    /// Context for a foreground build: never cancelled, progress discarded
    pub fn detached() -> Self {
        Self::new(CancelListener::never(), ProgressReporter::detached())
    }

    pub fn progress(&self) -> &ProgressReporter {
        &self.progress
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Count one unit of work, then stop if cancellation was requested
    pub fn checkpoint(&self) -> Result<(), BuildError> {
        self.progress.advance(1);
        if self.cancel.is_cancelled() {
            return Err(BuildError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_within_phase() {
        let mut p = BuildProgress {
            phase: BuildPhase::Planning,
            completed: 3,
            total: 4,
        };
        assert_eq!(p.fraction(), 0.75);
        p.completed = 9;
        assert_eq!(p.fraction(), 1.0);
    }

    #[test]
    fn test_fraction_of_empty_phase() {
        let running = BuildProgress {
            phase: BuildPhase::Filtering,
            completed: 0,
            total: 0,
        };
        assert_eq!(running.fraction(), 0.0);
        let done = BuildProgress {
            phase: BuildPhase::Completed,
            ..running
        };
        assert_eq!(done.fraction(), 1.0);
    }

    #[test]
    fn test_start_resets_counter() {
        let reporter = ProgressReporter::detached();
        reporter.start(BuildPhase::Planning, 10);
        reporter.advance(4);
        reporter.start(BuildPhase::Filtering, 2);
        let snapshot = reporter.snapshot();
        assert_eq!(snapshot.phase, BuildPhase::Filtering);
        assert_eq!((snapshot.completed, snapshot.total), (0, 2));
    }
}
