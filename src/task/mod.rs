//! Background builds
//!
//! A build runs on Tokio's blocking pool so the caller stays responsive. The
//! caller keeps a `BuildTask`: it can watch progress, request cancellation,
//! and await the result. The build loop itself only sees a `BuildContext`.

mod cancel;
mod progress;

pub use cancel::{cancellation, CancelHandle, CancelListener};
pub use progress::{BuildContext, BuildPhase, BuildProgress, ProgressReporter};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use crate::error::BuildError;

/// A build running in the background
#[derive(Debug)]
pub struct BuildTask<T> {
    handle: JoinHandle<Result<T, BuildError>>,
    cancel: CancelHandle,
    progress: watch::Receiver<BuildProgress>,
}

impl<T: Send + 'static> BuildTask<T> {
    /// Run `work` on the current runtime's blocking pool.
    ///
    /// Fails with `BuildError::NoRuntime` outside a Tokio runtime.
    pub fn spawn<F>(work: F) -> Result<Self, BuildError>
    where
        F: FnOnce(&BuildContext) -> Result<T, BuildError> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| BuildError::NoRuntime)?;
        Ok(Self::spawn_on(&runtime, work))
    }

    /// Run `work` on the blocking pool of `runtime`
    pub fn spawn_on<F>(runtime: &Handle, work: F) -> Self
    where
        F: FnOnce(&BuildContext) -> Result<T, BuildError> + Send + 'static,
    {
        let (cancel, listener) = cancellation();
        let (tx, progress) = watch::channel(BuildProgress::default());
        let reporter = ProgressReporter::new(tx);

        let handle = runtime.spawn_blocking(move || {
            let ctx = BuildContext::new(listener, reporter);
            let result = work(&ctx);
            let phase = match &result {
                Ok(_) => BuildPhase::Completed,
                Err(BuildError::Cancelled) => {
                    tracing::warn!("build cancelled");
                    BuildPhase::Cancelled
                }
                Err(e) => {
                    tracing::warn!(error = %e, "build failed");
                    BuildPhase::Failed
                }
            };
            ctx.progress().finish(phase);
            result
        });

        Self {
            handle,
            cancel,
            progress,
        }
    }
}

impl<T> BuildTask<T> {
    /// Request cooperative cancellation; the build stops at its next checkpoint
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Receiver for progress updates
    pub fn progress(&self) -> watch::Receiver<BuildProgress> {
        self.progress.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the build to end
    pub async fn wait(self) -> Result<T, BuildError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(BuildError::TaskFailed(e.to_string())),
        }
    }
}
