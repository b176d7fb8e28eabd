use std::time::Duration;

use tokio::runtime::Handle;

use super::{Callback, CancelHandle, Scheduler};

/// Runs callbacks on a tokio runtime.
///
/// Each scheduled callback is a task that sleeps for the delay and then
/// runs the callback. Cancelling aborts the task.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    /// Schedule onto the runtime behind `runtime`.
    pub fn new(runtime: Handle) -> Self {
        TokioScheduler { runtime }
    }

    /// Schedule onto the runtime the caller is running in, if any.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(TokioScheduler::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, callback: Callback) -> CancelHandle {
        let handle = CancelHandle::new();
        let task_handle = handle.clone();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if task_handle.settle() {
                callback();
            }
        });
        handle.set_on_cancel(Box::new(move || task.abort()));
        handle
    }
}
