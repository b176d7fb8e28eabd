//! Deferred execution.
//!
//! Handlers must return promptly, so anything that has to happen later goes
//! through a [`Scheduler`]. Two implementations are provided:
//!
//! - [`TimerTable`] keeps callbacks in a table keyed by id and fires them
//!   when the host says so, or when its virtual clock is advanced.
//! - `TokioScheduler` (feature `tokio`) sleeps on the tokio runtime.
//!
//! Every scheduled callback comes with a [`CancelHandle`]. A callback is
//! settled exactly once: either it fires or it is cancelled.

mod timer_table;
#[cfg(feature = "tokio")]
mod runtime;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

pub use self::timer_table::{TimerId, TimerTable};
#[cfg(feature = "tokio")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
pub use self::runtime::TokioScheduler;

/// A callback waiting to run.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

type CancelHook = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run a callback after a delay.
pub trait Scheduler {
    /// Run `callback` once `delay` has elapsed, unless cancelled first.
    fn schedule(&self, delay: Duration, callback: Callback) -> CancelHandle;
}

struct Shared {
    settled: AtomicBool,
    on_cancel: Mutex<Option<CancelHook>>,
}

/// Cancels one scheduled callback.
///
/// Clones refer to the same callback. Cancelling a callback that already
/// fired or was already cancelled does nothing.
#[derive(Clone)]
pub struct CancelHandle {
    shared: Arc<Shared>,
}

impl CancelHandle {
    pub(crate) fn new() -> Self {
        CancelHandle {
            shared: Arc::new(Shared {
                settled: AtomicBool::new(false),
                on_cancel: Mutex::new(None),
            }),
        }
    }

    /// Install the action that tears down the pending callback.
    pub(crate) fn set_on_cancel(&self, hook: CancelHook) {
        *self
            .shared
            .on_cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(hook);
    }

    /// Claim the callback for firing. Returns `false` if it was already
    /// settled.
    pub(crate) fn settle(&self) -> bool {
        let first = !self.shared.settled.swap(true, Ordering::AcqRel);
        if first {
            self.take_hook();
        }
        first
    }

    /// Cancel the callback.
    ///
    /// Returns `true` if this call cancelled it, `false` if it had already
    /// fired or been cancelled.
    pub fn cancel(&self) -> bool {
        if self.shared.settled.swap(true, Ordering::AcqRel) {
            return false;
        }
        if let Some(hook) = self.take_hook() {
            hook();
        }
        true
    }

    /// Whether the callback has fired or been cancelled.
    pub fn is_settled(&self) -> bool {
        self.shared.settled.load(Ordering::Acquire)
    }

    fn take_hook(&self) -> Option<CancelHook> {
        self.shared
            .on_cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("settled", &self.is_settled())
            .finish()
    }
}
