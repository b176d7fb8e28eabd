use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tracing::trace;

use super::{Callback, CancelHandle, Scheduler};

/// Key of a pending timer in a [`TimerTable`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TimerId(u64);

impl TimerId {
    /// The raw id, for handing to a host timer API.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

struct Entry {
    deadline: Duration,
    callback: Callback,
    handle: CancelHandle,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    now: Duration,
    entries: BTreeMap<TimerId, Entry>,
}

/// Host-driven timer table.
///
/// [`schedule`](Scheduler::schedule) files the callback under a fresh
/// [`TimerId`]. A host with its own one-shot timers arms one per id and
/// calls [`fire`](TimerTable::fire) when it elapses. Without such a host,
/// [`advance`](TimerTable::advance) moves a virtual clock forward and fires
/// everything that came due.
///
/// Callbacks never run while the table is locked, so they may schedule or
/// cancel other timers.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
/// use slirc_hooks::{Scheduler, TimerTable};
///
/// let table = TimerTable::new();
/// let fired = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&fired);
/// table.schedule(Duration::from_secs(5), Box::new(move || flag.store(true, Ordering::SeqCst)));
///
/// table.advance(Duration::from_secs(4));
/// assert!(!fired.load(Ordering::SeqCst));
/// table.advance(Duration::from_secs(1));
/// assert!(fired.load(Ordering::SeqCst));
/// ```
#[derive(Clone, Default)]
pub struct TimerTable {
    inner: Arc<Mutex<Inner>>,
}

impl TimerTable {
    /// Create an empty table with its clock at zero.
    pub fn new() -> Self {
        TimerTable::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Schedule `callback` and return its id along with the cancel handle.
    pub fn schedule_with_id(&self, delay: Duration, callback: Callback) -> (TimerId, CancelHandle) {
        let handle = CancelHandle::new();
        let id = {
            let mut inner = self.lock();
            let id = TimerId(inner.next_id);
            inner.next_id += 1;
            let deadline = inner.now + delay;
            inner.entries.insert(
                id,
                Entry {
                    deadline,
                    callback,
                    handle: handle.clone(),
                },
            );
            id
        };

        let table: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        handle.set_on_cancel(Box::new(move || {
            if let Some(table) = table.upgrade() {
                table
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .entries
                    .remove(&id);
            }
        }));

        trace!(timer = %id, ?delay, "timer scheduled");
        (id, handle)
    }

    /// Fire the timer `id` now, whatever its deadline.
    ///
    /// Returns `false` if the id is unknown, already fired or cancelled.
    pub fn fire(&self, id: TimerId) -> bool {
        let entry = self.lock().entries.remove(&id);
        match entry {
            Some(entry) => run(id, entry),
            None => false,
        }
    }

    /// Move the clock forward by `by`, firing due timers in deadline order.
    ///
    /// Timers scheduled by a firing callback are measured from that
    /// callback's deadline and fire in the same call if they come due.
    /// Returns how many callbacks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.lock().now + by;
        let mut fired = 0;

        loop {
            let next = {
                let mut inner = self.lock();
                let due = inner
                    .entries
                    .iter()
                    .filter(|(_, entry)| entry.deadline <= target)
                    .min_by_key(|(id, entry)| (entry.deadline, **id))
                    .map(|(id, _)| *id);
                match due {
                    Some(id) => inner.entries.remove(&id).map(|entry| {
                        inner.now = inner.now.max(entry.deadline);
                        (id, entry)
                    }),
                    None => {
                        inner.now = target;
                        None
                    }
                }
            };

            match next {
                Some((id, entry)) => {
                    if run(id, entry) {
                        fired += 1;
                    }
                }
                None => return fired,
            }
        }
    }

    /// The virtual clock.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether `id` is still waiting to fire.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.lock().entries.contains_key(&id)
    }
}

fn run(id: TimerId, entry: Entry) -> bool {
    if !entry.handle.settle() {
        return false;
    }
    trace!(timer = %id, "timer fired");
    (entry.callback)();
    true
}

impl Scheduler for TimerTable {
    fn schedule(&self, delay: Duration, callback: Callback) -> CancelHandle {
        self.schedule_with_id(delay, callback).1
    }
}

impl fmt::Debug for TimerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("TimerTable")
            .field("now", &inner.now)
            .field("pending", &inner.entries.len())
            .finish()
    }
}
