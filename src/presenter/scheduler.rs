//! Timer scheduling for the notification presenter.
//!
//! [`TokioScheduler`] runs timers as tokio tasks. [`ManualScheduler`] keeps a
//! virtual clock that only moves when told to, so presenter cycles can be
//! driven deterministically.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;
use tracing::trace;

/// Shortest period a repeating timer may have.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

pub type OnceTask = Box<dyn FnOnce() + Send + 'static>;
pub type RepeatingTask = Box<dyn FnMut() + Send + 'static>;

/// Produces the delay before each run of a repeating timer. Called once per
/// cycle, so a randomized cadence drifts from cycle to cycle.
pub type Cadence = Box<dyn FnMut() -> Duration + Send + 'static>;

pub trait Scheduler: Send + Sync + 'static {
    fn schedule_once(&self, delay: Duration, task: OnceTask) -> TimerId;

    fn schedule_repeating(&self, cadence: Cadence, task: RepeatingTask) -> TimerId;

    /// Cancels a timer. Unknown or already-fired ids are ignored.
    fn cancel(&self, id: TimerId);
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Tokio-backed scheduler
// ============================================================================

pub struct TokioScheduler {
    runtime: Handle,
    next_id: AtomicU64,
    timers: Mutex<HashMap<TimerId, JoinHandle<()>>>,
}

impl TokioScheduler {
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: AtomicU64::new(1),
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// Binds to the runtime of the calling context.
    ///
    /// # Errors
    ///
    /// Fails when called outside a tokio runtime.
    pub fn current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::new)
    }

    /// Number of timers that have not yet finished or been cancelled.
    pub fn active(&self) -> usize {
        let mut timers = lock(&self.timers);
        timers.retain(|_, handle| !handle.is_finished());
        timers.len()
    }

    fn track(&self, handle: JoinHandle<()>) -> TimerId {
        let id = TimerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut timers = lock(&self.timers);
        timers.retain(|_, h| !h.is_finished());
        timers.insert(id, handle);
        id
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration, task: OnceTask) -> TimerId {
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        self.track(handle)
    }

    fn schedule_repeating(&self, cadence: Cadence, task: RepeatingTask) -> TimerId {
        let mut cadence = cadence;
        let mut task = task;
        let handle = self.runtime.spawn(async move {
            loop {
                tokio::time::sleep(cadence().max(MIN_PERIOD)).await;
                task();
            }
        });
        self.track(handle)
    }

    fn cancel(&self, id: TimerId) {
        if let Some(handle) = lock(&self.timers).remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in lock(&self.timers).drain() {
            handle.abort();
        }
    }
}

// ============================================================================
// Virtual-clock scheduler
// ============================================================================

enum EntryKind {
    Once(OnceTask),
    Repeating {
        cadence: Cadence,
        task: RepeatingTask,
    },
}

struct Entry {
    id: TimerId,
    due: Duration,
    seq: u64,
    kind: EntryKind,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    entries: Vec<Entry>,
    running: Option<TimerId>,
    running_cancelled: bool,
}

impl Clock {
    fn push(&mut self, id: TimerId, due: Duration, kind: EntryKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { id, due, seq, kind });
    }

    fn allocate_id(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }
}

/// Scheduler over a virtual clock starting at zero.
///
/// Timers due at the same instant fire in the order they were scheduled.
/// Callbacks may schedule and cancel timers, but must not advance the clock.
#[derive(Default)]
pub struct ManualScheduler {
    clock: Mutex<Clock>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        lock(&self.clock).now
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        lock(&self.clock).entries.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        lock(&self.clock).entries.iter().map(|e| e.due).min()
    }

    /// Moves the clock forward by `by`, firing every timer that comes due on
    /// the way. Returns how many callbacks ran. The clock saturates at
    /// `Duration::MAX`.
    pub fn advance(&self, by: Duration) -> usize {
        let target = deadline(self.now(), by);
        let mut fired = 0;
        while self.fire_next_due(target) {
            fired += 1;
        }
        let mut clock = lock(&self.clock);
        clock.now = clock.now.max(target);
        fired
    }

    /// Jumps to the earliest deadline and fires that single timer. Returns
    /// the new virtual time, or `None` when nothing is scheduled.
    pub fn advance_to_next(&self) -> Option<Duration> {
        let due = self.next_deadline()?;
        self.fire_next_due(due);
        Some(due)
    }

    fn fire_next_due(&self, limit: Duration) -> bool {
        let entry = {
            let mut clock = lock(&self.clock);
            let Some(idx) = clock
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.due <= limit)
                .min_by_key(|(_, e)| (e.due, e.seq))
                .map(|(i, _)| i)
            else {
                return false;
            };
            let entry = clock.entries.swap_remove(idx);
            clock.now = clock.now.max(entry.due);
            clock.running = Some(entry.id);
            clock.running_cancelled = false;
            entry
        };

        trace!(timer = entry.id.0, due = ?entry.due, "Firing virtual timer");

        match entry.kind {
            EntryKind::Once(task) => {
                task();
                lock(&self.clock).running = None;
            }
            EntryKind::Repeating {
                mut cadence,
                mut task,
            } => {
                task();
                let period = cadence().max(MIN_PERIOD);
                let mut clock = lock(&self.clock);
                let cancelled = clock.running_cancelled;
                clock.running = None;
                // A period past the end of the clock can never come due.
                match clock.now.checked_add(period) {
                    Some(due) if !cancelled => {
                        clock.push(entry.id, due, EntryKind::Repeating { cadence, task });
                    }
                    _ => {}
                }
            }
        }
        true
    }
}

fn deadline(now: Duration, delay: Duration) -> Duration {
    now.checked_add(delay).unwrap_or(Duration::MAX)
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay: Duration, task: OnceTask) -> TimerId {
        let mut clock = lock(&self.clock);
        let id = clock.allocate_id();
        let due = deadline(clock.now, delay);
        clock.push(id, due, EntryKind::Once(task));
        id
    }

    fn schedule_repeating(&self, cadence: Cadence, task: RepeatingTask) -> TimerId {
        let mut cadence = cadence;
        let period = cadence().max(MIN_PERIOD);
        let mut clock = lock(&self.clock);
        let id = clock.allocate_id();
        let due = deadline(clock.now, period);
        clock.push(id, due, EntryKind::Repeating { cadence, task });
        id
    }

    fn cancel(&self, id: TimerId) {
        let mut clock = lock(&self.clock);
        clock.entries.retain(|e| e.id != id);
        if clock.running == Some(id) {
            clock.running_cancelled = true;
        }
    }
}
