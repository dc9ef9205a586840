//! Timer-driven "recent purchase" notification presenter.
//!
//! A mounted [`Presenter`] shows a randomly picked sample record after an
//! initial delay and then on a randomized cadence, hiding each one after a
//! fixed display duration. Dropping the presenter cancels every timer it
//! owns.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tracing::{debug, info};

use super::samples::{SampleRecord, SampleSource};
use super::scheduler::{Scheduler, TimerId, lock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenterTiming {
    pub initial_delay: Duration,
    pub display_duration: Duration,
    pub min_interval: Duration,
    pub max_interval: Duration,
}

impl Default for PresenterTiming {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(3),
            display_duration: Duration::from_secs(5),
            min_interval: Duration::from_secs(15),
            max_interval: Duration::from_secs(25),
        }
    }
}

impl PresenterTiming {
    /// Draws the delay before the next repeating show, uniformly from
    /// `[min_interval, max_interval]`.
    #[must_use]
    pub fn next_interval(&self) -> Duration {
        if self.max_interval <= self.min_interval {
            return self.min_interval;
        }
        rand::rng().random_range(self.min_interval..=self.max_interval)
    }

    /// Raises the interval bounds so a cycle is never replaced while its
    /// display duration is still running: `min_interval >= display_duration`
    /// and `max_interval >= min_interval`.
    #[must_use]
    pub fn normalized(self) -> Self {
        let min_interval = self.min_interval.max(self.display_duration);
        Self {
            min_interval,
            max_interval: self.max_interval.max(min_interval),
            ..self
        }
    }
}

/// Counters for completed show/hide transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresenterStats {
    pub shown: u64,
    pub hidden: u64,
}

#[derive(Default)]
struct PresenterState {
    current: Option<SampleRecord>,
    visible: bool,
    cycle: u64,
    pending_hide: Option<TimerId>,
    torn_down: bool,
    stats: PresenterStats,
}

struct Shared<S> {
    scheduler: Arc<S>,
    samples: Arc<dyn SampleSource>,
    timing: PresenterTiming,
    state: Mutex<PresenterState>,
    feed: watch::Sender<Option<SampleRecord>>,
}

impl<S: Scheduler> Shared<S> {
    fn show(self: &Arc<Self>) {
        let Some(record) = self.samples.pick() else {
            debug!("Sample source returned no record, skipping cycle");
            return;
        };

        let mut state = lock(&self.state);
        if state.torn_down {
            return;
        }

        // A new cycle supersedes one that is still on screen; that cycle
        // ends here instead of at its own hide.
        if let Some(previous) = state.pending_hide.take() {
            self.scheduler.cancel(previous);
            if state.visible {
                state.stats.hidden += 1;
            }
        }

        state.cycle += 1;
        let cycle = state.cycle;
        state.current = Some(record);
        state.visible = true;
        state.stats.shown += 1;
        self.feed.send_replace(Some(record));

        let weak = Arc::downgrade(self);
        let hide_id = self.scheduler.schedule_once(
            self.timing.display_duration,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.hide(cycle);
                }
            }),
        );
        state.pending_hide = Some(hide_id);

        info!(
            record_id = record.id,
            product = record.product,
            location = record.location,
            cycle,
            "Showing purchase notification"
        );
    }

    fn hide(&self, cycle: u64) {
        let mut state = lock(&self.state);
        if state.torn_down || state.cycle != cycle || !state.visible {
            return;
        }
        state.visible = false;
        state.pending_hide = None;
        state.stats.hidden += 1;
        self.feed.send_replace(None);
        debug!(cycle, "Hid purchase notification");
    }
}

pub struct Presenter<S: Scheduler> {
    shared: Arc<Shared<S>>,
    initial_timer: TimerId,
    repeating_timer: TimerId,
}

impl<S: Scheduler> Presenter<S> {
    /// Starts the initial-delay timer and the repeating timer.
    ///
    /// Nothing is visible until the first timer fires. `timing` is
    /// [normalized](PresenterTiming::normalized) first.
    pub fn mount(scheduler: Arc<S>, samples: Arc<dyn SampleSource>, timing: PresenterTiming) -> Self {
        let timing = timing.normalized();
        let (feed, _) = watch::channel(None);
        let shared = Arc::new(Shared {
            scheduler: Arc::clone(&scheduler),
            samples,
            timing,
            state: Mutex::new(PresenterState::default()),
            feed,
        });

        let initial_timer = {
            let weak = Arc::downgrade(&shared);
            scheduler.schedule_once(
                timing.initial_delay,
                Box::new(move || {
                    if let Some(shared) = weak.upgrade() {
                        shared.show();
                    }
                }),
            )
        };

        let repeating_timer = {
            let weak = Arc::downgrade(&shared);
            scheduler.schedule_repeating(
                Box::new(move || timing.next_interval()),
                Box::new(move || {
                    if let Some(shared) = weak.upgrade() {
                        shared.show();
                    }
                }),
            )
        };

        debug!(?timing, "Mounted purchase notification presenter");

        Self {
            shared,
            initial_timer,
            repeating_timer,
        }
    }

    /// The record to render, or `None` when nothing should be drawn.
    #[must_use]
    pub fn visible_record(&self) -> Option<SampleRecord> {
        let state = lock(&self.shared.state);
        if state.visible { state.current } else { None }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        lock(&self.shared.state).visible
    }

    /// Most recently selected record, whether or not it is still visible.
    #[must_use]
    pub fn current_record(&self) -> Option<SampleRecord> {
        lock(&self.shared.state).current
    }

    #[must_use]
    pub fn stats(&self) -> PresenterStats {
        lock(&self.shared.state).stats
    }

    /// Feed of the visible record; `None` while hidden. Closes on teardown.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<SampleRecord>> {
        self.shared.feed.subscribe()
    }

    /// Tears the presenter down, cancelling all of its timers.
    pub fn unmount(self) {
        drop(self);
    }
}

impl<S: Scheduler> Drop for Presenter<S> {
    fn drop(&mut self) {
        let pending_hide = {
            let mut state = lock(&self.shared.state);
            state.torn_down = true;
            state.visible = false;
            state.pending_hide.take()
        };

        let scheduler = &self.shared.scheduler;
        scheduler.cancel(self.initial_timer);
        scheduler.cancel(self.repeating_timer);
        if let Some(id) = pending_hide {
            scheduler.cancel(id);
        }
        debug!("Unmounted purchase notification presenter");
    }
}
