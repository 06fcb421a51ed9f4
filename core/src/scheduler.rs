use core::time::Duration;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

/// Timer firings the engine reacts to. They are scheduled through a
/// [`Scheduler`] and delivered back by whoever drives the engine: a UI message
/// loop in production, a test harness in tests.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// The preview window elapsed; targets must be concealed and play begins.
    PreviewElapsed,
    /// Periodic refresh of the elapsed-time display.
    Tick,
}

/// Monotonic clock plus one-shot and repeating timers, injected into the engine.
///
/// Dropping a handle cancels its timer; dropping an already-fired or
/// already-cancelled handle is a no-op, never an error.
pub trait Scheduler {
    type OneShot;
    type Repeating;

    /// Monotonic time since an arbitrary epoch.
    fn now(&self) -> Duration;

    /// Schedules `event` for delivery once, `delay` from now.
    fn once(&mut self, delay: Duration, event: TimerEvent) -> Self::OneShot;

    /// Schedules `event` for delivery every `period`, starting one period from now.
    fn repeating(&mut self, period: Duration, event: TimerEvent) -> Self::Repeating;
}

/// Deterministic [`Scheduler`] driven by hand, for tests and headless drivers.
///
/// Clones share one clock and timer table, so the engine can own one clone
/// while the driver advances another.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualInner>>,
}

#[derive(Debug, Default)]
struct ManualInner {
    now: Duration,
    next_id: u32,
    pending: Vec<PendingTimer>,
}

#[derive(Copy, Clone, Debug)]
struct PendingTimer {
    id: u32,
    due: Duration,
    period: Option<Duration>,
    event: TimerEvent,
}

impl ManualInner {
    fn schedule(&mut self, due: Duration, period: Option<Duration>, event: TimerEvent) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(PendingTimer {
            id,
            due,
            period,
            event,
        });
        id
    }

    /// Earliest timer due at or before `deadline`, if any.
    fn next_due(&self, deadline: Duration) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= deadline)
            .min_by_key(|(_, timer)| timer.due)
            .map(|(position, _)| position)
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `dt` and returns every event that became
    /// due, in firing order. Repeating timers are rescheduled as they fire.
    pub fn advance(&self, dt: Duration) -> Vec<TimerEvent> {
        let mut fired = Vec::new();
        let mut inner = self.inner.borrow_mut();
        let deadline = inner.now + dt;

        while let Some(position) = inner.next_due(deadline) {
            let timer = inner.pending[position];
            inner.now = timer.due;
            match timer.period {
                Some(period) => inner.pending[position].due = timer.due + period,
                None => {
                    inner.pending.remove(position);
                }
            }
            fired.push(timer.event);
        }

        inner.now = deadline;
        fired
    }

    /// Number of timers still scheduled.
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }
}

impl Scheduler for ManualScheduler {
    type OneShot = ManualHandle;
    type Repeating = ManualHandle;

    fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    fn once(&mut self, delay: Duration, event: TimerEvent) -> ManualHandle {
        let mut inner = self.inner.borrow_mut();
        let due = inner.now + delay;
        let id = inner.schedule(due, None, event);
        ManualHandle {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }

    fn repeating(&mut self, period: Duration, event: TimerEvent) -> ManualHandle {
        let mut inner = self.inner.borrow_mut();
        let due = inner.now + period;
        let id = inner.schedule(due, Some(period), event);
        ManualHandle {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }
}

/// Handle to a [`ManualScheduler`] timer; cancels the timer when dropped.
#[derive(Debug)]
pub struct ManualHandle {
    inner: Weak<RefCell<ManualInner>>,
    id: u32,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().pending.retain(|timer| timer.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn one_shot_fires_once_at_its_deadline() {
        let mut scheduler = ManualScheduler::new();
        let _handle = scheduler.once(10 * MS, TimerEvent::PreviewElapsed);

        assert_eq!(scheduler.advance(9 * MS), vec![]);
        assert_eq!(scheduler.advance(MS), vec![TimerEvent::PreviewElapsed]);
        assert_eq!(scheduler.advance(100 * MS), vec![]);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn repeating_fires_every_period() {
        let mut scheduler = ManualScheduler::new();
        let _handle = scheduler.repeating(5 * MS, TimerEvent::Tick);

        assert_eq!(
            scheduler.advance(16 * MS),
            vec![TimerEvent::Tick, TimerEvent::Tick, TimerEvent::Tick]
        );
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn events_fire_in_deadline_order() {
        let mut scheduler = ManualScheduler::new();
        let _tick = scheduler.repeating(4 * MS, TimerEvent::Tick);
        let _preview = scheduler.once(6 * MS, TimerEvent::PreviewElapsed);

        assert_eq!(
            scheduler.advance(8 * MS),
            vec![TimerEvent::Tick, TimerEvent::PreviewElapsed, TimerEvent::Tick]
        );
    }

    #[test]
    fn dropping_a_handle_cancels_the_timer() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.once(10 * MS, TimerEvent::PreviewElapsed);
        drop(handle);

        assert_eq!(scheduler.advance(20 * MS), vec![]);
    }

    #[test]
    fn dropping_after_firing_is_a_no_op() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.once(MS, TimerEvent::PreviewElapsed);

        assert_eq!(scheduler.advance(MS), vec![TimerEvent::PreviewElapsed]);
        drop(handle);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn clock_advances_with_the_deadline() {
        let scheduler = ManualScheduler::new();
        scheduler.advance(7 * MS);
        assert_eq!(scheduler.now(), 7 * MS);
    }
}
