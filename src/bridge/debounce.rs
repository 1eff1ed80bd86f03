//! Cancellable scheduled tasks for debounced work.
//!
//! A [`Debouncer`] holds at most one pending task. Scheduling always
//! replaces (never queues behind) the previous task, and every task gets a
//! fresh [`TaskId`], so a superseded task can never fire. Time comes from a
//! [`Clock`] so tests can drive it with a [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;

use web_time::{Duration, Instant};

/// Source of the current time.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    /// Clock frozen at the current wall time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Identity of one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Pending<T> {
    id: TaskId,
    due: Instant,
    payload: T,
}

/// Single-slot trailing debouncer.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
    next_id: u64,
}

impl<T> Debouncer<T> {
    /// Debouncer firing `delay` after the most recent schedule.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            next_id: 0,
        }
    }

    /// Configured delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the delay. A pending task keeps its original deadline.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Schedule `payload` to fire at `now + delay`, cancelling any pending
    /// task.
    pub fn schedule(&mut self, payload: T, now: Instant) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        if let Some(old) = self.pending.replace(Pending {
            id,
            due: now + self.delay,
            payload,
        }) {
            log::trace!("debounce task {:?} superseded by {id:?}", old.id);
        }
        id
    }

    /// Cancel the pending task, returning its id if there was one.
    pub fn cancel(&mut self) -> Option<TaskId> {
        self.pending.take().map(|p| p.id)
    }

    /// Whether a task is waiting to fire.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Id of the pending task.
    #[must_use]
    pub fn pending_id(&self) -> Option<TaskId> {
        self.pending.as_ref().map(|p| p.id)
    }

    /// When the pending task is due (lets the host sleep until then).
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Take the pending task if it is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<(TaskId, T)> {
        if self.pending.as_ref().is_some_and(|p| now >= p.due) {
            self.pending.take().map(|p| (p.id, p.payload))
        } else {
            None
        }
    }
}
