//! Cooperative single-threaded timers.
//!
//! Nothing runs on its own: the host advances the clock and drains due tasks.
//! While a task is being handled the clock reads that task's due time, so a
//! chain of `schedule_after` calls keeps its spacing regardless of how coarse
//! the host's frame deltas are.

use std::time::Duration;

/// Identifies one scheduled task; used for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

pub trait Scheduler<T> {
    fn schedule_after(&mut self, delay: Duration, task: T) -> TimerHandle;

    /// Returns false when the task already fired or was cancelled.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

#[derive(Debug)]
struct Entry<T> {
    due: Duration,
    handle: TimerHandle,
    task: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    horizon: Duration,
    next_id: u64,
    // Sorted by (due, handle).
    pending: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            horizon: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock reading.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.first().map(|e| e.due)
    }

    /// Move the horizon forward by `dt`; tasks due up to it become poppable.
    pub fn advance(&mut self, dt: Duration) {
        self.horizon += dt;
    }

    /// Pop the earliest task due at or before the horizon.
    pub fn pop_due(&mut self) -> Option<(TimerHandle, T)> {
        match self.pending.first() {
            Some(entry) if entry.due <= self.horizon => {
                let entry = self.pending.remove(0);
                self.now = entry.due;
                Some((entry.handle, entry.task))
            }
            _ => {
                self.now = self.horizon;
                None
            }
        }
    }
}

impl<T> Scheduler<T> for TimerQueue<T> {
    fn schedule_after(&mut self, delay: Duration, task: T) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let due = self.now + delay;
        let at = self
            .pending
            .partition_point(|e| (e.due, e.handle) <= (due, handle));
        self.pending.insert(at, Entry { due, handle, task });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.pending.iter().position(|e| e.handle == handle) {
            Some(i) => {
                self.pending.remove(i);
                true
            }
            None => false,
        }
    }
}
