//! Delayed actions polled once per frame
//!
//! Stands in for engine coroutines: schedule a task with a delay, advance the
//! queue by the frame time, run whatever came due.

use serde::{Deserialize, Serialize};

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    id: TaskId,
    remaining: f32,
    task: T,
}

/// Timer queue of pending tasks
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    pending: Vec<Scheduled<T>>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 1,
        }
    }

    /// Run `task` once `delay` seconds have been advanced. Negative delays count as zero.
    pub fn schedule(&mut self, delay: f32, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            remaining: delay.max(0.0),
            task,
        });
        id
    }

    /// Drop a pending task. Returns false if it already ran or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|s| s.id == id)
    }

    /// Advance all timers by `dt` and return the tasks that came due, in
    /// the order they were scheduled.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        let dt = dt.max(0.0);
        let mut due = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());

        for mut scheduled in self.pending.drain(..) {
            scheduled.remaining -= dt;
            if scheduled.remaining <= 0.0 {
                due.push(scheduled.task);
            } else {
                still_pending.push(scheduled);
            }
        }

        self.pending = still_pending;
        due
    }

    /// Number of pending tasks matching `pred`
    pub fn count(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.pending.iter().filter(|s| pred(&s.task)).count()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
