use crate::error::Result;
use crate::timer::{Scheduler, Task, TimerId};

/// Collapses bursts of requests into one delayed task, timed from the last
/// request. Only one timer is ever pending.
#[derive(Debug)]
pub struct Debouncer {
    delay_ms: u32,
    pending: Option<TimerId>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Cancel whatever is pending and schedule `task` a full delay from now.
    pub fn trigger<S: Scheduler>(&mut self, scheduler: &mut S, task: Task) -> Result<TimerId> {
        self.cancel(scheduler);
        let id = scheduler.set_timeout(self.delay_ms, task)?;
        self.pending = Some(id);
        Ok(id)
    }

    /// Forget the pending id once its task has run.
    pub fn fired(&mut self) {
        self.pending = None;
    }

    pub fn cancel<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(id) = self.pending.take() {
            scheduler.clear_timeout(id);
        }
    }
}
