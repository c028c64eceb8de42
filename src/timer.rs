//! Timer seam between the session and whatever event loop runs it.
//!
//! The session never holds closures over itself; it asks a [`Scheduler`] to
//! deliver a [`Task`] later and the runtime hands that task back to
//! `GameSession::run` when the timer fires.

use crate::error::Result;

/// Opaque timer handle (mirrors the integer ids returned by `window.setTimeout`).
pub type TimerId = i32;

/// Deferred work a session can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// One period of the elapsed-time counter.
    Tick,
    /// Debounced appearance cycle: place the mole in a random hole.
    Appear,
    /// End of the mole's visible window.
    Hide,
    /// Summary alert for a finished round, with the values frozen at the win.
    Summary { seconds: u32, clicks: u32 },
}

pub trait Scheduler {
    fn set_timeout(&mut self, delay_ms: u32, task: Task) -> Result<TimerId>;
    fn clear_timeout(&mut self, id: TimerId);
    fn set_interval(&mut self, period_ms: u32, task: Task) -> Result<TimerId>;
    fn clear_interval(&mut self, id: TimerId);
}
