//! Deterministic stand-ins for the browser: a virtual-clock scheduler, a view
//! that records what would be shown and a scripted random source. Used by the
//! unit tests and by `tests/`; native-friendly, no wasm APIs involved.

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::rng::RandomSource;
use crate::session::GameSession;
use crate::timer::{Scheduler, Task, TimerId};
use crate::view::GameView;

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    due: u64,
    seq: u64,
    task: Task,
    period: Option<u32>,
}

/// Timer queue over a virtual millisecond clock. Timers due at the same
/// instant fire in registration order.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: u64,
    next_id: TimerId,
    seq: u64,
    entries: Vec<Entry>,
    reject_timeouts: bool,
    reject_intervals: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Move the clock without firing anything.
    pub fn advance_idle(&mut self, ms: u64) {
        self.now += ms;
    }

    pub fn set_now(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    /// Make `set_timeout` fail like a browser refusing the timer.
    pub fn reject_timeouts(&mut self, reject: bool) {
        self.reject_timeouts = reject;
    }

    pub fn reject_intervals(&mut self, reject: bool) {
        self.reject_intervals = reject;
    }

    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    pub fn interval_count(&self) -> usize {
        self.entries.iter().filter(|e| e.period.is_some()).count()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Remove and return the earliest timer due at or before `limit`,
    /// moving the clock to its due time. Intervals are re-armed.
    pub fn pop_due(&mut self, limit: u64) -> Option<(u64, Task)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= limit)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(i, _)| i)?;
        let entry = self.entries.remove(idx);
        self.now = self.now.max(entry.due);
        if let Some(period) = entry.period {
            self.seq += 1;
            self.entries.push(Entry {
                due: entry.due + period as u64,
                seq: self.seq,
                ..entry.clone()
            });
        }
        Some((entry.due, entry.task))
    }

    fn push(&mut self, delay_ms: u32, task: Task, period: Option<u32>) -> TimerId {
        self.next_id += 1;
        self.seq += 1;
        self.entries.push(Entry {
            id: self.next_id,
            due: self.now + delay_ms as u64,
            seq: self.seq,
            task,
            period,
        });
        self.next_id
    }

    fn remove(&mut self, id: TimerId) {
        self.entries.retain(|e| e.id != id);
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&mut self, delay_ms: u32, task: Task) -> Result<TimerId> {
        if self.reject_timeouts {
            return Err(GameError::Js("setTimeout rejected".into()));
        }
        Ok(self.push(delay_ms, task, None))
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.remove(id);
    }

    fn set_interval(&mut self, period_ms: u32, task: Task) -> Result<TimerId> {
        if self.reject_intervals {
            return Err(GameError::Js("setInterval rejected".into()));
        }
        Ok(self.push(period_ms, task, Some(period_ms.max(1))))
    }

    fn clear_interval(&mut self, id: TimerId) {
        self.remove(id);
    }
}

/// Plain-data mirror of the page.
#[derive(Debug, Clone)]
pub struct RecordingView {
    pub holes: Vec<bool>,
    /// Every hole index the mole was shown in, oldest first.
    pub placements: Vec<usize>,
    pub time_text: String,
    pub clicks_text: String,
    pub win_message: String,
    pub start_enabled: bool,
    pub alerts: Vec<String>,
}

impl RecordingView {
    pub fn new(hole_count: usize) -> Self {
        Self {
            holes: vec![false; hole_count],
            placements: Vec::new(),
            time_text: String::new(),
            clicks_text: String::new(),
            win_message: String::new(),
            start_enabled: true,
            alerts: Vec::new(),
        }
    }

    /// Number of holes currently holding the mole.
    pub fn occupied(&self) -> usize {
        self.holes.iter().filter(|h| **h).count()
    }
}

impl GameView for RecordingView {
    fn hole_count(&self) -> usize {
        self.holes.len()
    }
    fn set_time_text(&mut self, text: &str) {
        self.time_text = text.to_string();
    }
    fn set_clicks_text(&mut self, text: &str) {
        self.clicks_text = text.to_string();
    }
    fn set_win_message(&mut self, text: &str) {
        self.win_message = text.to_string();
    }
    fn set_start_enabled(&mut self, enabled: bool) {
        self.start_enabled = enabled;
    }
    fn clear_holes(&mut self) {
        self.holes.iter_mut().for_each(|h| *h = false);
    }
    fn show_mole(&mut self, index: usize) {
        for (i, h) in self.holes.iter_mut().enumerate() {
            *h = i == index;
        }
        self.placements.push(index);
    }
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

/// Replays a fixed list of words, cycling; an empty script counts up from 0.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    words: Vec<u32>,
    pos: usize,
}

impl ScriptedRandom {
    pub fn new(words: Vec<u32>) -> Self {
        Self { words, pos: 0 }
    }

    pub fn counting() -> Self {
        Self::new(Vec::new())
    }
}

impl RandomSource for ScriptedRandom {
    fn next_u32(&mut self) -> Result<u32> {
        let word = if self.words.is_empty() {
            self.pos as u32
        } else {
            self.words[self.pos % self.words.len()]
        };
        self.pos += 1;
        Ok(word)
    }
}

pub type TestSession = GameSession<RecordingView, ManualScheduler, ScriptedRandom>;

/// A session wired to the stand-ins, plus a clock driver.
pub struct Harness {
    pub session: TestSession,
}

impl Harness {
    pub fn new(hole_count: usize) -> Self {
        Self::with_words(hole_count, Vec::new())
    }

    pub fn with_words(hole_count: usize, words: Vec<u32>) -> Self {
        Self::build(hole_count, words, GameConfig::default())
            .unwrap_or_else(|e| panic!("harness setup failed: {e}"))
    }

    pub fn try_new(hole_count: usize, config: GameConfig) -> Result<Self> {
        Self::build(hole_count, Vec::new(), config)
    }

    fn build(hole_count: usize, words: Vec<u32>, config: GameConfig) -> Result<Self> {
        let session = GameSession::new(
            RecordingView::new(hole_count),
            ManualScheduler::new(),
            ScriptedRandom::new(words),
            config,
        )?;
        Ok(Self { session })
    }

    pub fn now(&self) -> u64 {
        self.session.scheduler().now()
    }

    /// Run every timer due within the next `ms` milliseconds, in order.
    pub fn advance(&mut self, ms: u64) {
        let target = self.now() + ms;
        while let Some((at, task)) = self.session.scheduler_mut().pop_due(target) {
            if let Err(e) = self.session.run(task) {
                panic!("task {task:?} at {at}ms failed: {e}");
            }
        }
        self.session.scheduler_mut().set_now(target);
    }
}
