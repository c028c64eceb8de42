//! Game session controller: timing, scoring, mole scheduling and the
//! win / restart flow.
//!
//! The session is generic over its page ([`GameView`]), its timers
//! ([`Scheduler`]) and its randomness ([`RandomSource`]) so the exact same code
//! runs in the browser and under a virtual clock in native tests.
//!
//! Round lifecycle:
//! - before the first `start()` and after a win, `won == true` and clicks are ignored;
//! - `start()` resets the counters, clears the holes, requests an appearance and
//!   starts the 1 s ticker;
//! - each appearance puts the mole into a random hole, then hides it again after a
//!   short random delay and requests the next appearance;
//! - a mousedown on the mole wins the round and stops the ticker.

use log::{debug, error, info};

use crate::config::GameConfig;
use crate::debounce::Debouncer;
use crate::error::{GameError, Result};
use crate::rng::{RandomSource, random_int};
use crate::timer::{Scheduler, Task, TimerId};
use crate::view::{self, GameView};

pub struct GameSession<V, S, R> {
    config: GameConfig,
    view: V,
    scheduler: S,
    rng: R,
    elapsed_seconds: u32,
    click_count: u32,
    // true until the first start() and again once the mole is caught
    won: bool,
    ticker: Option<TimerId>,
    appearance: Debouncer,
    // hide timer of the mole currently on screen
    hide_timer: Option<TimerId>,
    mole_hole: Option<usize>,
}

impl<V: GameView, S: Scheduler, R: RandomSource> GameSession<V, S, R> {
    pub fn new(view: V, scheduler: S, rng: R, config: GameConfig) -> Result<Self> {
        config.validate()?;
        if view.hole_count() == 0 {
            return Err(GameError::NoHoles {
                selector: config.selectors.hole.clone(),
            });
        }
        let appearance = Debouncer::new(config.debounce_ms);
        Ok(Self {
            config,
            view,
            scheduler,
            rng,
            elapsed_seconds: 0,
            click_count: 0,
            won: true,
            ticker: None,
            appearance,
            hide_timer: None,
            mole_hole: None,
        })
    }

    /// Begin a new round. Valid at any time; a round in progress is restarted.
    ///
    /// The holes are left empty: the first mole shows up one debounce window
    /// (`debounce_ms`) after this call.
    pub fn start(&mut self) -> Result<()> {
        self.elapsed_seconds = 0;
        self.click_count = 0;
        self.view.set_clicks_text(&view::clicks_text(self.click_count));
        self.view.set_time_text(&view::time_text(self.elapsed_seconds));
        self.view.set_start_enabled(false);
        self.won = false;
        self.view.set_win_message("");
        self.view.clear_holes();
        self.mole_hole = None;
        self.cancel_hide();
        if let Err(e) = self.schedule_appearance() {
            // Any later hole click requests the appearance again.
            error!("scheduling first appearance failed: {e}");
        }
        // A restart must not leave the previous round's ticker running.
        self.stop_time_counter();
        match self
            .scheduler
            .set_interval(self.config.tick_interval_ms, Task::Tick)
        {
            Ok(id) => self.ticker = Some(id),
            Err(e) => {
                // Without a ticker the round cannot be timed; back to idle.
                self.appearance.cancel(&mut self.scheduler);
                self.won = true;
                self.view.set_start_enabled(true);
                return Err(e);
            }
        }
        info!("round started with {} holes", self.view.hole_count());
        Ok(())
    }

    /// A click landed on a hole (a miss unless it bubbled from the mole).
    pub fn on_hole_click(&mut self) -> Result<()> {
        if self.won {
            return Ok(());
        }
        self.click_count += 1;
        self.view.set_clicks_text(&view::clicks_text(self.click_count));
        self.schedule_appearance()
    }

    pub fn on_mole_mousedown(&mut self) -> Result<()> {
        if self.won {
            self.view.alert(view::ALREADY_WON_NOTICE);
            return Ok(());
        }
        // The catching click counts towards the total.
        self.click_count += 1;
        self.view.set_clicks_text(&view::clicks_text(self.click_count));
        self.view.set_win_message(view::WIN_MESSAGE);
        self.stop_time_counter();
        self.view.set_start_enabled(true);
        self.won = true;
        info!(
            "mole caught after {}s and {} clicks",
            self.elapsed_seconds, self.click_count
        );
        let summary = Task::Summary {
            seconds: self.elapsed_seconds,
            clicks: self.click_count,
        };
        if let Err(e) = self
            .scheduler
            .set_timeout(self.config.summary_delay_ms, summary)
        {
            error!("scheduling summary notice failed: {e}");
        }
        Ok(())
    }

    /// Request an appearance cycle; bursts collapse into one run a full
    /// debounce window after the last request.
    pub fn schedule_appearance(&mut self) -> Result<()> {
        self.appearance.trigger(&mut self.scheduler, Task::Appear)?;
        Ok(())
    }

    pub fn stop_time_counter(&mut self) {
        if let Some(id) = self.ticker.take() {
            self.scheduler.clear_interval(id);
            debug!("ticker {id} stopped");
        }
    }

    fn cancel_hide(&mut self) {
        if let Some(id) = self.hide_timer.take() {
            self.scheduler.clear_timeout(id);
        }
    }

    /// Entry point for fired timers.
    pub fn run(&mut self, task: Task) -> Result<()> {
        match task {
            Task::Tick => {
                self.tick();
                Ok(())
            }
            Task::Appear => self.appear(),
            Task::Hide => self.hide(),
            Task::Summary { seconds, clicks } => {
                self.view.alert(&view::summary_text(seconds, clicks));
                Ok(())
            }
        }
    }

    fn tick(&mut self) {
        if self.won {
            return;
        }
        self.elapsed_seconds += 1;
        self.view.set_time_text(&view::time_text(self.elapsed_seconds));
    }

    fn appear(&mut self) -> Result<()> {
        self.appearance.fired();
        if self.won {
            return Ok(());
        }
        let last = (self.view.hole_count() - 1) as u32;
        let index = random_int(&mut self.rng, 0, last)? as usize;
        self.view.show_mole(index);
        self.mole_hole = Some(index);
        let visible_ms = random_int(
            &mut self.rng,
            self.config.hide_delay_min_ms,
            self.config.hide_delay_max_ms,
        )?;
        // Only the mole on screen may be hidden; drop an older pending hide.
        self.cancel_hide();
        self.hide_timer = Some(self.scheduler.set_timeout(visible_ms, Task::Hide)?);
        debug!("mole in hole {index} for {visible_ms}ms");
        Ok(())
    }

    fn hide(&mut self) -> Result<()> {
        self.hide_timer = None;
        debug!("hide delay elapsed, won = {}", self.won);
        if self.won {
            return Ok(());
        }
        self.view.clear_holes();
        self.mole_hole = None;
        self.schedule_appearance()
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn appearance_pending(&self) -> bool {
        self.appearance.is_pending()
    }

    pub fn mole_hole(&self) -> Option<usize> {
        self.mole_hole
    }

    pub fn hole_count(&self) -> usize {
        self.view.hole_count()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, RecordingView};

    #[test]
    fn zero_holes_fail_construction() {
        let err = Harness::try_new(0, GameConfig::default()).err();
        assert_eq!(
            err,
            Some(GameError::NoHoles {
                selector: ".hole".into()
            })
        );
    }

    #[test]
    fn invalid_config_fails_construction() {
        let cfg = GameConfig {
            hide_delay_min_ms: 10,
            hide_delay_max_ms: 1,
            ..GameConfig::default()
        };
        assert!(matches!(
            Harness::try_new(3, cfg),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn idle_before_first_start() {
        let mut h = Harness::new(3);
        assert!(h.session.is_won());
        h.session.on_hole_click().unwrap();
        assert_eq!(h.session.click_count(), 0);
        h.advance(5_000);
        assert_eq!(h.session.elapsed_seconds(), 0);
        assert_eq!(h.session.mole_hole(), None);
    }

    #[test]
    fn start_resets_displays_and_disables_button() {
        let mut h = Harness::new(3);
        h.session.start().unwrap();
        let v: &RecordingView = h.session.view();
        assert_eq!(v.time_text, "Elapsed time: 0 seconds");
        assert_eq!(v.clicks_text, "Clicks: 0");
        assert!(!v.start_enabled);
        assert_eq!(v.win_message, "");
        assert!(v.holes.iter().all(|h| !h));
        assert!(h.session.is_ticking());
        assert!(h.session.appearance_pending());
    }

    #[test]
    fn first_appearance_waits_for_debounce() {
        let mut h = Harness::new(3);
        h.session.start().unwrap();
        h.advance(999);
        assert_eq!(h.session.mole_hole(), None);
        h.advance(1);
        assert!(h.session.mole_hole().is_some());
        assert_eq!(h.session.view().occupied(), 1);
    }

    #[test]
    fn ticks_once_per_second_while_playing() {
        let mut h = Harness::new(3);
        h.session.start().unwrap();
        h.advance(3_500);
        assert_eq!(h.session.elapsed_seconds(), 3);
        assert_eq!(h.session.view().time_text, "Elapsed time: 3 seconds");
    }

    #[test]
    fn hole_click_counts_and_reschedules() {
        let mut h = Harness::new(3);
        h.session.start().unwrap();
        h.advance(900);
        h.session.on_hole_click().unwrap();
        assert_eq!(h.session.click_count(), 1);
        assert_eq!(h.session.view().clicks_text, "Clicks: 1");
        // The click pushed the pending appearance to 1900.
        h.advance(999);
        assert_eq!(h.session.mole_hole(), None);
        h.advance(1);
        assert!(h.session.mole_hole().is_some());
    }

    #[test]
    fn mole_hides_after_visible_window_and_returns() {
        let mut h = Harness::with_words(3, vec![1, 0]);
        h.session.start().unwrap();
        h.advance(1_000);
        // word 1 -> hole 1, word 0 -> 200ms visible
        assert_eq!(h.session.mole_hole(), Some(1));
        h.advance(199);
        assert_eq!(h.session.mole_hole(), Some(1));
        h.advance(1);
        assert_eq!(h.session.mole_hole(), None);
        assert_eq!(h.session.view().occupied(), 0);
        assert!(h.session.appearance_pending());
        h.advance(1_000);
        assert!(h.session.mole_hole().is_some());
    }

    #[test]
    fn catching_the_mole_wins() {
        let mut h = Harness::new(3);
        h.session.start().unwrap();
        h.advance(2_100);
        h.session.on_hole_click().unwrap();
        h.session.on_mole_mousedown().unwrap();
        assert!(h.session.is_won());
        assert!(!h.session.is_ticking());
        assert_eq!(h.session.click_count(), 2);
        let v = h.session.view();
        assert!(v.start_enabled);
        assert_eq!(v.win_message, "You win!");
        assert!(v.alerts.is_empty());

        h.advance(100);
        assert_eq!(
            h.session.view().alerts,
            vec!["Gotcha! Time to catch 2 seconds and 2 clicks".to_string()]
        );
        h.advance(10_000);
        assert_eq!(h.session.elapsed_seconds(), 2);
        assert_eq!(h.session.view().alerts.len(), 1);
    }

    #[test]
    fn mousedown_after_win_only_notifies() {
        let mut h = Harness::new(3);
        h.session.start().unwrap();
        h.session.on_mole_mousedown().unwrap();
        h.advance(100);
        h.session.on_mole_mousedown().unwrap();
        h.session.on_hole_click().unwrap();
        assert_eq!(h.session.click_count(), 1);
        assert_eq!(
            h.session.view().alerts.last().map(String::as_str),
            Some("You already caught the mole, restart the game!")
        );
    }

    #[test]
    fn no_appearance_after_win() {
        let mut h = Harness::new(3);
        h.session.start().unwrap();
        h.advance(1_000);
        let caught_in = h.session.mole_hole();
        assert!(caught_in.is_some());
        h.session.on_mole_mousedown().unwrap();
        h.advance(5_000);
        assert_eq!(h.session.mole_hole(), caught_in);
        assert_eq!(h.session.view().occupied(), 1);
    }

    #[test]
    fn restart_mid_round_resets_and_keeps_single_ticker() {
        let mut h = Harness::new(3);
        h.session.start().unwrap();
        h.advance(1_100);
        h.session.on_hole_click().unwrap();
        h.session.start().unwrap();
        assert_eq!(h.session.elapsed_seconds(), 0);
        assert_eq!(h.session.click_count(), 0);
        assert_eq!(h.session.view().occupied(), 0);
        assert_eq!(h.session.scheduler().interval_count(), 1);
        h.advance(2_000);
        assert_eq!(h.session.elapsed_seconds(), 2);
    }

    #[test]
    fn newer_mole_keeps_its_full_visible_window() {
        let cfg = GameConfig {
            debounce_ms: 100,
            hide_delay_min_ms: 200,
            hide_delay_max_ms: 200,
            ..GameConfig::default()
        };
        let mut h = Harness::try_new(3, cfg).unwrap();
        h.session.start().unwrap();
        h.advance(100);
        assert!(h.session.mole_hole().is_some());
        h.advance(50);
        h.session.on_hole_click().unwrap();
        // second appearance at 250; the hide armed at 100 must not fire at 300
        h.advance(100);
        let second = h.session.mole_hole();
        assert!(second.is_some());
        h.advance(199);
        assert_eq!(h.session.mole_hole(), second);
        h.advance(1);
        assert_eq!(h.session.mole_hole(), None);
        assert_eq!(h.session.view().placements.len(), 2);
    }

    #[test]
    fn restart_drops_pending_hide() {
        let mut h = Harness::new(3);
        h.session.start().unwrap();
        h.advance(1_000);
        assert!(h.session.mole_hole().is_some());
        h.session.start().unwrap();
        // only the new ticker and the debounced appearance remain
        assert_eq!(h.session.scheduler().pending_count(), 2);
        h.advance(999);
        assert_eq!(h.session.view().occupied(), 0);
    }

    #[test]
    fn win_completes_even_if_summary_cannot_be_scheduled() {
        let mut h = Harness::new(3);
        h.session.start().unwrap();
        h.advance(1_500);
        h.session.scheduler_mut().reject_timeouts(true);
        assert!(h.session.on_mole_mousedown().is_ok());
        assert!(h.session.is_won());
        assert!(!h.session.is_ticking());
        let v = h.session.view();
        assert!(v.start_enabled);
        assert_eq!(v.win_message, "You win!");
        assert_eq!(h.session.click_count(), 1);
    }

    #[test]
    fn start_runs_ticker_when_appearance_cannot_be_scheduled() {
        let mut h = Harness::new(3);
        h.session.scheduler_mut().reject_timeouts(true);
        assert!(h.session.start().is_ok());
        assert!(!h.session.is_won());
        assert!(h.session.is_ticking());
        h.advance(2_000);
        assert_eq!(h.session.elapsed_seconds(), 2);
    }

    #[test]
    fn start_stays_idle_when_ticker_is_refused() {
        let mut h = Harness::new(3);
        h.session.scheduler_mut().reject_intervals(true);
        assert!(matches!(h.session.start(), Err(GameError::Js(_))));
        assert!(h.session.is_won());
        assert!(!h.session.is_ticking());
        assert!(!h.session.appearance_pending());
        assert!(h.session.view().start_enabled);
        assert_eq!(h.session.scheduler().pending_count(), 0);
    }
}
