/// Everything the session needs from the page. `DomView` is the browser
/// implementation; tests use `testing::RecordingView`.
pub trait GameView {
    fn hole_count(&self) -> usize;
    fn set_time_text(&mut self, text: &str);
    fn set_clicks_text(&mut self, text: &str);
    fn set_win_message(&mut self, text: &str);
    fn set_start_enabled(&mut self, enabled: bool);
    /// Remove every child of every hole (detaches the mole).
    fn clear_holes(&mut self);
    /// Make the mole the sole content of hole `index`.
    fn show_mole(&mut self, index: usize);
    /// Blocking notice (`window.alert` in the browser).
    fn alert(&mut self, message: &str);
}

pub fn time_text(seconds: u32) -> String {
    format!("Elapsed time: {seconds} seconds")
}

pub fn clicks_text(clicks: u32) -> String {
    format!("Clicks: {clicks}")
}

pub fn summary_text(seconds: u32, clicks: u32) -> String {
    format!("Gotcha! Time to catch {seconds} seconds and {clicks} clicks")
}

pub const WIN_MESSAGE: &str = "You win!";
pub const ALREADY_WON_NOTICE: &str = "You already caught the mole, restart the game!";
