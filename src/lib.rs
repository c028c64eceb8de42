//! Mole Catch core crate.
//!
//! A whack-a-mole round in the browser: an elapsed-time counter, a click
//! counter, a mole that pops into a random hole and hides again, and a
//! win / restart flow. `setup_game()` wires the session to an existing page;
//! the page markup itself is supplied by the host.
//!
//! The session logic (`session`) is independent of the DOM and of real timers,
//! so it is exercised natively through the stand-ins in `testing` (behind the
//! `testing` feature, enabled for this crate's own tests).

use wasm_bindgen::prelude::*;

pub mod config;
pub mod debounce;
pub mod error;
pub mod instance;
pub mod rng;
pub mod session;
#[cfg(any(test, feature = "testing"))]
#[doc(hidden)]
pub mod testing;
pub mod timer;
pub mod view;

mod browser;
mod dom;

pub use browser::{MoleGame, game_is_set_up, setup_game, setup_game_in};
#[cfg(feature = "serde_json")]
pub use browser::setup_game_with_config;
pub use config::GameConfig;
pub use error::GameError;
pub use session::GameSession;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    // A second init (e.g. module re-instantiated by a test runner) is harmless.
    let _ = console_log::init_with_level(level);
}
