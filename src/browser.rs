//! Browser runtime: window timers, DOM event wiring and the JS entry points.
//!
//! The single session lives in a thread-local slot. Every DOM event and every
//! timer callback borrows it, runs one operation to completion and releases it.

use std::collections::HashMap;

use log::{error, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlButtonElement, HtmlImageElement, Window};

use crate::config::GameConfig;
use crate::dom::DomView;
use crate::error::{GameError, Result};
use crate::instance::InstanceSlot;
use crate::rng::CryptoRandom;
use crate::session::GameSession;
use crate::timer::{Scheduler, Task, TimerId};

type BrowserSession = GameSession<DomView, BrowserScheduler, CryptoRandom>;

thread_local! {
    static SESSION: InstanceSlot<BrowserSession> = const { InstanceSlot::new() };
}

/// `window.setTimeout` / `setInterval` backed scheduler. Fired timers feed
/// their task back into the thread-local session.
pub struct BrowserScheduler {
    window: Window,
    // Interval callbacks must outlive the JS timer; dropped on clear.
    intervals: HashMap<TimerId, Closure<dyn FnMut()>>,
}

impl BrowserScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            intervals: HashMap::new(),
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn set_timeout(&mut self, delay_ms: u32, task: Task) -> Result<TimerId> {
        // One-shot: JS frees the closure after it runs.
        let callback = Closure::once_into_js(move || dispatch(task));
        let id = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms as i32,
            )?;
        Ok(id)
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.window.clear_timeout_with_handle(id);
    }

    fn set_interval(&mut self, period_ms: u32, task: Task) -> Result<TimerId> {
        let closure = Closure::wrap(Box::new(move || dispatch(task)) as Box<dyn FnMut()>);
        let id = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms as i32,
            )?;
        self.intervals.insert(id, closure);
        Ok(id)
    }

    fn clear_interval(&mut self, id: TimerId) {
        self.window.clear_interval_with_handle(id);
        self.intervals.remove(&id);
    }
}

fn dispatch(task: Task) {
    with_session("timer", |s| s.run(task));
}

fn with_session(label: &str, f: impl FnOnce(&mut BrowserSession) -> Result<()>) {
    match SESSION.with(|slot| slot.with_mut(f)) {
        Some(Ok(())) => {}
        Some(Err(e)) => error!("{label}: {e}"),
        None => warn!("{label}: game session unavailable"),
    }
}

/// Cloned element handles the listeners are attached to.
struct EventTargets {
    start_button: HtmlButtonElement,
    holes: Vec<Element>,
    mole: HtmlImageElement,
}

impl EventTargets {
    fn of(view: &DomView) -> Self {
        Self {
            start_button: view.start_button().clone(),
            holes: view.holes().to_vec(),
            mole: view.mole().clone(),
        }
    }

    fn wire(&self) -> Result<()> {
        // Start button -> start()
        {
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                with_session("start", |s| s.start());
            }) as Box<dyn FnMut(_)>);
            self.start_button
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        // Holes -> miss
        for hole in &self.holes {
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                with_session("hole click", |s| s.on_hole_click());
            }) as Box<dyn FnMut(_)>);
            hole.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        // Mole -> hit
        {
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                with_session("mole mousedown", |s| s.on_mole_mousedown());
            }) as Box<dyn FnMut(_)>);
            self.mole
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }
}

fn build_session(container: &Element, mole_image_url: &str, config: GameConfig) -> Result<BrowserSession> {
    config.validate()?;
    let window = web_sys::window().ok_or(GameError::NoWindow)?;
    let view = DomView::locate(container, mole_image_url, &config)?;
    let targets = EventTargets::of(&view);
    let session = GameSession::new(view, BrowserScheduler::new(window), CryptoRandom, config)?;
    targets.wire()?;
    Ok(session)
}

fn setup(container: &Element, mole_image_url: &str, config: GameConfig) -> Result<MoleGame> {
    let created =
        SESSION.with(|slot| slot.get_or_try_init(|| build_session(container, mole_image_url, config)))?;
    if created {
        info!("mole game ready");
    } else {
        info!("mole game already set up; reusing existing session");
    }
    Ok(MoleGame { _private: () })
}

/// Handle to the page's game session. All handles refer to the same session.
#[wasm_bindgen]
pub struct MoleGame {
    _private: (),
}

#[wasm_bindgen]
impl MoleGame {
    pub fn start(&self) -> std::result::Result<(), JsValue> {
        SESSION
            .with(|slot| slot.with_mut(|s| s.start()))
            .ok_or_else(|| JsValue::from_str("game session unavailable"))?
            .map_err(JsValue::from)
    }

    pub fn elapsed_seconds(&self) -> u32 {
        read(|s| s.elapsed_seconds()).unwrap_or(0)
    }

    pub fn click_count(&self) -> u32 {
        read(|s| s.click_count()).unwrap_or(0)
    }

    pub fn is_won(&self) -> bool {
        read(|s| s.is_won()).unwrap_or(true)
    }

    pub fn hole_count(&self) -> u32 {
        read(|s| s.hole_count() as u32).unwrap_or(0)
    }
}

fn read<U>(f: impl FnOnce(&BrowserSession) -> U) -> Option<U> {
    SESSION.with(|slot| slot.with(f))
}

/// Set up the game inside `container`. Only the first call builds a session;
/// later calls return a handle to the same one.
#[wasm_bindgen]
pub fn setup_game(container: &Element, mole_image_url: &str) -> std::result::Result<MoleGame, JsValue> {
    Ok(setup(container, mole_image_url, GameConfig::default())?)
}

/// Like [`setup_game`], locating the container with a document-level selector
/// (the original page mounts under `#app`).
#[wasm_bindgen]
pub fn setup_game_in(container_selector: &str, mole_image_url: &str) -> std::result::Result<MoleGame, JsValue> {
    let doc = web_sys::window()
        .ok_or(GameError::NoWindow)?
        .document()
        .ok_or(GameError::NoDocument)?;
    let container = doc
        .query_selector(container_selector)?
        .ok_or_else(|| GameError::missing(container_selector))?;
    Ok(setup(&container, mole_image_url, GameConfig::default())?)
}

/// Like [`setup_game`] with a JSON config; omitted fields keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn setup_game_with_config(
    container: &Element,
    mole_image_url: &str,
    config_json: &str,
) -> std::result::Result<MoleGame, JsValue> {
    let config = GameConfig::from_json(config_json)?;
    Ok(setup(container, mole_image_url, config)?)
}

/// Whether a session has been created on this page.
#[wasm_bindgen]
pub fn game_is_set_up() -> bool {
    SESSION.with(|slot| slot.is_initialized())
}
