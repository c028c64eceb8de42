//! web-sys implementation of [`GameView`].

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlImageElement, Window};

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::view::GameView;

pub struct DomView {
    window: Window,
    time_el: Element,
    clicks_el: Element,
    start_button: HtmlButtonElement,
    win_message_el: Element,
    holes: Vec<Element>,
    mole: HtmlImageElement,
}

impl DomView {
    /// Resolve every required element under `container` and build the mole
    /// image. Fails on the first missing element.
    pub fn locate(container: &Element, mole_image_url: &str, config: &GameConfig) -> Result<Self> {
        let window = web_sys::window().ok_or(GameError::NoWindow)?;
        let document = window.document().ok_or(GameError::NoDocument)?;
        let sel = &config.selectors;

        let time_el = required(container, &sel.time)?;
        let clicks_el = required(container, &sel.clicks)?;
        let start_button: HtmlButtonElement = required(container, &sel.start_button)?
            .dyn_into()
            .map_err(|_| GameError::Js(format!("`{}` is not a <button>", sel.start_button)))?;
        let win_message_el = required(container, &sel.win_message)?;

        let list = container.query_selector_all(&sel.hole)?;
        let holes: Vec<Element> = (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect();
        if holes.is_empty() {
            return Err(GameError::NoHoles {
                selector: sel.hole.clone(),
            });
        }

        let mole = create_mole(&document, mole_image_url, &config.mole_class)?;
        Ok(Self {
            window,
            time_el,
            clicks_el,
            start_button,
            win_message_el,
            holes,
            mole,
        })
    }

    pub fn start_button(&self) -> &HtmlButtonElement {
        &self.start_button
    }

    pub fn holes(&self) -> &[Element] {
        &self.holes
    }

    pub fn mole(&self) -> &HtmlImageElement {
        &self.mole
    }
}

fn required(container: &Element, selector: &str) -> Result<Element> {
    container
        .query_selector(selector)?
        .ok_or_else(|| GameError::missing(selector))
}

fn create_mole(document: &Document, src: &str, class: &str) -> Result<HtmlImageElement> {
    let img: HtmlImageElement = document
        .create_element("img")?
        .dyn_into()
        .map_err(|_| GameError::Js("created element is not an <img>".into()))?;
    img.set_src(src);
    img.class_list().add_1(class)?;
    Ok(img)
}

fn empty(el: &Element) {
    while let Some(child) = el.first_child() {
        if el.remove_child(&child).is_err() {
            break;
        }
    }
}

impl GameView for DomView {
    fn hole_count(&self) -> usize {
        self.holes.len()
    }

    fn set_time_text(&mut self, text: &str) {
        self.time_el.set_text_content(Some(text));
    }

    fn set_clicks_text(&mut self, text: &str) {
        self.clicks_el.set_text_content(Some(text));
    }

    fn set_win_message(&mut self, text: &str) {
        self.win_message_el.set_text_content(Some(text));
    }

    fn set_start_enabled(&mut self, enabled: bool) {
        self.start_button.set_disabled(!enabled);
    }

    fn clear_holes(&mut self) {
        self.holes.iter().for_each(empty);
    }

    fn show_mole(&mut self, index: usize) {
        let Some(hole) = self.holes.get(index) else {
            log::warn!("hole {index} out of range");
            return;
        };
        empty(hole);
        // append_child moves the image out of whichever hole held it before.
        if let Err(e) = hole.append_child(&self.mole) {
            log::error!("placing mole failed: {:?}", e);
        }
    }

    fn alert(&mut self, message: &str) {
        if self.window.alert_with_message(message).is_err() {
            log::warn!("alert suppressed: {message}");
        }
    }
}
