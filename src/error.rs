use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("required element `{selector}` not found in game container")]
    MissingElement { selector: String },
    #[error("no hole elements match `{selector}`")]
    NoHoles { selector: String },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("browser call failed: {0}")]
    Js(String),
}

impl GameError {
    pub fn missing(selector: &str) -> Self {
        GameError::MissingElement {
            selector: selector.to_string(),
        }
    }
}

impl From<JsValue> for GameError {
    fn from(v: JsValue) -> Self {
        GameError::Js(v.as_string().unwrap_or_else(|| format!("{v:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(e: GameError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;
