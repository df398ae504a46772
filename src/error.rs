//! Error types for browser wiring and configuration loading.
//!
//! The slideshow itself has no recoverable failures: advancing past the end or
//! animating a surface that is not rendered are no-ops. Errors only surface while
//! mounting into the page or reading configuration.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("message list is empty")]
    EmptyMessages,

    #[error("invalid range for {name}: min {min} > max {max}")]
    InvalidRange { name: &'static str, min: i64, max: i64 },

    #[cfg(feature = "serde_json")]
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SlideshowError {
    #[error("no window")]
    NoWindow,

    #[error("no document")]
    NoDocument,

    #[error("missing element: {0}")]
    MissingElement(String),

    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<JsValue> for SlideshowError {
    fn from(js_val: JsValue) -> Self {
        let message = js_val
            .as_string()
            .unwrap_or_else(|| format!("{js_val:?}"));
        SlideshowError::JavaScript(message)
    }
}

impl From<SlideshowError> for JsValue {
    fn from(err: SlideshowError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type SlideshowResult<T> = Result<T, SlideshowError>;
