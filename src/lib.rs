//! Heart Notes core crate.
//!
//! An intro title that gives way to a sequence of short messages, one per advance,
//! each revealed with a small burst of floating hearts and a progress bar update.
//! The state machine (`flow`), heart placement (`hearts`, `geometry`), motion
//! durations (`motion`) and gesture handling (`input`) are plain Rust; the DOM
//! binding and the JS entrypoints only exist on `wasm32`.

use wasm_bindgen::prelude::*;

pub mod animator;
pub mod config;
pub mod error;
pub mod flow;
pub mod geometry;
pub mod hearts;
pub mod input;
pub mod logging;
pub mod motion;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use animator::{Surface, Transition};
pub use config::{DEFAULT_MESSAGES, SlideshowConfig};
pub use error::{ConfigError, SlideshowError, SlideshowResult};
pub use flow::{BusyFlag, FlowController, Phase, Stage, compute_progress, progress_value_now};
pub use geometry::Rect;
pub use hearts::{BurstRequest, HeartBurst, HeartId, HeartParticle, HeartSettings, LiveHearts};
pub use input::{Gesture, InputNormalizer, KeyAction, TouchPoint};
pub use motion::{MotionDurations, MotionPreference};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init_logging();
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Mount the slideshow with the stock content.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_slideshow() -> Result<(), JsValue> {
    app::start(SlideshowConfig::default()).map_err(JsValue::from)
}

/// Mount the slideshow from a JSON config; absent fields keep their defaults.
#[cfg(all(target_arch = "wasm32", feature = "serde_json"))]
#[wasm_bindgen]
pub fn start_slideshow_with_config(json: &str) -> Result<(), JsValue> {
    let config = SlideshowConfig::from_json(json).map_err(SlideshowError::from)?;
    app::start(config).map_err(JsValue::from)
}

/// Programmatic advance, same path as a tap. Returns false if the input was dropped.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn advance() -> bool {
    app::advance()
}
