//! Logging setup.
//!
//! Code logs through `tracing` macros everywhere; in the browser the events are
//! forwarded to the devtools console by `tracing-wasm`. Native builds (tests) install
//! nothing, so events are dropped unless the caller sets a subscriber.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install the console subscriber. Safe to call more than once.
pub fn init_logging() {
    INIT.call_once(|| {
        #[cfg(target_arch = "wasm32")]
        {
            let level = if cfg!(debug_assertions) { tracing::Level::DEBUG } else { tracing::Level::INFO };
            let config = tracing_wasm::WASMLayerConfigBuilder::new().set_max_level(level).build();
            tracing_wasm::set_as_global_default_with_config(config);
        }
    });
}
