//! Motion preference gate.
//!
//! Mirrors the `prefers-reduced-motion` media query as a shared live boolean and keeps
//! the four animation duration custom properties on the document root in sync with it.

use std::cell::Cell;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::animator::Transition;

/// Duration used for every animation while reduced motion is on. Non-zero so that
/// `animationend` still fires.
pub const REDUCED_DURATION_MS: u32 = 1;

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Full animation durations in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionDurations {
    pub intro_in: u32,
    pub intro_out: u32,
    pub message_in: u32,
    pub message_out: u32,
}

impl Default for MotionDurations {
    fn default() -> Self {
        Self { intro_in: 2000, intro_out: 2000, message_in: 700, message_out: 500 }
    }
}

impl MotionDurations {
    /// Durations as the presentation layer should see them.
    pub fn effective(&self, reduced: bool) -> Self {
        if reduced {
            Self {
                intro_in: REDUCED_DURATION_MS,
                intro_out: REDUCED_DURATION_MS,
                message_in: REDUCED_DURATION_MS,
                message_out: REDUCED_DURATION_MS,
            }
        } else {
            *self
        }
    }

    /// Custom property name/value pairs written on the document root.
    pub fn css_properties(&self, reduced: bool) -> [(&'static str, String); 4] {
        let d = self.effective(reduced);
        [
            ("--intro-in-duration", format!("{}ms", d.intro_in)),
            ("--intro-out-duration", format!("{}ms", d.intro_out)),
            ("--message-in-duration", format!("{}ms", d.message_in)),
            ("--message-out-duration", format!("{}ms", d.message_out)),
        ]
    }

    pub fn for_transition(&self, transition: Transition) -> u32 {
        match transition {
            Transition::FadeIn => self.intro_in,
            Transition::FadeOut => self.intro_out,
            Transition::FadeInUp => self.message_in,
            Transition::FadeOutDown => self.message_out,
        }
    }
}

/// Shared handle to the live reduced-motion flag.
#[derive(Clone, Debug, Default)]
pub struct MotionPreference(Rc<Cell<bool>>);

impl MotionPreference {
    pub fn new(reduced: bool) -> Self {
        Self(Rc::new(Cell::new(reduced)))
    }

    pub fn reduced(&self) -> bool {
        self.0.get()
    }

    pub fn set(&self, reduced: bool) {
        self.0.set(reduced);
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{MotionGate, sync_durations};

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gloo::events::EventListener;
    use web_sys::{HtmlElement, MediaQueryList, Window};

    use super::{MotionDurations, MotionPreference, REDUCED_MOTION_QUERY};
    use crate::error::{SlideshowError, SlideshowResult};

    type Subscribers = Rc<RefCell<Vec<Box<dyn Fn(bool)>>>>;

    /// Write the four duration properties onto `root`.
    pub fn sync_durations(root: &HtmlElement, durations: &MotionDurations, reduced: bool) {
        let style = root.style();
        for (name, value) in durations.css_properties(reduced) {
            if let Err(err) = style.set_property(name, &value) {
                tracing::warn!(property = name, ?err, "failed to set duration property");
            }
        }
    }

    /// Live binding to the reduced-motion media query.
    pub struct MotionGate {
        query: MediaQueryList,
        preference: MotionPreference,
        subscribers: Subscribers,
        _listener: EventListener,
    }

    impl MotionGate {
        pub fn watch(window: &Window, root: HtmlElement, durations: MotionDurations) -> SlideshowResult<Self> {
            let query = window
                .match_media(REDUCED_MOTION_QUERY)?
                .ok_or_else(|| SlideshowError::JavaScript("matchMedia unavailable".into()))?;
            let preference = MotionPreference::new(query.matches());
            sync_durations(&root, &durations, preference.reduced());

            let subscribers: Subscribers = Rc::default();
            let listener = {
                let live = query.clone();
                let preference = preference.clone();
                let subscribers = subscribers.clone();
                EventListener::new(&query, "change", move |_| {
                    let reduced = live.matches();
                    tracing::info!(reduced, "reduced motion preference changed");
                    preference.set(reduced);
                    sync_durations(&root, &durations, reduced);
                    for cb in subscribers.borrow().iter() {
                        cb(reduced);
                    }
                })
            };

            Ok(Self { query, preference, subscribers, _listener: listener })
        }

        pub fn reduced(&self) -> bool {
            self.query.matches()
        }

        pub fn preference(&self) -> MotionPreference {
            self.preference.clone()
        }

        /// Invoke `callback` with the new value on every change.
        pub fn on_change(&self, callback: impl Fn(bool) + 'static) {
            self.subscribers.borrow_mut().push(Box::new(callback));
        }
    }
}
