//! Input normalizer.
//!
//! Pointer, keyboard and touch events all reduce to a single advance request.
//! Deduplication is left to the controller's busy flag: this layer only decides
//! whether an event counts as an advance at all.

use tracing::trace;

/// Keys that advance the slideshow. `Spacebar` is the legacy name for space.
pub const NAV_KEYS: &[&str] = &["ArrowRight", "Enter", " ", "Spacebar"];

pub const SWIPE_MIN_DISTANCE_PX: f64 = 40.0;
pub const SWIPE_MAX_DURATION_MS: f64 = 600.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// Fast, mostly horizontal stroke.
    Swipe,
    Tap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Advance and suppress the browser default (scrolling, button activation).
    Advance,
    Ignore,
}

#[derive(Clone, Copy, Debug)]
struct TouchStart {
    point: TouchPoint,
    at_ms: f64,
}

#[derive(Debug, Default)]
pub struct InputNormalizer {
    touch_start: Option<TouchStart>,
}

impl InputNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Touch pointers are left to the touch handlers so a tap does not fire twice.
    pub fn pointer_down(&self, pointer_type: &str) -> bool {
        pointer_type != "touch"
    }

    pub fn key_down(&self, key: &str, code: &str) -> KeyAction {
        if NAV_KEYS.contains(&key) || code == "Space" {
            KeyAction::Advance
        } else {
            KeyAction::Ignore
        }
    }

    /// Record a single-finger start; multi-touch starts are ignored.
    pub fn touch_start(&mut self, touches: &[TouchPoint], now_ms: f64) {
        if let [point] = touches {
            self.touch_start = Some(TouchStart { point: *point, at_ms: now_ms });
        }
    }

    /// Complete a gesture. Any completed gesture advances; the classification is
    /// reported but does not change the outcome.
    pub fn touch_end(&mut self, changed: &[TouchPoint], now_ms: f64) -> Option<Gesture> {
        let start = self.touch_start?;
        let [end] = changed else {
            return None;
        };
        self.touch_start = None;
        let gesture = classify(end.x - start.point.x, end.y - start.point.y, now_ms - start.at_ms);
        trace!(?gesture, "touch gesture completed");
        Some(gesture)
    }

    pub fn touch_cancel(&mut self) {
        self.touch_start = None;
    }

    pub fn has_pending_touch(&self) -> bool {
        self.touch_start.is_some()
    }
}

pub fn classify(dx: f64, dy: f64, dt_ms: f64) -> Gesture {
    if dt_ms <= SWIPE_MAX_DURATION_MS && dx.abs() > dy.abs() && dx.abs() > SWIPE_MIN_DISTANCE_PX {
        Gesture::Swipe
    } else {
        Gesture::Tap
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::InputBindings;

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gloo::events::{EventListener, EventListenerOptions};
    use wasm_bindgen::JsCast;
    use web_sys::{Document, Element, KeyboardEvent, PointerEvent, TouchEvent, TouchList};

    use super::{InputNormalizer, KeyAction, TouchPoint};

    fn points(list: &TouchList) -> Vec<TouchPoint> {
        (0..list.length())
            .filter_map(|i| list.get(i))
            .map(|t| TouchPoint { x: t.client_x() as f64, y: t.client_y() as f64 })
            .collect()
    }

    /// Live DOM listeners; dropping this detaches them.
    pub struct InputBindings {
        _listeners: Vec<EventListener>,
    }

    impl InputBindings {
        pub fn bind(stage: &Element, document: &Document, on_advance: Rc<dyn Fn()>) -> Self {
            let normalizer = Rc::new(RefCell::new(InputNormalizer::new()));
            let mut listeners = Vec::with_capacity(5);

            {
                let normalizer = normalizer.clone();
                let on_advance = on_advance.clone();
                listeners.push(EventListener::new(stage, "pointerdown", move |event| {
                    let pointer_type = event
                        .dyn_ref::<PointerEvent>()
                        .map(|e| e.pointer_type())
                        .unwrap_or_default();
                    if normalizer.borrow().pointer_down(&pointer_type) {
                        on_advance();
                    }
                }));
            }
            {
                let normalizer = normalizer.clone();
                let on_advance = on_advance.clone();
                listeners.push(EventListener::new_with_options(
                    document,
                    "keydown",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                            return;
                        };
                        if normalizer.borrow().key_down(&key.key(), &key.code()) == KeyAction::Advance {
                            event.prevent_default();
                            on_advance();
                        }
                    },
                ));
            }
            {
                let normalizer = normalizer.clone();
                // default options are passive
                listeners.push(EventListener::new(stage, "touchstart", move |event| {
                    if let Some(touch) = event.dyn_ref::<TouchEvent>() {
                        normalizer.borrow_mut().touch_start(&points(&touch.touches()), js_sys::Date::now());
                    }
                }));
            }
            {
                let normalizer = normalizer.clone();
                let on_advance = on_advance.clone();
                listeners.push(EventListener::new(stage, "touchend", move |event| {
                    let Some(touch) = event.dyn_ref::<TouchEvent>() else {
                        return;
                    };
                    let gesture = normalizer
                        .borrow_mut()
                        .touch_end(&points(&touch.changed_touches()), js_sys::Date::now());
                    if gesture.is_some() {
                        on_advance();
                    }
                }));
            }
            {
                let normalizer = normalizer.clone();
                listeners.push(EventListener::new(stage, "touchcancel", move |_| {
                    normalizer.borrow_mut().touch_cancel();
                }));
            }

            Self { _listeners: listeners }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> TouchPoint {
        TouchPoint { x, y }
    }

    #[test]
    fn pointer_types() {
        let n = InputNormalizer::new();
        assert!(n.pointer_down("mouse"));
        assert!(n.pointer_down("pen"));
        assert!(!n.pointer_down("touch"));
    }

    #[test]
    fn nav_keys_advance() {
        let n = InputNormalizer::new();
        for key in ["ArrowRight", "Enter", " ", "Spacebar"] {
            assert_eq!(n.key_down(key, ""), KeyAction::Advance, "{key:?}");
        }
        assert_eq!(n.key_down("Unidentified", "Space"), KeyAction::Advance);
        assert_eq!(n.key_down("ArrowLeft", "ArrowLeft"), KeyAction::Ignore);
        assert_eq!(n.key_down("a", "KeyA"), KeyAction::Ignore);
    }

    #[test]
    fn every_completed_touch_advances() {
        let mut n = InputNormalizer::new();
        n.touch_start(&[pt(100.0, 100.0)], 0.0);
        assert_eq!(n.touch_end(&[pt(200.0, 110.0)], 200.0), Some(Gesture::Swipe));
        assert!(!n.has_pending_touch());

        n.touch_start(&[pt(100.0, 100.0)], 0.0);
        assert_eq!(n.touch_end(&[pt(102.0, 101.0)], 90.0), Some(Gesture::Tap));

        // slow stroke
        n.touch_start(&[pt(0.0, 0.0)], 0.0);
        assert_eq!(n.touch_end(&[pt(300.0, 0.0)], 900.0), Some(Gesture::Tap));
    }

    #[test]
    fn touch_end_without_start_is_ignored() {
        let mut n = InputNormalizer::new();
        assert_eq!(n.touch_end(&[pt(1.0, 1.0)], 10.0), None);
    }

    #[test]
    fn multi_touch_is_ignored() {
        let mut n = InputNormalizer::new();
        n.touch_start(&[pt(0.0, 0.0), pt(50.0, 50.0)], 0.0);
        assert!(!n.has_pending_touch());

        n.touch_start(&[pt(0.0, 0.0)], 0.0);
        assert_eq!(n.touch_end(&[pt(0.0, 0.0), pt(9.0, 9.0)], 5.0), None);
        // start survives a rejected end
        assert!(n.has_pending_touch());
    }

    #[test]
    fn cancel_clears_without_advancing() {
        let mut n = InputNormalizer::new();
        n.touch_start(&[pt(5.0, 5.0)], 0.0);
        n.touch_cancel();
        assert!(!n.has_pending_touch());
        assert_eq!(n.touch_end(&[pt(5.0, 5.0)], 10.0), None);
    }

    #[test]
    fn classify_thresholds() {
        assert_eq!(classify(41.0, 0.0, 600.0), Gesture::Swipe);
        assert_eq!(classify(-41.0, 10.0, 100.0), Gesture::Swipe);
        assert_eq!(classify(40.0, 0.0, 100.0), Gesture::Tap);
        assert_eq!(classify(50.0, 60.0, 100.0), Gesture::Tap);
        assert_eq!(classify(100.0, 0.0, 601.0), Gesture::Tap);
    }
}
