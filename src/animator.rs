//! Transition animator.
//!
//! A transition is a CSS class on a surface whose keyframes do the visual work. The
//! browser animator adds the class, waits for the element's own `animationend` (or
//! two animation frames under reduced motion) and always takes the class off again.

/// Named regions of the rendered page that transitions target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    Intro,
    IntroTitle,
    Message,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Intro title entry.
    FadeIn,
    /// Intro exit.
    FadeOut,
    /// Message entry.
    FadeInUp,
    /// Message exit.
    FadeOutDown,
}

impl Transition {
    pub fn class_name(self) -> &'static str {
        match self {
            Transition::FadeIn => "fade-in",
            Transition::FadeOut => "fade-out",
            Transition::FadeInUp => "fade-in-up",
            Transition::FadeOutDown => "fade-out-down",
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{animate_with_class, next_frame};

#[cfg(target_arch = "wasm32")]
mod browser {
    use futures::channel::oneshot;
    use gloo::events::EventListener;
    use wasm_bindgen::JsValue;
    use web_sys::HtmlElement;

    /// Resolves on the next animation frame.
    pub async fn next_frame() {
        let (tx, rx) = oneshot::channel::<()>();
        let _frame = gloo::render::request_animation_frame(move |_| {
            let _ = tx.send(());
        });
        let _ = rx.await;
    }

    /// Removes the marker class when dropped, whichever way the animation ended.
    struct ClassMarker<'a> {
        element: &'a HtmlElement,
        class: &'a str,
    }

    impl Drop for ClassMarker<'_> {
        fn drop(&mut self) {
            let _ = self.element.class_list().remove_1(self.class);
        }
    }

    /// Play `class` on `element` and resolve once it has visibly finished.
    pub async fn animate_with_class(element: Option<&HtmlElement>, class: &str, reduced_motion: bool) {
        let Some(element) = element else {
            return;
        };
        let marker = ClassMarker { element, class };

        if reduced_motion {
            next_frame().await;
            let _ = element.class_list().add_1(class);
            next_frame().await;
            drop(marker);
            return;
        }

        let (tx, rx) = oneshot::channel::<()>();
        let mut tx = Some(tx);
        let own: JsValue = element.clone().into();
        // animationend bubbles; only our own element's end counts.
        let _listener = EventListener::new(element, "animationend", move |event| {
            let is_own = event.target().map(|t| JsValue::from(t) == own).unwrap_or(false);
            if is_own {
                if let Some(tx) = tx.take() {
                    let _ = tx.send(());
                }
            }
        });
        next_frame().await;
        let _ = element.class_list().add_1(class);
        let _ = rx.await;
        drop(marker);
    }
}
