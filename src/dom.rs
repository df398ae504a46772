//! Direct-manipulation view binding.
//!
//! `DomStage` finds the slideshow regions by their data roles (building the markup
//! into `<body>` when the page has none) and implements [`Stage`] on top of them.
//! Any region may be missing; operations on a missing region are no-ops.

use std::cell::RefCell;
use std::future::Future;
use std::mem;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, MediaQueryList, Window};

use crate::animator::{Surface, Transition, animate_with_class};
use crate::config::SlideshowConfig;
use crate::error::{SlideshowError, SlideshowResult};
use crate::flow::{Stage, TRANSITION_GRACE_MS, progress_value_now};
use crate::geometry::Rect;
use crate::hearts::{BurstRequest, HeartParticle, LiveHearts};
use crate::motion::MotionPreference;

pub const STAGE_SELECTOR: &str = ".stage";
pub const INTRO_SELECTOR: &str = ".intro";
pub const INTRO_TITLE_SELECTOR: &str = "[data-role=\"intro-title\"]";
pub const MESSAGE_AREA_SELECTOR: &str = "[data-role=\"message-area\"]";
pub const MESSAGE_TEXT_SELECTOR: &str = "[data-role=\"message-text\"]";
pub const HEARTS_LAYER_SELECTOR: &str = "[data-role=\"hearts-layer\"]";
pub const PROGRESS_SELECTOR: &str = ".progress";
pub const PROGRESS_FILL_SELECTOR: &str = "[data-role=\"progress-fill\"]";

const HIDDEN_CLASS: &str = "is-hidden";
const MESSAGE_VISIBLE_CLASS: &str = "message-area--visible";
const HEART_EASING: &str = "cubic-bezier(0.22, 1, 0.36, 1)";

pub struct DomStage {
    document: Document,
    root: HtmlElement,
    intro: Option<HtmlElement>,
    intro_title: Option<HtmlElement>,
    message_area: Option<HtmlElement>,
    message_text: Option<HtmlElement>,
    hearts_layer: Option<HtmlElement>,
    progress: Option<HtmlElement>,
    progress_fill: Option<HtmlElement>,
    compact: Option<MediaQueryList>,
    motion: MotionPreference,
    heart_src: String,
    heart_color: String,
    reduced_heart_cap_ms: u32,
}

impl DomStage {
    /// Bind to existing markup, or build it when the page has no `.stage`.
    pub fn mount(
        window: &Window,
        document: &Document,
        config: &SlideshowConfig,
        motion: MotionPreference,
    ) -> SlideshowResult<Self> {
        let root = match find(document, STAGE_SELECTOR) {
            Some(root) => root,
            None => {
                let root = build_markup(document, config)?;
                let body = document.body().ok_or(SlideshowError::NoDocument)?;
                body.append_child(&root)?;
                tracing::debug!("slideshow markup built");
                root
            }
        };

        let lookup = |selector: &str| {
            let found = find_in(&root, selector);
            if found.is_none() {
                tracing::warn!(selector, "slideshow region not found");
            }
            found
        };

        Ok(Self {
            document: document.clone(),
            intro: lookup(INTRO_SELECTOR),
            intro_title: lookup(INTRO_TITLE_SELECTOR),
            message_area: lookup(MESSAGE_AREA_SELECTOR),
            message_text: lookup(MESSAGE_TEXT_SELECTOR),
            hearts_layer: lookup(HEARTS_LAYER_SELECTOR),
            progress: lookup(PROGRESS_SELECTOR),
            progress_fill: lookup(PROGRESS_FILL_SELECTOR),
            root,
            compact: window.match_media(&config.compact_query()).ok().flatten(),
            motion,
            heart_src: config.heart_src.clone(),
            heart_color: config.hearts.color.clone(),
            reduced_heart_cap_ms: config.hearts.reduced_lifetime_cap_ms,
        })
    }

    /// The `.stage` element that receives pointer and touch input.
    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    fn surface(&self, surface: Surface) -> Option<&HtmlElement> {
        match surface {
            Surface::Intro => self.intro.as_ref(),
            Surface::IntroTitle => self.intro_title.as_ref(),
            Surface::Message => self.message_area.as_ref(),
        }
    }

    fn heart_element(&self, heart: &HeartParticle, reduced: bool) -> SlideshowResult<HtmlImageElement> {
        let img: HtmlImageElement = self.document.create_element("img")?.dyn_into().map_err(|_| {
            SlideshowError::JavaScript("img is not an HtmlImageElement".into())
        })?;
        img.set_src(&self.heart_src);
        img.set_alt("");
        img.set_class_name("heart");
        img.set_attribute("aria-hidden", "true")?;

        let style = img.style();
        style.set_property("width", &format!("{}px", heart.size)).ok();
        style.set_property("height", &format!("{}px", heart.size)).ok();
        style.set_property("left", &format!("{}px", heart.left)).ok();
        style.set_property("top", &format!("{}px", heart.top)).ok();
        style.set_property("color", &self.heart_color).ok();
        style.set_property("--heart-rotation", &format!("{}deg", heart.rotation_deg)).ok();
        if reduced {
            style.set_property("animation", "none").ok();
            style.set_property("opacity", "1").ok();
            style
                .set_property("transform", &format!("translateY(0) scale(1) rotate({}deg)", heart.rotation_deg))
                .ok();
        } else {
            let animation = format!("float-up-fade {}ms {} forwards", heart.duration_ms, HEART_EASING);
            style.set_property("animation", &animation).ok();
        }
        Ok(img)
    }
}

/// Whichever of a heart's end listener and fallback timer fires first retires it and
/// drops the other.
#[derive(Default)]
struct HeartTeardown {
    on_end: Option<EventListener>,
    fallback: Option<Timeout>,
}

impl Stage for DomStage {
    fn transition(&self, surface: Surface, transition: Transition) -> impl Future<Output = ()> {
        let element = self.surface(surface).cloned();
        let reduced = self.motion.reduced();
        async move {
            animate_with_class(element.as_ref(), transition.class_name(), reduced).await;
        }
    }

    fn clear_transition(&self, surface: Surface, transition: Transition) {
        if let Some(el) = self.surface(surface) {
            el.class_list().remove_1(transition.class_name()).ok();
        }
    }

    fn set_intro_interactive(&self, interactive: bool) {
        if let Some(intro) = &self.intro {
            let value = if interactive { "auto" } else { "none" };
            intro.style().set_property("pointer-events", value).ok();
        }
    }

    fn hide_intro(&self) {
        if let Some(intro) = &self.intro {
            intro.class_list().add_1(HIDDEN_CLASS).ok();
        }
    }

    fn set_message(&self, text: &str) {
        if let Some(el) = &self.message_text {
            el.set_text_content(Some(text));
        }
    }

    fn set_message_visible(&self, visible: bool) {
        if let Some(area) = &self.message_area {
            area.class_list().toggle_with_force(MESSAGE_VISIBLE_CLASS, visible).ok();
        }
    }

    fn set_progress(&self, percent: f64) {
        if let Some(fill) = &self.progress_fill {
            fill.style().set_property("width", &format!("{percent}%")).ok();
        }
        if let Some(bar) = &self.progress {
            bar.set_attribute("aria-valuenow", &progress_value_now(percent).to_string()).ok();
        }
    }

    fn burst_request(&self) -> Option<BurstRequest> {
        let rect = |el: &Option<HtmlElement>| {
            el.as_ref().map(|el| {
                let r = el.get_bounding_client_rect();
                Rect::new(r.left(), r.top(), r.width(), r.height())
            })
        };
        Some(BurstRequest {
            layer: rect(&self.hearts_layer)?,
            message: rect(&self.message_area)?,
            progress: rect(&self.progress)?,
            compact: self.compact.as_ref().is_some_and(MediaQueryList::matches),
        })
    }

    fn render_hearts(&self, hearts: &[HeartParticle], live: &LiveHearts) {
        let Some(layer) = &self.hearts_layer else {
            return;
        };
        let reduced = self.motion.reduced();
        for heart in hearts {
            let img = match self.heart_element(heart, reduced) {
                Ok(img) => img,
                Err(err) => {
                    tracing::warn!(%err, "could not create heart");
                    live.retire(heart.id);
                    continue;
                }
            };
            if layer.append_child(&img).is_err() {
                live.retire(heart.id);
                continue;
            }

            let teardown: Rc<RefCell<HeartTeardown>> = Rc::default();
            let retire: Rc<dyn Fn()> = {
                let img = img.clone();
                let live = live.clone();
                let teardown = teardown.clone();
                let id = heart.id;
                Rc::new(move || {
                    let handles = mem::take(&mut *teardown.borrow_mut());
                    if live.retire(id) {
                        img.remove();
                    }
                    drop(handles);
                })
            };
            let visible_ms = heart.visible_ms(reduced, self.reduced_heart_cap_ms);
            let mut handles = teardown.borrow_mut();
            if reduced {
                handles.fallback = Some(Timeout::new(visible_ms, move || retire()));
            } else {
                let on_end = retire.clone();
                handles.on_end = Some(EventListener::once(&img, "animationend", move |_| on_end()));
                handles.fallback =
                    Some(Timeout::new(visible_ms.saturating_add(TRANSITION_GRACE_MS), move || retire()));
            }
        }
    }

    fn delay(&self, ms: u32) -> impl Future<Output = ()> {
        TimeoutFuture::new(ms)
    }
}

// --- Markup ------------------------------------------------------------------

fn find(document: &Document, selector: &str) -> Option<HtmlElement> {
    document.query_selector(selector).ok().flatten()?.dyn_into().ok()
}

fn find_in(root: &Element, selector: &str) -> Option<HtmlElement> {
    root.query_selector(selector).ok().flatten()?.dyn_into().ok()
}

fn element(document: &Document, tag: &str, class: &str, attrs: &[(&str, &str)]) -> SlideshowResult<HtmlElement> {
    let el: HtmlElement = document
        .create_element(tag)?
        .dyn_into()
        .map_err(|_| SlideshowError::JavaScript(format!("<{tag}> is not an HtmlElement")))?;
    el.set_class_name(class);
    for (name, value) in attrs {
        el.set_attribute(name, value)?;
    }
    Ok(el)
}

/// Build the slideshow regions, detached.
pub fn build_markup(document: &Document, config: &SlideshowConfig) -> SlideshowResult<HtmlElement> {
    let stage = element(document, "main", "stage", &[("role", "main")])?;

    let intro = element(document, "section", "intro", &[("aria-live", "polite")])?;
    let title = element(document, "h1", "intro__title", &[("data-role", "intro-title")])?;
    title.set_text_content(Some(&config.intro_title));
    let hint = element(document, "p", "intro__hint", &[])?;
    hint.set_text_content(Some(&config.intro_hint));
    intro.append_child(&title)?;
    intro.append_child(&hint)?;

    let message_area = element(
        document,
        "section",
        "message-area",
        &[("data-role", "message-area"), ("aria-live", "polite"), ("aria-atomic", "true")],
    )?;
    let message = element(document, "p", "message", &[("data-role", "message-text")])?;
    message_area.append_child(&message)?;

    let hearts = element(document, "div", "hearts", &[("data-role", "hearts-layer"), ("aria-hidden", "true")])?;

    let progress = element(
        document,
        "div",
        "progress",
        &[
            ("role", "progressbar"),
            ("aria-label", config.progress_label.as_str()),
            ("aria-valuemin", "0"),
            ("aria-valuemax", "100"),
            ("aria-valuenow", "0"),
        ],
    )?;
    progress.append_child(&element(document, "span", "progress__track", &[])?)?;
    progress.append_child(&element(document, "span", "progress__fill", &[("data-role", "progress-fill")])?)?;

    for child in [&intro, &message_area, &hearts, &progress] {
        stage.append_child(child)?;
    }
    Ok(stage)
}
