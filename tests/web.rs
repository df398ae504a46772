// Browser tests (wasm-bindgen-test). Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::pin::pin;
use std::rc::Rc;

use futures::future::{Either, select};
use gloo_timers::future::TimeoutFuture;
use heart_notes::animator::{animate_with_class, next_frame};
use heart_notes::dom::{DomStage, HEARTS_LAYER_SELECTOR, MESSAGE_TEXT_SELECTOR, PROGRESS_SELECTOR, STAGE_SELECTOR};
use heart_notes::motion::{MotionGate, sync_durations};
use heart_notes::{HeartId, HeartParticle, LiveHearts, MotionDurations, MotionPreference, SlideshowConfig, Stage};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use wasm_bindgen_test::*;
use web_sys::{Event, EventInit, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn scratch() -> HtmlElement {
    let el: HtmlElement = document().create_element("div").unwrap().dyn_into().unwrap();
    document().body().unwrap().append_child(&el).unwrap();
    el
}

#[wasm_bindgen_test]
async fn missing_surface_resolves_immediately() {
    animate_with_class(None, "fade-in", false).await;
}

#[wasm_bindgen_test]
async fn reduced_motion_animation_removes_its_marker() {
    let el = scratch();
    animate_with_class(Some(&el), "fade-out", true).await;
    assert!(!el.class_list().contains("fade-out"));
    el.remove();
}

#[wasm_bindgen_test]
fn duration_properties_follow_preference() {
    let el = scratch();
    sync_durations(&el, &MotionDurations::default(), false);
    assert_eq!(el.style().get_property_value("--message-in-duration").unwrap(), "700ms");
    sync_durations(&el, &MotionDurations::default(), true);
    assert_eq!(el.style().get_property_value("--intro-out-duration").unwrap(), "1ms");
    el.remove();
}

#[wasm_bindgen_test]
fn mount_builds_markup_and_publishes_progress() {
    let window = web_sys::window().unwrap();
    let doc = document();
    let config = SlideshowConfig::default();
    let stage = DomStage::mount(&window, &doc, &config, MotionPreference::new(true)).unwrap();
    assert!(doc.query_selector(STAGE_SELECTOR).unwrap().is_some());

    stage.set_message("halo");
    let text = doc.query_selector(MESSAGE_TEXT_SELECTOR).unwrap().unwrap();
    assert_eq!(text.text_content().as_deref(), Some("halo"));

    stage.set_progress(66.6);
    let bar = doc.query_selector(PROGRESS_SELECTOR).unwrap().unwrap();
    assert_eq!(bar.get_attribute("aria-valuenow").as_deref(), Some("67"));
    assert_eq!(bar.get_attribute("role").as_deref(), Some("progressbar"));
    assert!(stage.burst_request().is_some());
    stage.root().remove();
}

fn animation_end(bubbles: bool) -> Event {
    let init = EventInit::new();
    init.set_bubbles(bubbles);
    Event::new_with_event_init_dict("animationend", &init).unwrap()
}

fn heart(id: u64) -> HeartParticle {
    HeartParticle { id: HeartId(id), size: 20.0, left: 10.0, top: 10.0, duration_ms: 1500, rotation_deg: 5 }
}

fn heart_count(stage: &DomStage) -> u32 {
    let layer = stage.root().query_selector(HEARTS_LAYER_SELECTOR).unwrap().unwrap();
    layer.query_selector_all("img.heart").unwrap().length()
}

#[wasm_bindgen_test]
async fn animation_waits_for_its_own_end_event() {
    let el = scratch();
    let child = document().create_element("span").unwrap();
    el.append_child(&child).unwrap();

    let done = Rc::new(Cell::new(false));
    {
        let el = el.clone();
        let done = done.clone();
        spawn_local(async move {
            animate_with_class(Some(&el), "fade-in", false).await;
            done.set(true);
        });
    }
    next_frame().await;
    next_frame().await;
    assert!(el.class_list().contains("fade-in"));

    // a child's animation bubbling up is not ours
    child.dispatch_event(&animation_end(true)).unwrap();
    next_frame().await;
    assert!(!done.get());
    assert!(el.class_list().contains("fade-in"));

    el.dispatch_event(&animation_end(false)).unwrap();
    next_frame().await;
    assert!(done.get());
    assert!(!el.class_list().contains("fade-in"));
    el.remove();
}

#[wasm_bindgen_test]
async fn abandoned_animation_removes_its_marker() {
    let el = scratch();
    {
        let play = pin!(animate_with_class(Some(&el), "fade-out-down", false));
        let outcome = select(play, pin!(TimeoutFuture::new(100))).await;
        assert!(matches!(outcome, Either::Right(_)));
        assert!(el.class_list().contains("fade-out-down"));
    }
    assert!(!el.class_list().contains("fade-out-down"));
    el.remove();
}

#[wasm_bindgen_test]
async fn reduced_motion_hearts_retire_after_the_cap() {
    let window = web_sys::window().unwrap();
    let config = SlideshowConfig::default();
    let stage = DomStage::mount(&window, &document(), &config, MotionPreference::new(true)).unwrap();
    let live = LiveHearts::default();
    let hearts = [heart(1)];
    live.insert_all(&hearts);

    stage.render_hearts(&hearts, &live);
    assert_eq!(heart_count(&stage), 1);

    TimeoutFuture::new(config.hearts.reduced_lifetime_cap_ms + 50).await;
    assert!(live.is_empty());
    assert_eq!(heart_count(&stage), 0);
    stage.root().remove();
}

#[wasm_bindgen_test]
async fn heart_retires_on_animation_end() {
    let window = web_sys::window().unwrap();
    let config = SlideshowConfig::default();
    let stage = DomStage::mount(&window, &document(), &config, MotionPreference::new(false)).unwrap();
    let live = LiveHearts::default();
    let hearts = [heart(7)];
    live.insert_all(&hearts);

    stage.render_hearts(&hearts, &live);
    let layer = stage.root().query_selector(HEARTS_LAYER_SELECTOR).unwrap().unwrap();
    let img = layer.query_selector("img.heart").unwrap().unwrap();
    img.dispatch_event(&animation_end(false)).unwrap();

    assert!(live.is_empty());
    assert_eq!(heart_count(&stage), 0);
    // the fallback timer was dropped with the listener; nothing fires later
    TimeoutFuture::new(50).await;
    assert!(!live.contains(HeartId(7)));
    stage.root().remove();
}

#[wasm_bindgen_test]
fn motion_gate_publishes_the_media_query() {
    let window = web_sys::window().unwrap();
    let el = scratch();
    let gate = MotionGate::watch(&window, el.clone(), MotionDurations::default()).unwrap();
    assert_eq!(gate.reduced(), gate.preference().reduced());
    let expected = if gate.reduced() { "1ms" } else { "2000ms" };
    assert_eq!(el.style().get_property_value("--intro-in-duration").unwrap(), expected);
    el.remove();
}
