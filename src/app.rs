//! Browser bootstrap.
//!
//! Wires the motion gate, the DOM stage, the controller and the input listeners
//! together and keeps them alive for the life of the page.

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlElement, window};

use crate::config::SlideshowConfig;
use crate::dom::DomStage;
use crate::error::{SlideshowError, SlideshowResult};
use crate::flow::{FlowController, Phase};
use crate::input::InputBindings;
use crate::motion::MotionGate;

type Controller = FlowController<DomStage, StdRng>;

struct App {
    controller: Rc<Controller>,
    _motion: MotionGate,
    _inputs: InputBindings,
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

pub fn start(config: SlideshowConfig) -> SlideshowResult<()> {
    config.validate()?;
    let win = window().ok_or(SlideshowError::NoWindow)?;
    let doc = win.document().ok_or(SlideshowError::NoDocument)?;
    let root: HtmlElement = doc
        .document_element()
        .ok_or(SlideshowError::NoDocument)?
        .dyn_into()
        .map_err(|_| SlideshowError::MissingElement("html".into()))?;

    let motion = MotionGate::watch(&win, root, config.durations)?;
    let stage = DomStage::mount(&win, &doc, &config, motion.preference())?;
    let stage_el = stage.root().clone();
    let controller = FlowController::new(stage, &config, motion.preference(), StdRng::from_entropy());

    play_intro_entry(&controller);
    {
        let controller = controller.clone();
        motion.on_change(move |_| {
            if controller.phase() == Phase::Intro {
                play_intro_entry(&controller);
            }
        });
    }

    let on_advance: Rc<dyn Fn()> = {
        let controller = controller.clone();
        Rc::new(move || {
            drive(&controller);
        })
    };
    let inputs = InputBindings::bind(&stage_el, &doc, on_advance);

    tracing::info!(messages = config.messages.len(), "slideshow started");
    APP.with(|app| {
        app.replace(Some(App { controller, _motion: motion, _inputs: inputs }));
    });
    Ok(())
}

/// Advance the running slideshow; false when the input was dropped or nothing runs.
pub fn advance() -> bool {
    APP.with(|app| app.borrow().as_ref().map(|app| drive(&app.controller)).unwrap_or(false))
}

fn drive(controller: &Rc<Controller>) -> bool {
    match controller.advance() {
        Some(transition) => {
            spawn_local(transition);
            true
        }
        None => false,
    }
}

fn play_intro_entry(controller: &Rc<Controller>) {
    spawn_local(controller.play_intro_entry());
}
