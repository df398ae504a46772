//! Flow controller: the intro → messages state machine.
//!
//! One controller owns the phase, the message index, the busy flag and the live heart
//! set. Every user intent arrives as `advance()`. While a transition is in flight the
//! busy flag is held and further advances are dropped, never queued. The view is
//! reached only through [`Stage`], so the same controller drives the DOM binding in
//! the browser and scripted stages in tests.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::pin;
use std::rc::Rc;

use futures::future::{Either, FutureExt, LocalBoxFuture, select};
use rand::Rng;
use tracing::{debug, trace, warn};

use crate::animator::{Surface, Transition};
use crate::config::SlideshowConfig;
use crate::hearts::{BurstRequest, HeartBurst, HeartParticle, LiveHearts};
use crate::motion::{MotionDurations, MotionPreference};

/// Slack added to a transition's nominal duration before the controller stops
/// waiting for it.
pub const TRANSITION_GRACE_MS: u32 = 1_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Messages,
}

// --- View interface ----------------------------------------------------------

/// Everything the controller needs from the presentation layer.
pub trait Stage {
    /// Play `transition` on `surface`; resolves once it has visibly completed.
    /// A surface that is not rendered resolves immediately.
    fn transition(&self, surface: Surface, transition: Transition) -> impl Future<Output = ()>;
    /// Drop a transition's marker without waiting for it.
    fn clear_transition(&self, surface: Surface, transition: Transition);
    fn set_intro_interactive(&self, interactive: bool);
    fn hide_intro(&self);
    fn set_message(&self, text: &str);
    fn set_message_visible(&self, visible: bool);
    /// `percent` in 0..=100, unrounded.
    fn set_progress(&self, percent: f64);
    /// Current geometry for a burst, or `None` when a region is not rendered.
    fn burst_request(&self) -> Option<BurstRequest>;
    /// Show `hearts`; each one must be retired through `live` when it goes away.
    fn render_hearts(&self, hearts: &[HeartParticle], live: &LiveHearts);
    /// Timer used to bound every animation wait.
    fn delay(&self, ms: u32) -> impl Future<Output = ()>;
}

// --- Busy flag ---------------------------------------------------------------

/// Mutual-exclusion flag for transitions.
#[derive(Clone, Debug, Default)]
pub struct BusyFlag(Rc<Cell<bool>>);

impl BusyFlag {
    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    /// Set the flag unless it is already set. The flag clears when the guard drops.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        if self.0.replace(true) {
            return None;
        }
        Some(BusyGuard(Rc::clone(&self.0)))
    }
}

#[derive(Debug)]
pub struct BusyGuard(Rc<Cell<bool>>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

// --- Progress ----------------------------------------------------------------

/// Percentage of messages shown. `index` is the current message (`None` before the
/// first); an empty list reports 0.
pub fn compute_progress(index: Option<usize>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let shown = index.map_or(0, |i| i + 1);
    (shown as f64 / total as f64) * 100.0
}

/// Value for `aria-valuenow`.
pub fn progress_value_now(percent: f64) -> u32 {
    percent.round().max(0.0) as u32
}

// --- Controller --------------------------------------------------------------

pub struct FlowController<S, R> {
    stage: S,
    messages: Vec<String>,
    durations: MotionDurations,
    motion: MotionPreference,
    phase: Cell<Phase>,
    index: Cell<Option<usize>>,
    busy: BusyFlag,
    burst: RefCell<HeartBurst>,
    rng: RefCell<R>,
    hearts: LiveHearts,
}

impl<S: Stage + 'static, R: Rng + 'static> FlowController<S, R> {
    pub fn new(stage: S, config: &SlideshowConfig, motion: MotionPreference, rng: R) -> Rc<Self> {
        Rc::new(Self {
            stage,
            messages: config.messages.clone(),
            durations: config.durations,
            motion,
            phase: Cell::new(Phase::Intro),
            index: Cell::new(None),
            busy: BusyFlag::default(),
            burst: RefCell::new(HeartBurst::new(config.hearts.clone())),
            rng: RefCell::new(rng),
            hearts: LiveHearts::default(),
        })
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.index.get()
    }

    pub fn current_message(&self) -> Option<&str> {
        self.index.get().map(|i| self.messages[i].as_str())
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_animating(&self) -> bool {
        self.busy.is_set()
    }

    pub fn progress(&self) -> f64 {
        compute_progress(self.index.get(), self.messages.len())
    }

    pub fn live_hearts(&self) -> &LiveHearts {
        &self.hearts
    }

    /// Move the presentation forward one step.
    ///
    /// Returns the transition to drive, or `None` when the input is dropped: a
    /// transition is already in flight, the last message is showing, or there are no
    /// messages at all (the slideshow then stays on the intro). The busy flag is taken
    /// before this returns, so a second call in the same tick is always dropped.
    pub fn advance(self: &Rc<Self>) -> Option<LocalBoxFuture<'static, ()>> {
        if self.busy.is_set() {
            trace!("advance dropped: transition in flight");
            return None;
        }
        if self.messages.is_empty() {
            trace!("advance dropped: no messages configured");
            return None;
        }
        match self.phase.get() {
            Phase::Intro => {
                let guard = self.busy.try_acquire()?;
                Some(Rc::clone(self).leave_intro(guard).boxed_local())
            }
            Phase::Messages => self.show_next_message(),
        }
    }

    /// Play the intro title entry, bounded like every other transition. It does not
    /// take the busy flag: an advance may cut it short.
    pub fn play_intro_entry(self: &Rc<Self>) -> LocalBoxFuture<'static, ()> {
        let this = Rc::clone(self);
        async move { this.animate(Surface::IntroTitle, Transition::FadeIn).await }.boxed_local()
    }

    fn show_next_message(self: &Rc<Self>) -> Option<LocalBoxFuture<'static, ()>> {
        if self.busy.is_set() {
            return None;
        }
        let next = self.index.get().map_or(0, |i| i + 1);
        if next >= self.messages.len() {
            trace!(index = ?self.index.get(), "already on the last message");
            return None;
        }
        let guard = self.busy.try_acquire()?;
        Some(Rc::clone(self).reveal(next, guard).boxed_local())
    }

    async fn leave_intro(self: Rc<Self>, guard: BusyGuard) {
        debug!("leaving intro");
        self.stage.clear_transition(Surface::IntroTitle, Transition::FadeIn);
        self.stage.set_intro_interactive(false);
        self.animate(Surface::Intro, Transition::FadeOut).await;
        self.stage.hide_intro();
        self.phase.set(Phase::Messages);
        // Released before the first reveal, which takes the flag itself.
        drop(guard);
        if let Some(reveal) = self.show_next_message() {
            reveal.await;
        }
    }

    async fn reveal(self: Rc<Self>, next: usize, guard: BusyGuard) {
        if self.index.get().is_some() {
            self.animate(Surface::Message, Transition::FadeOutDown).await;
            self.stage.set_message_visible(false);
        }

        self.index.set(Some(next));
        self.stage.set_message(&self.messages[next]);
        self.stage.set_message_visible(true);
        self.animate(Surface::Message, Transition::FadeInUp).await;

        let percent = compute_progress(Some(next), self.messages.len());
        self.stage.set_progress(percent);
        self.spawn_hearts();
        debug!(index = next, percent, "message shown");
        drop(guard);
    }

    /// Await one animation, bounded by its duration plus [`TRANSITION_GRACE_MS`].
    async fn animate(&self, surface: Surface, transition: Transition) {
        let bound_ms = self
            .durations
            .effective(self.motion.reduced())
            .for_transition(transition)
            .saturating_add(TRANSITION_GRACE_MS);
        let play = pin!(self.stage.transition(surface, transition));
        let fallback = pin!(self.stage.delay(bound_ms));
        if let Either::Right(_) = select(play, fallback).await {
            warn!(?surface, ?transition, bound_ms, "animation did not report completion; continuing");
        }
    }

    fn spawn_hearts(&self) {
        let Some(request) = self.stage.burst_request() else {
            trace!("burst skipped: regions not rendered");
            return;
        };
        let hearts = {
            let mut rng = self.rng.borrow_mut();
            self.burst.borrow_mut().generate(&mut *rng, &request)
        };
        self.hearts.insert_all(&hearts);
        self.stage.render_hearts(&hearts, &self.hearts);
        trace!(count = hearts.len(), live = self.hearts.len(), "hearts spawned");
    }
}
