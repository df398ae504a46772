//! Heart burst generation.
//!
//! Each message reveal scatters a small batch of decorative hearts over the particle
//! layer. Placement is best effort: every heart gets a bounded number of attempts to
//! land clear of the message area and the progress bar, after which the last drawn
//! position is kept. Hearts are never checked against each other.

use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, random_int, size_range};

// --- Settings ----------------------------------------------------------------

/// Tunables for a burst. Ranges are inclusive `(min, max)` pairs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeartSettings {
    pub count: (u32, u32),
    pub lifetime_ms: (u32, u32),
    pub rotation_deg: (i32, i32),
    pub compact_size: (u32, u32),
    pub normal_size: (u32, u32),
    pub placement_attempts: u32,
    /// Upper bound on how long a heart stays on screen under reduced motion.
    pub reduced_lifetime_cap_ms: u32,
    pub color: String,
}

impl Default for HeartSettings {
    fn default() -> Self {
        Self {
            count: (2, 6),
            lifetime_ms: (1200, 2200),
            rotation_deg: (-25, 25),
            compact_size: (14, 32),
            normal_size: (18, 40),
            placement_attempts: 8,
            reduced_lifetime_cap_ms: 400,
            color: "#ff8fb3".to_string(),
        }
    }
}

// --- Particles ---------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeartId(pub u64);

/// One decorative heart. Coordinates are relative to the particle layer origin.
#[derive(Clone, Debug, PartialEq)]
pub struct HeartParticle {
    pub id: HeartId,
    pub size: f64,
    pub left: f64,
    pub top: f64,
    pub duration_ms: u32,
    pub rotation_deg: i32,
}

impl HeartParticle {
    /// Lifetime actually used on screen; reduced motion caps it.
    pub fn visible_ms(&self, reduced_motion: bool, cap_ms: u32) -> u32 {
        if reduced_motion { self.duration_ms.min(cap_ms) } else { self.duration_ms }
    }
}

/// Geometry snapshot the burst is computed against (all rects share one coordinate space).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstRequest {
    pub layer: Rect,
    pub message: Rect,
    pub progress: Rect,
    /// Small-viewport sizing.
    pub compact: bool,
}

/// Burst generator. Owns the id counter so ids stay unique across bursts.
#[derive(Debug)]
pub struct HeartBurst {
    settings: HeartSettings,
    next_id: u64,
}

impl HeartBurst {
    pub fn new(settings: HeartSettings) -> Self {
        Self { settings, next_id: 0 }
    }

    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R, request: &BurstRequest) -> Vec<HeartParticle> {
        let s = &self.settings;
        let (min_size, max_size) = size_range(request.compact, s);
        let count = random_int(rng, s.count.0 as i64, s.count.1 as i64).max(0) as usize;
        let mut hearts = Vec::with_capacity(count);

        for _ in 0..count {
            let size = random_int(rng, min_size as i64, max_size as i64) as f64;
            let duration_ms = random_int(rng, s.lifetime_ms.0 as i64, s.lifetime_ms.1 as i64) as u32;
            let rotation_deg = random_int(rng, s.rotation_deg.0 as i64, s.rotation_deg.1 as i64) as i32;
            let (left, top) = place(rng, request, size, s.placement_attempts);

            hearts.push(HeartParticle {
                id: HeartId(self.next_id),
                size,
                left: left - request.layer.left,
                top: top - request.layer.top,
                duration_ms,
                rotation_deg,
            });
            self.next_id += 1;
        }
        hearts
    }
}

/// Draw positions inside the layer until one clears both reserved rects, or give up
/// and keep the last draw.
fn place<R: Rng + ?Sized>(rng: &mut R, request: &BurstRequest, size: f64, attempts: u32) -> (f64, f64) {
    let layer = request.layer;
    let max_x = (layer.width - size).floor().max(0.0) as i64;
    let max_y = (layer.height - size).floor().max(0.0) as i64;
    let mut last = (layer.left, layer.top);
    for _ in 0..attempts.max(1) {
        let left = random_int(rng, 0, max_x) as f64 + layer.left;
        let top = random_int(rng, 0, max_y) as f64 + layer.top;
        last = (left, top);
        let candidate = Rect::square(left, top, size);
        if !candidate.overlaps(&request.message) && !candidate.overlaps(&request.progress) {
            return last;
        }
    }
    last
}

// --- Live set ----------------------------------------------------------------

/// Hearts currently on screen. The controller inserts bursts; the view retires each
/// heart through the same handle when its animation (or capped timer) ends.
#[derive(Clone, Debug, Default)]
pub struct LiveHearts(Rc<RefCell<Vec<HeartParticle>>>);

impl LiveHearts {
    pub fn insert_all(&self, hearts: &[HeartParticle]) {
        self.0.borrow_mut().extend_from_slice(hearts);
    }

    /// Remove a heart; returns false if it was already gone.
    pub fn retire(&self, id: HeartId) -> bool {
        let mut live = self.0.borrow_mut();
        match live.iter().position(|h| h.id == id) {
            Some(idx) => {
                live.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: HeartId) -> bool {
        self.0.borrow().iter().any(|h| h.id == id)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn snapshot(&self) -> Vec<HeartParticle> {
        self.0.borrow().clone()
    }
}
