//! Randomized geometry helpers: bounded random integers, heart size ranges and the
//! axis-aligned rectangle overlap test used when scattering hearts.

use rand::Rng;

use crate::hearts::HeartSettings;

/// Axis-aligned rectangle in viewport pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Build from edges; inverted edges produce an empty rect at `left`/`top`.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            width: (right - left).max(0.0),
            height: (bottom - top).max(0.0),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// Square of side `size` at (`left`, `top`).
    pub fn square(left: f64, top: f64, size: f64) -> Self {
        Self::new(left, top, size, size)
    }
}

/// Uniform integer in `min..=max`. A degenerate range (`max <= min`) yields `min`.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Heart size range for the current device class.
pub fn size_range(compact: bool, settings: &HeartSettings) -> (u32, u32) {
    if compact {
        settings.compact_size
    } else {
        settings.normal_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn overlap_examples() {
        let a = Rect::from_edges(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::from_edges(5.0, 5.0, 15.0, 15.0)));
        assert!(!a.overlaps(&Rect::from_edges(20.0, 20.0, 30.0, 30.0)));
        // shared edge only
        assert!(!a.overlaps(&Rect::from_edges(10.0, 0.0, 20.0, 10.0)));
        assert!(!a.overlaps(&Rect::from_edges(0.0, 10.0, 10.0, 20.0)));
    }

    #[test]
    fn overlap_is_symmetric_and_covers_containment() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn random_int_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let v = random_int(&mut rng, -25, 25);
            assert!((-25..=25).contains(&v));
        }
        assert_eq!(random_int(&mut rng, 5, 5), 5);
        assert_eq!(random_int(&mut rng, 9, 3), 9);
    }

    #[test]
    fn size_range_follows_device_class() {
        let settings = HeartSettings::default();
        assert_eq!(size_range(true, &settings), (14, 32));
        assert_eq!(size_range(false, &settings), (18, 40));
    }
}
