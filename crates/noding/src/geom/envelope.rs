//! Axis-aligned bounding box.
//!
//! Invariants
//! - Non-empty: `min_x <= max_x` and `min_y <= max_y`.
//! - Empty is a distinguished state (the `Default`), absorbed by the first expansion.

use super::Coord;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::empty()
    }
}

impl Envelope {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    #[inline]
    pub fn from_coord(p: Coord) -> Self {
        Self {
            min_x: p.x,
            max_x: p.x,
            min_y: p.y,
            max_y: p.y,
        }
    }

    /// Bounding box of the segment `p`–`q`.
    #[inline]
    pub fn from_segment(p: Coord, q: Coord) -> Self {
        Self {
            min_x: p.x.min(q.x),
            max_x: p.x.max(q.x),
            min_y: p.y.min(q.y),
            max_y: p.y.max(q.y),
        }
    }

    pub fn from_coords(pts: &[Coord]) -> Self {
        let mut env = Self::empty();
        for p in pts {
            env.expand_to_include(*p);
        }
        env
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.min_x
    }
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.max_x
    }
    #[inline]
    pub fn min_y(&self) -> f64 {
        self.min_y
    }
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    /// Centre of a non-empty envelope.
    #[inline]
    pub fn centre(&self) -> Option<Coord> {
        if self.is_empty() {
            return None;
        }
        Some(Coord::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        ))
    }

    #[inline]
    pub fn expand_to_include(&mut self, p: Coord) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    #[inline]
    pub fn expand_to_include_env(&mut self, other: &Envelope) {
        if other.is_empty() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Grow by `d` on every side (no-op when empty).
    #[inline]
    pub fn expanded_by(&self, d: f64) -> Envelope {
        if self.is_empty() {
            return *self;
        }
        Envelope {
            min_x: self.min_x - d,
            max_x: self.max_x + d,
            min_y: self.min_y - d,
            max_y: self.max_y + d,
        }
    }

    /// Closed-box overlap test; empty envelopes intersect nothing.
    #[inline]
    pub fn intersects(&self, other: &Envelope) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        !(other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }

    #[inline]
    pub fn contains_coord(&self, p: &Coord) -> bool {
        !self.is_empty()
            && p.x >= self.min_x
            && p.x <= self.max_x
            && p.y >= self.min_y
            && p.y <= self.max_y
    }

    /// True if `q` lies in the closed box spanned by `p1`–`p2`.
    #[inline]
    pub fn segment_contains(p1: Coord, p2: Coord, q: Coord) -> bool {
        q.x >= p1.x.min(p2.x) && q.x <= p1.x.max(p2.x) && q.y >= p1.y.min(p2.y) && q.y <= p1.y.max(p2.y)
    }

    /// True if the boxes spanned by `p1`–`p2` and `q1`–`q2` overlap.
    #[inline]
    pub fn segments_intersect(p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> bool {
        let min_q = q1.x.min(q2.x);
        let max_q = q1.x.max(q2.x);
        let min_p = p1.x.min(p2.x);
        let max_p = p1.x.max(p2.x);
        if min_p > max_q || max_p < min_q {
            return false;
        }
        let min_q = q1.y.min(q2.y);
        let max_q = q1.y.max(q2.y);
        let min_p = p1.y.min(p2.y);
        let max_p = p1.y.max(p2.y);
        !(min_p > max_q || max_p < min_q)
    }
}
