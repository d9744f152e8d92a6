//! 2D coordinate with an optional carried Z.

use std::cmp::Ordering;
use std::fmt;

use nalgebra::Vector2;

/// A planar coordinate. `z` is carried through noding but never used by predicates.
///
/// Equality (`==`) is exact 2D equality: `z` is ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Coord {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    #[inline]
    pub const fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    #[inline]
    pub fn equals_2d(&self, other: &Coord) -> bool {
        self.x == other.x && self.y == other.y
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn xy(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    #[inline]
    pub fn from_xy(v: Vector2<f64>) -> Self {
        Self::new(v.x, v.y)
    }

    #[inline]
    pub fn distance(&self, other: &Coord) -> f64 {
        (self.xy() - other.xy()).norm()
    }

    /// Lexicographic (x, then y) total order.
    #[inline]
    pub fn compare_xy(&self, other: &Coord) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }

    /// Bit pattern of (x, y) with `-0.0` folded into `0.0`; a hash/set key.
    #[inline]
    pub(crate) fn key(&self) -> (u64, u64) {
        ((self.x + 0.0).to_bits(), (self.y + 0.0).to_bits())
    }
}

impl PartialEq for Coord {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.equals_2d(other)
    }
}

impl From<(f64, f64)> for Coord {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Coord::new(x, y)
    }
}

impl From<[f64; 2]> for Coord {
    #[inline]
    fn from([x, y]: [f64; 2]) -> Self {
        Coord::new(x, y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.z {
            Some(z) => write!(f, "({}, {}, {})", self.x, self.y, z),
            None => write!(f, "({}, {})", self.x, self.y),
        }
    }
}

/// Drop consecutive repeated points (2D equality). Keeps the first Z seen.
pub fn remove_repeated_points(pts: &[Coord]) -> Vec<Coord> {
    let mut out: Vec<Coord> = Vec::with_capacity(pts.len());
    for p in pts {
        if out.last().is_some_and(|last| last.equals_2d(p)) {
            continue;
        }
        out.push(*p);
    }
    out
}

/// Number of distinct 2D points in `pts`.
pub(crate) fn count_distinct(pts: &[Coord]) -> usize {
    let mut keys: Vec<(u64, u64)> = pts.iter().map(Coord::key).collect();
    keys.sort_unstable();
    keys.dedup();
    keys.len()
}
