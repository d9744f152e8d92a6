//! Robust orientation predicate.
//!
//! A floating-point filter decides the easy cases; the rest fall through to
//! double-double evaluation of the same determinant, whose sign is exact for
//! all practical inputs.

use super::dd::{sign_of_det2x2, Dd};
use crate::cfg::DP_SAFE_EPSILON;
use crate::geom::Coord;

/// Turn direction of `q` relative to the directed line `p1 → p2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Clockwise,
    Collinear,
    CounterClockwise,
}

impl Orientation {
    #[inline]
    pub fn index(self) -> i32 {
        match self {
            Orientation::Clockwise => -1,
            Orientation::Collinear => 0,
            Orientation::CounterClockwise => 1,
        }
    }

    #[inline]
    fn from_index(i: i32) -> Self {
        match i.signum() {
            1 => Orientation::CounterClockwise,
            -1 => Orientation::Clockwise,
            _ => Orientation::Collinear,
        }
    }
}

/// Orientation of `q` relative to `p1 → p2`.
#[inline]
pub fn orientation(p1: Coord, p2: Coord, q: Coord) -> Orientation {
    Orientation::from_index(orientation_index(p1, p2, q))
}

/// Orientation as -1 / 0 / 1.
#[inline]
pub fn orientation_index(p1: Coord, p2: Coord, q: Coord) -> i32 {
    orientation_index_xy(p1.x, p1.y, p2.x, p2.y, q.x, q.y)
}

pub(crate) fn orientation_index_xy(
    p1x: f64,
    p1y: f64,
    p2x: f64,
    p2y: f64,
    qx: f64,
    qy: f64,
) -> i32 {
    if let Some(index) = orientation_filter(p1x, p1y, p2x, p2y, qx, qy) {
        return index;
    }
    let dx1 = Dd::new(p2x) - p1x;
    let dy1 = Dd::new(p2y) - p1y;
    let dx2 = Dd::new(qx) - p2x;
    let dy2 = Dd::new(qy) - p2y;
    sign_of_det2x2(dx1, dy1, dx2, dy2)
}

#[inline]
fn sign(v: f64) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Fast path: returns the sign when the plain determinant is provably correct.
fn orientation_filter(pax: f64, pay: f64, pbx: f64, pby: f64, pcx: f64, pcy: f64) -> Option<i32> {
    let det_left = (pax - pcx) * (pby - pcy);
    let det_right = (pay - pcy) * (pbx - pcx);
    let det = det_left - det_right;
    let det_sum = if det_left > 0.0 {
        if det_right <= 0.0 {
            return Some(sign(det));
        }
        det_left + det_right
    } else if det_left < 0.0 {
        if det_right >= 0.0 {
            return Some(sign(det));
        }
        -det_left - det_right
    } else {
        return Some(sign(det));
    };
    let err_bound = DP_SAFE_EPSILON * det_sum;
    if det >= err_bound || -det >= err_bound {
        return Some(sign(det));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_turns() {
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(1.0, 0.0);
        assert_eq!(orientation(a, b, Coord::new(0.5, 1.0)), Orientation::CounterClockwise);
        assert_eq!(orientation(a, b, Coord::new(0.5, -1.0)), Orientation::Clockwise);
        assert_eq!(orientation(a, b, Coord::new(7.0, 0.0)), Orientation::Collinear);
        assert_eq!(Orientation::Clockwise.index(), -1);
    }

    #[test]
    fn points_on_a_decimal_line_are_consistent() {
        // Naive evaluation of this classic case yields inconsistent signs under
        // permutation; the robust predicate must be antisymmetric.
        let p1 = Coord::new(0.1, 0.1);
        let p2 = Coord::new(0.3, 0.3);
        let q = Coord::new(0.2, 0.2);
        let o1 = orientation_index(p1, p2, q);
        let o2 = orientation_index(p2, p1, q);
        assert_eq!(o1, -o2);
        let o3 = orientation_index(q, p1, p2);
        assert_eq!(o1, o3);
    }

    #[test]
    fn nearly_collinear_far_from_origin() {
        let p1 = Coord::new(1e15, 1e15);
        let p2 = Coord::new(1e15 + 2.0, 1e15 + 2.0);
        let on = Coord::new(1e15 + 1.0, 1e15 + 1.0);
        let off = Coord::new(1e15 + 1.0, 1e15 + 1.125);
        assert_eq!(orientation_index(p1, p2, on), 0);
        assert_eq!(orientation_index(p1, p2, off), 1);
    }
}
