//! Double-double arithmetic (~106-bit significand) for exact-sign predicates.
//!
//! Built from the error-free transforms `two_sum` and `two_prod`
//! (`f64::mul_add` gives the exact product residual).

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::geom::Coord;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Dd {
    hi: f64,
    lo: f64,
}

#[inline]
fn two_sum(a: f64, b: f64) -> Dd {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    Dd { hi: s, lo: err }
}

#[inline]
fn quick_two_sum(a: f64, b: f64) -> Dd {
    let s = a + b;
    Dd {
        hi: s,
        lo: b - (s - a),
    }
}

#[inline]
fn two_prod(a: f64, b: f64) -> Dd {
    let p = a * b;
    Dd {
        hi: p,
        lo: a.mul_add(b, -p),
    }
}

impl Dd {
    #[inline]
    pub(crate) const fn new(v: f64) -> Self {
        Self { hi: v, lo: 0.0 }
    }

    #[inline]
    pub(crate) fn to_f64(self) -> f64 {
        self.hi + self.lo
    }

    #[inline]
    pub(crate) fn signum(self) -> i32 {
        if self.hi > 0.0 {
            1
        } else if self.hi < 0.0 {
            -1
        } else if self.lo > 0.0 {
            1
        } else if self.lo < 0.0 {
            -1
        } else {
            0
        }
    }
}

impl From<f64> for Dd {
    #[inline]
    fn from(v: f64) -> Self {
        Dd::new(v)
    }
}

impl Add for Dd {
    type Output = Dd;
    #[inline]
    fn add(self, rhs: Dd) -> Dd {
        let s = two_sum(self.hi, rhs.hi);
        let t = two_sum(self.lo, rhs.lo);
        let u = quick_two_sum(s.hi, s.lo + t.hi);
        quick_two_sum(u.hi, u.lo + t.lo)
    }
}

impl Add<f64> for Dd {
    type Output = Dd;
    #[inline]
    fn add(self, rhs: f64) -> Dd {
        self + Dd::new(rhs)
    }
}

impl Neg for Dd {
    type Output = Dd;
    #[inline]
    fn neg(self) -> Dd {
        Dd {
            hi: -self.hi,
            lo: -self.lo,
        }
    }
}

impl Sub for Dd {
    type Output = Dd;
    #[inline]
    fn sub(self, rhs: Dd) -> Dd {
        self + (-rhs)
    }
}

impl Sub<f64> for Dd {
    type Output = Dd;
    #[inline]
    fn sub(self, rhs: f64) -> Dd {
        self + Dd::new(-rhs)
    }
}

impl Mul for Dd {
    type Output = Dd;
    #[inline]
    fn mul(self, rhs: Dd) -> Dd {
        let p = two_prod(self.hi, rhs.hi);
        let lo = p.lo + (self.hi * rhs.lo + self.lo * rhs.hi);
        quick_two_sum(p.hi, lo)
    }
}

impl Mul<f64> for Dd {
    type Output = Dd;
    #[inline]
    fn mul(self, rhs: f64) -> Dd {
        self * Dd::new(rhs)
    }
}

impl Div for Dd {
    type Output = Dd;
    /// Long division with two correction steps.
    fn div(self, rhs: Dd) -> Dd {
        let q1 = self.hi / rhs.hi;
        let r = self - rhs * q1;
        let q2 = r.hi / rhs.hi;
        let r = r - rhs * q2;
        let q3 = r.hi / rhs.hi;
        quick_two_sum(q1, q2) + q3
    }
}

/// Sign of the 2x2 determinant `| x1 y1 ; x2 y2 |`.
#[inline]
pub(crate) fn sign_of_det2x2(x1: Dd, y1: Dd, x2: Dd, y2: Dd) -> i32 {
    (x1 * y2 - y1 * x2).signum()
}

/// Intersection of the infinite lines through `p1`–`p2` and `q1`–`q2`,
/// evaluated in homogeneous coordinates with double-double precision.
///
/// `None` when the lines are parallel or the result is not finite.
pub(crate) fn line_intersection(p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> Option<Coord> {
    let px = Dd::new(p1.y) - p2.y;
    let py = Dd::new(p2.x) - p1.x;
    let pw = Dd::new(p1.x) * p2.y - Dd::new(p2.x) * p1.y;

    let qx = Dd::new(q1.y) - q2.y;
    let qy = Dd::new(q2.x) - q1.x;
    let qw = Dd::new(q1.x) * q2.y - Dd::new(q2.x) * q1.y;

    let x = py * qw - qy * pw;
    let y = qx * pw - px * qw;
    let w = px * qy - qx * py;

    let x_int = (x / w).to_f64();
    let y_int = (y / w).to_f64();
    if !x_int.is_finite() || !y_int.is_finite() {
        return None;
    }
    Some(Coord::new(x_int, y_int))
}
