//! Robust segment/segment intersection.
//!
//! Classification uses only the exact orientation predicate, so the
//! "do they intersect, and how" answer is never wrong. Only the location of a
//! proper crossing is computed numerically, in three tiers:
//! 1. midpoint-conditioned floating formula,
//! 2. double-double homogeneous formula,
//! 3. the input endpoint nearest to the other segment.
//!
//! A tier's point is accepted only if it lies in both segment envelopes.

use super::dd;
use super::distance::{interpolate_z, point_to_segment};
use super::orientation::orientation_index;
use crate::error::NodingError;
use crate::geom::{Coord, Envelope, PrecisionModel};

/// Outcome of intersecting two closed segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegmentIntersection {
    NoIntersection,
    Point(Coord),
    /// Endpoints of the shared collinear stretch.
    Collinear(Coord, Coord),
}

/// Stateful intersector: holds the last inputs and result so callers can ask
/// interior/proper questions about them.
#[derive(Clone, Debug)]
pub struct RobustLineIntersector {
    precision: PrecisionModel,
    input: [Coord; 4],
    result: SegmentIntersection,
    is_proper: bool,
}

impl Default for RobustLineIntersector {
    fn default() -> Self {
        Self::new()
    }
}

impl RobustLineIntersector {
    pub fn new() -> Self {
        Self {
            precision: PrecisionModel::Floating,
            input: [Coord::default(); 4],
            result: SegmentIntersection::NoIntersection,
            is_proper: false,
        }
    }

    /// Round computed (non-endpoint) intersection points with `pm`.
    pub fn with_precision(pm: PrecisionModel) -> Self {
        Self {
            precision: pm,
            ..Self::new()
        }
    }

    /// Intersect `p1`–`p2` with `q1`–`q2`.
    ///
    /// Errors only when the inputs are non-finite or no tier yields a finite point.
    pub fn compute_intersection(
        &mut self,
        p1: Coord,
        p2: Coord,
        q1: Coord,
        q2: Coord,
    ) -> Result<SegmentIntersection, NodingError> {
        self.input = [p1, p2, q1, q2];
        self.is_proper = false;
        self.result = SegmentIntersection::NoIntersection;
        if !(p1.is_finite() && p2.is_finite() && q1.is_finite() && q2.is_finite()) {
            return Err(NodingError::RobustnessFailure {
                segments: self.input,
            });
        }
        self.result = self.classify(p1, p2, q1, q2)?;
        Ok(self.result)
    }

    fn classify(
        &mut self,
        p1: Coord,
        p2: Coord,
        q1: Coord,
        q2: Coord,
    ) -> Result<SegmentIntersection, NodingError> {
        if !Envelope::segments_intersect(p1, p2, q1, q2) {
            return Ok(SegmentIntersection::NoIntersection);
        }
        let pq1 = orientation_index(p1, p2, q1);
        let pq2 = orientation_index(p1, p2, q2);
        if (pq1 > 0 && pq2 > 0) || (pq1 < 0 && pq2 < 0) {
            return Ok(SegmentIntersection::NoIntersection);
        }
        let qp1 = orientation_index(q1, q2, p1);
        let qp2 = orientation_index(q1, q2, p2);
        if (qp1 > 0 && qp2 > 0) || (qp1 < 0 && qp2 < 0) {
            return Ok(SegmentIntersection::NoIntersection);
        }
        if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
            return Ok(collinear_intersection(p1, p2, q1, q2));
        }
        if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
            // An endpoint lies on the other segment; report it exactly.
            let pt = if p1 == q1 || p1 == q2 {
                with_z_from(p1, if p1 == q1 { q1 } else { q2 })
            } else if p2 == q1 || p2 == q2 {
                with_z_from(p2, if p2 == q1 { q1 } else { q2 })
            } else if pq1 == 0 {
                with_interpolated_z(q1, p1, p2)
            } else if pq2 == 0 {
                with_interpolated_z(q2, p1, p2)
            } else if qp1 == 0 {
                with_interpolated_z(p1, q1, q2)
            } else {
                with_interpolated_z(p2, q1, q2)
            };
            return Ok(SegmentIntersection::Point(pt));
        }
        self.is_proper = true;
        let pt = self.proper_intersection(p1, p2, q1, q2)?;
        Ok(SegmentIntersection::Point(pt))
    }

    fn proper_intersection(
        &self,
        p1: Coord,
        p2: Coord,
        q1: Coord,
        q2: Coord,
    ) -> Result<Coord, NodingError> {
        let in_envelopes = |c: &Coord| {
            Envelope::segment_contains(p1, p2, *c) && Envelope::segment_contains(q1, q2, *c)
        };
        let pt = conditioned_intersection(p1, p2, q1, q2)
            .filter(in_envelopes)
            .or_else(|| dd::line_intersection(p1, p2, q1, q2).filter(in_envelopes))
            .or_else(|| nearest_endpoint(p1, p2, q1, q2))
            .ok_or(NodingError::RobustnessFailure {
                segments: [p1, p2, q1, q2],
            })?;
        let mut pt = self.precision.make_precise_coord(pt);
        let zp = interpolate_z(pt, p1, p2);
        let zq = interpolate_z(pt, q1, q2);
        pt.z = match (zp, zq) {
            (Some(a), Some(b)) => Some((a + b) / 2.0),
            (a, b) => a.or(b),
        };
        Ok(pt)
    }

    #[inline]
    pub fn result(&self) -> SegmentIntersection {
        self.result
    }

    #[inline]
    pub fn has_intersection(&self) -> bool {
        !matches!(self.result, SegmentIntersection::NoIntersection)
    }

    #[inline]
    pub fn intersection_num(&self) -> usize {
        match self.result {
            SegmentIntersection::NoIntersection => 0,
            SegmentIntersection::Point(_) => 1,
            SegmentIntersection::Collinear(..) => 2,
        }
    }

    /// The `i`-th intersection point (0 or 1).
    pub fn intersection(&self, i: usize) -> Option<Coord> {
        match (self.result, i) {
            (SegmentIntersection::Point(p), 0) => Some(p),
            (SegmentIntersection::Collinear(a, _), 0) => Some(a),
            (SegmentIntersection::Collinear(_, b), 1) => Some(b),
            _ => None,
        }
    }

    /// Points in order (empty, one or two).
    pub fn intersection_points(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.intersection_num()).filter_map(|i| self.intersection(i))
    }

    /// True for a crossing strictly inside both segments.
    #[inline]
    pub fn is_proper(&self) -> bool {
        self.has_intersection() && self.is_proper
    }

    #[inline]
    pub fn is_collinear(&self) -> bool {
        matches!(self.result, SegmentIntersection::Collinear(..))
    }

    /// True if some intersection point is not an endpoint of either segment.
    pub fn is_interior_intersection(&self) -> bool {
        self.is_interior_intersection_for(0) || self.is_interior_intersection_for(1)
    }

    /// True if some intersection point is not an endpoint of input segment
    /// `input_index` (0 = p, 1 = q).
    pub fn is_interior_intersection_for(&self, input_index: usize) -> bool {
        let a = self.input[2 * input_index];
        let b = self.input[2 * input_index + 1];
        self.intersection_points().any(|pt| pt != a && pt != b)
    }
}

fn collinear_intersection(p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> SegmentIntersection {
    let q1_in_p = Envelope::segment_contains(p1, p2, q1);
    let q2_in_p = Envelope::segment_contains(p1, p2, q2);
    let p1_in_q = Envelope::segment_contains(q1, q2, p1);
    let p2_in_q = Envelope::segment_contains(q1, q2, p2);

    if q1_in_p && q2_in_p {
        return SegmentIntersection::Collinear(q1, q2);
    }
    if p1_in_q && p2_in_q {
        return SegmentIntersection::Collinear(p1, p2);
    }
    // Partial overlap; a single shared endpoint is only a point touch.
    let overlap = |a: Coord, b: Coord, touch_only: bool| {
        if a == b && touch_only {
            SegmentIntersection::Point(a)
        } else {
            SegmentIntersection::Collinear(a, b)
        }
    };
    if q1_in_p && p1_in_q {
        return overlap(q1, p1, !q2_in_p && !p2_in_q);
    }
    if q1_in_p && p2_in_q {
        return overlap(q1, p2, !q2_in_p && !p1_in_q);
    }
    if q2_in_p && p1_in_q {
        return overlap(q2, p1, !q1_in_p && !p2_in_q);
    }
    if q2_in_p && p2_in_q {
        return overlap(q2, p2, !q1_in_p && !p1_in_q);
    }
    SegmentIntersection::NoIntersection
}

/// Line intersection computed relative to the centre of the envelope overlap,
/// which keeps the products small.
fn conditioned_intersection(p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> Option<Coord> {
    let min_x = p1.x.min(p2.x).max(q1.x.min(q2.x));
    let max_x = p1.x.max(p2.x).min(q1.x.max(q2.x));
    let min_y = p1.y.min(p2.y).max(q1.y.min(q2.y));
    let max_y = p1.y.max(p2.y).min(q1.y.max(q2.y));
    let mid_x = (min_x + max_x) / 2.0;
    let mid_y = (min_y + max_y) / 2.0;

    let (p1x, p1y) = (p1.x - mid_x, p1.y - mid_y);
    let (p2x, p2y) = (p2.x - mid_x, p2.y - mid_y);
    let (q1x, q1y) = (q1.x - mid_x, q1.y - mid_y);
    let (q2x, q2y) = (q2.x - mid_x, q2.y - mid_y);

    let px = p1y - p2y;
    let py = p2x - p1x;
    let pw = p1x * p2y - p2x * p1y;
    let qx = q1y - q2y;
    let qy = q2x - q1x;
    let qw = q1x * q2y - q2x * q1y;

    let xw = py * qw - qy * pw;
    let yw = qx * pw - px * qw;
    let w = px * qy - qx * py;

    let x = xw / w + mid_x;
    let y = yw / w + mid_y;
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some(Coord::new(x, y))
}

/// Endpoint of either segment closest to the other segment.
fn nearest_endpoint(p1: Coord, p2: Coord, q1: Coord, q2: Coord) -> Option<Coord> {
    let candidates = [
        (p1, point_to_segment(p1, q1, q2)),
        (p2, point_to_segment(p2, q1, q2)),
        (q1, point_to_segment(q1, p1, p2)),
        (q2, point_to_segment(q2, p1, p2)),
    ];
    candidates
        .into_iter()
        .filter(|(_, d)| d.is_finite())
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}

#[inline]
fn with_z_from(pt: Coord, other: Coord) -> Coord {
    Coord {
        z: pt.z.or(other.z),
        ..pt
    }
}

#[inline]
fn with_interpolated_z(pt: Coord, a: Coord, b: Coord) -> Coord {
    Coord {
        z: pt.z.or_else(|| interpolate_z(pt, a, b)),
        ..pt
    }
}
