//! Per-candidate-pair processing: the visitor side of index traversal.
//!
//! Implementations never mutate the strings they inspect. They append
//! `IntersectionRecord`s to their own buffer; the noder applies the records
//! once traversal has finished.

use crate::algorithm::RobustLineIntersector;
use crate::error::NodingError;
use crate::geom::{Coord, PrecisionModel};
use crate::index::SegmentRef;

/// An intersection point and the two segments it was found on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionRecord {
    pub coord: Coord,
    pub a: SegmentRef,
    pub b: SegmentRef,
}

/// Processes one candidate pair of segments drawn from `lines`.
pub trait SegmentIntersector<L: AsRef<[Coord]>> {
    fn process_intersections(
        &mut self,
        lines: &[L],
        a: SegmentRef,
        b: SegmentRef,
    ) -> Result<(), NodingError>;

    /// Traversal may stop early once this returns true.
    fn is_done(&self) -> bool {
        false
    }
}

#[inline]
fn segment(line: &[Coord], r: SegmentRef) -> (Coord, Coord) {
    (line[r.segment], line[r.segment + 1])
}

#[inline]
fn is_line_end(line: &[Coord], pt: &Coord) -> bool {
    line.first() == Some(pt) || line.last() == Some(pt)
}

#[inline]
fn is_closed(line: &[Coord]) -> bool {
    line.len() > 2 && line.first() == line.last()
}

/// Records every non-trivial intersection as nodes for both strings.
///
/// Trivial intersections are the shared vertex of adjacent segments of one
/// string, and the closing vertex between the first and last segment of a ring.
#[derive(Clone, Debug, Default)]
pub struct IntersectionAdder {
    li: RobustLineIntersector,
    records: Vec<IntersectionRecord>,
    has_intersection: bool,
    has_interior: bool,
    has_proper: bool,
    num_tests: usize,
    num_intersections: usize,
    num_interior_intersections: usize,
    num_proper_intersections: usize,
}

impl IntersectionAdder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computed intersection points are rounded with `pm`.
    pub fn with_precision(pm: PrecisionModel) -> Self {
        Self {
            li: RobustLineIntersector::with_precision(pm),
            ..Self::default()
        }
    }

    #[inline]
    pub fn records(&self) -> &[IntersectionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<IntersectionRecord> {
        self.records
    }

    /// Some non-trivial intersection was found.
    #[inline]
    pub fn has_intersection(&self) -> bool {
        self.has_intersection
    }

    /// Some intersection point lies in the interior of a segment. These are the
    /// intersections a validator re-checks after splitting.
    #[inline]
    pub fn has_interior_intersection(&self) -> bool {
        self.has_interior
    }

    #[inline]
    pub fn has_proper_intersection(&self) -> bool {
        self.has_proper
    }

    #[inline]
    pub fn num_tests(&self) -> usize {
        self.num_tests
    }

    #[inline]
    pub fn num_intersections(&self) -> usize {
        self.num_intersections
    }

    #[inline]
    pub fn num_interior_intersections(&self) -> usize {
        self.num_interior_intersections
    }

    #[inline]
    pub fn num_proper_intersections(&self) -> usize {
        self.num_proper_intersections
    }

    fn is_trivial(&self, line: &[Coord], a: SegmentRef, b: SegmentRef) -> bool {
        if a.string != b.string || self.li.intersection_num() != 1 {
            return false;
        }
        if a.segment.abs_diff(b.segment) == 1 {
            return true;
        }
        let last = line.len() - 2;
        is_closed(line)
            && ((a.segment == 0 && b.segment == last) || (b.segment == 0 && a.segment == last))
    }
}

impl<L: AsRef<[Coord]>> SegmentIntersector<L> for IntersectionAdder {
    fn process_intersections(
        &mut self,
        lines: &[L],
        a: SegmentRef,
        b: SegmentRef,
    ) -> Result<(), NodingError> {
        if a == b {
            return Ok(());
        }
        let la = lines[a.string].as_ref();
        let lb = lines[b.string].as_ref();
        let (p0, p1) = segment(la, a);
        let (q0, q1) = segment(lb, b);
        self.num_tests += 1;
        self.li.compute_intersection(p0, p1, q0, q1)?;
        if !self.li.has_intersection() {
            return Ok(());
        }
        self.num_intersections += 1;
        if self.li.is_interior_intersection() {
            self.num_interior_intersections += 1;
            self.has_interior = true;
        }
        if self.is_trivial(la, a, b) {
            return Ok(());
        }
        self.has_intersection = true;
        if self.li.is_proper() {
            self.num_proper_intersections += 1;
            self.has_proper = true;
        }
        for coord in self.li.intersection_points() {
            // Shared string endpoints are nodes already.
            if is_line_end(la, &coord) && is_line_end(lb, &coord) {
                continue;
            }
            self.records.push(IntersectionRecord { coord, a, b });
        }
        Ok(())
    }
}

/// Finds intersections that leave a set of strings incompletely noded.
///
/// By default only interior intersections (a point inside some segment) are
/// reported. `with_vertex_touches` also reports two strings sharing a vertex
/// that is not an endpoint of both, which is what a fully noded set must not have.
#[derive(Clone, Debug)]
pub struct InteriorIntersectionFinder {
    li: RobustLineIntersector,
    find_all: bool,
    vertex_touches: bool,
    records: Vec<IntersectionRecord>,
    count: usize,
}

impl Default for InteriorIntersectionFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl InteriorIntersectionFinder {
    /// Stops at the first interior intersection.
    pub fn new() -> Self {
        Self {
            li: RobustLineIntersector::new(),
            find_all: false,
            vertex_touches: false,
            records: Vec::new(),
            count: 0,
        }
    }

    pub fn find_all(mut self, find_all: bool) -> Self {
        self.find_all = find_all;
        self
    }

    pub fn with_vertex_touches(mut self, on: bool) -> Self {
        self.vertex_touches = on;
        self
    }

    #[inline]
    pub fn has_intersection(&self) -> bool {
        self.count > 0
    }

    /// Number of offending segment pairs seen.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn records(&self) -> &[IntersectionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<IntersectionRecord> {
        self.records
    }

    /// Offending points in discovery order.
    pub fn intersections(&self) -> Vec<Coord> {
        self.records.iter().map(|r| r.coord).collect()
    }
}

/// A vertex shared by the two segments that is not an endpoint of both strings.
fn vertex_touch(p: [(Coord, bool); 2], q: [(Coord, bool); 2]) -> Option<Coord> {
    for (pv, p_end) in p {
        for (qv, q_end) in q {
            if !(p_end && q_end) && pv == qv {
                return Some(pv);
            }
        }
    }
    None
}

impl<L: AsRef<[Coord]>> SegmentIntersector<L> for InteriorIntersectionFinder {
    fn process_intersections(
        &mut self,
        lines: &[L],
        a: SegmentRef,
        b: SegmentRef,
    ) -> Result<(), NodingError> {
        if (!self.find_all && self.count > 0) || a == b {
            return Ok(());
        }
        let la = lines[a.string].as_ref();
        let lb = lines[b.string].as_ref();
        let (p0, p1) = segment(la, a);
        let (q0, q1) = segment(lb, b);
        self.li.compute_intersection(p0, p1, q0, q1)?;

        if self.li.has_intersection() && self.li.is_interior_intersection() {
            self.count += 1;
            for coord in self.li.intersection_points() {
                self.records.push(IntersectionRecord { coord, a, b });
            }
            return Ok(());
        }
        if !self.vertex_touches || (a.string == b.string && a.segment.abs_diff(b.segment) <= 1) {
            return Ok(());
        }
        let p = [(p0, a.segment == 0), (p1, a.segment + 2 == la.len())];
        let q = [(q0, b.segment == 0), (q1, b.segment + 2 == lb.len())];
        if let Some(coord) = vertex_touch(p, q) {
            self.count += 1;
            self.records.push(IntersectionRecord { coord, a, b });
        }
        Ok(())
    }

    fn is_done(&self) -> bool {
        !self.find_all && self.count > 0
    }
}
