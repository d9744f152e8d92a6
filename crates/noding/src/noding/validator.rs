//! Post-condition check for noded output (or externally noded input).
//!
//! A set is fully noded when no two segments meet in the interior of either,
//! and no two strings share a vertex unless it is an endpoint of both.
//! Adjacent segments of one string sharing their common vertex are fine.

use super::mc_noder::compute_intersections;
use super::segment_intersector::InteriorIntersectionFinder;
use crate::cfg::DEFAULT_NODE_CAPACITY;
use crate::error::NodingError;
use crate::geom::Coord;

/// Outcome of a validation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// Offending points in discovery order (one entry per point found).
    pub intersections: Vec<Coord>,
}

/// Validator over a borrowed set of polylines.
#[derive(Clone, Copy, Debug)]
pub struct NodingValidator<'a, L> {
    lines: &'a [L],
    find_all: bool,
    node_capacity: usize,
}

impl<'a, L: AsRef<[Coord]>> NodingValidator<'a, L> {
    pub fn new(lines: &'a [L]) -> Self {
        Self {
            lines,
            find_all: true,
            node_capacity: DEFAULT_NODE_CAPACITY,
        }
    }

    /// When false, stop at the first offending pair.
    pub fn find_all(mut self, find_all: bool) -> Self {
        self.find_all = find_all;
        self
    }

    pub fn node_capacity(mut self, node_capacity: usize) -> Self {
        self.node_capacity = node_capacity;
        self
    }

    pub fn report(&self) -> Result<ValidationReport, NodingError> {
        let mut finder = InteriorIntersectionFinder::new()
            .find_all(self.find_all)
            .with_vertex_touches(true);
        compute_intersections(self.lines, self.node_capacity, &mut finder)?;
        Ok(ValidationReport {
            is_valid: !finder.has_intersection(),
            intersections: finder.intersections(),
        })
    }

    pub fn is_valid(&self) -> Result<bool, NodingError> {
        Ok(self.report()?.is_valid)
    }

    /// `Err(NodingIncomplete)` listing the offending points if the set is not noded.
    pub fn check_valid(&self) -> Result<(), NodingError> {
        let report = self.report()?;
        if report.is_valid {
            Ok(())
        } else {
            Err(NodingError::NodingIncomplete {
                intersections: report.intersections,
            })
        }
    }
}
