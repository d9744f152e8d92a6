//! Direct noding over a monotone-chain index.

use std::ops::ControlFlow;

use tracing::debug;

use super::segment_intersector::{IntersectionAdder, IntersectionRecord, SegmentIntersector};
use super::segment_string::{noded_substrings, SegmentString};
use crate::cfg::DEFAULT_NODE_CAPACITY;
use crate::error::NodingError;
use crate::geom::{Coord, PrecisionModel};
use crate::index::MonotoneChainIndex;

/// Computes all intersections of a set of segment strings and splits them.
///
/// A noder keeps no state between calls; it owns the working set only for the
/// duration of `node`.
pub trait Noder<C: Clone> {
    fn node(&self, strings: Vec<SegmentString<C>>) -> Result<Vec<SegmentString<C>>, NodingError>;
}

/// Feed every candidate pair of `lines` to `si` until it is done or fails.
///
/// The first error stops traversal and is returned.
pub fn compute_intersections<L, S>(
    lines: &[L],
    node_capacity: usize,
    si: &mut S,
) -> Result<(), NodingError>
where
    L: AsRef<[Coord]>,
    S: SegmentIntersector<L>,
{
    let index = MonotoneChainIndex::build(lines, node_capacity);
    let mut failure = None;
    let _ = index.for_each_overlap(lines, 0.0, |a, b| {
        if let Err(e) = si.process_intersections(lines, a, b) {
            failure = Some(e);
            return ControlFlow::Break(());
        }
        if si.is_done() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Register each record as a node on both of its strings. Returns the number
/// of nodes that were new.
pub fn apply_records<C>(strings: &mut [SegmentString<C>], records: &[IntersectionRecord]) -> usize {
    let mut added = 0;
    for r in records {
        added += usize::from(strings[r.a.string].add_intersection(r.coord, r.a.segment));
        added += usize::from(strings[r.b.string].add_intersection(r.coord, r.b.segment));
    }
    added
}

/// Noder using monotone chains in a packed R-tree and a robust intersector.
///
/// Coordinates are used exactly as given; computed intersections are rounded
/// with `precision` when it is fixed.
#[derive(Clone, Copy, Debug)]
pub struct McIndexNoder {
    pub precision: PrecisionModel,
    pub node_capacity: usize,
}

impl Default for McIndexNoder {
    fn default() -> Self {
        Self {
            precision: PrecisionModel::Floating,
            node_capacity: DEFAULT_NODE_CAPACITY,
        }
    }
}

impl McIndexNoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(precision: PrecisionModel) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    pub fn with_node_capacity(mut self, node_capacity: usize) -> Self {
        self.node_capacity = node_capacity;
        self
    }

    /// Find intersections and register them as nodes, without splitting.
    pub fn add_nodes<C>(&self, strings: &mut [SegmentString<C>]) -> Result<IntersectionAdder, NodingError> {
        let mut adder = IntersectionAdder::with_precision(self.precision);
        compute_intersections(&*strings, self.node_capacity, &mut adder)?;
        let added = apply_records(strings, adder.records());
        debug!(
            strings = strings.len(),
            tests = adder.num_tests(),
            intersections = adder.num_intersections(),
            interior = adder.num_interior_intersections(),
            proper = adder.num_proper_intersections(),
            nodes = added,
            "mc noding pass"
        );
        Ok(adder)
    }
}

impl<C: Clone> Noder<C> for McIndexNoder {
    fn node(&self, mut strings: Vec<SegmentString<C>>) -> Result<Vec<SegmentString<C>>, NodingError> {
        self.add_nodes(&mut strings)?;
        Ok(noded_substrings(&strings))
    }
}
