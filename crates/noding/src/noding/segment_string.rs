//! Polyline with caller context and the node positions found while noding.

use std::collections::BTreeSet;

use tracing::trace;

use super::node::{octant, SegmentNode};
use crate::error::NodingError;
use crate::geom::{count_distinct, Coord};

/// An ordered run of at least two distinct coordinates plus an opaque context.
///
/// Nodes are collected through `add_intersection` and consumed by
/// `noded_substrings`, which leaves the string itself unchanged.
#[derive(Clone, Debug)]
pub struct SegmentString<C> {
    pts: Vec<Coord>,
    context: C,
    nodes: BTreeSet<SegmentNode>,
}

/// Check one input line: finite ordinates and two distinct points.
pub(crate) fn validate_line(pts: &[Coord], string: usize) -> Result<(), NodingError> {
    if let Some(vertex) = pts.iter().position(|p| !p.is_finite()) {
        return Err(NodingError::InvalidCoordinate { string, vertex });
    }
    let distinct = count_distinct(pts);
    if distinct < 2 {
        return Err(NodingError::DegenerateInput { string, distinct });
    }
    Ok(())
}

impl<C> SegmentString<C> {
    /// Errors report string index 0; use `to_segment_strings` to keep input indices.
    pub fn new(pts: Vec<Coord>, context: C) -> Result<Self, NodingError> {
        validate_line(&pts, 0)?;
        Ok(Self::from_valid(pts, context))
    }

    pub(crate) fn from_valid(pts: Vec<Coord>, context: C) -> Self {
        Self {
            pts,
            context,
            nodes: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn coordinates(&self) -> &[Coord] {
        &self.pts
    }

    #[inline]
    pub fn coordinate(&self, i: usize) -> Coord {
        self.pts[i]
    }

    #[inline]
    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn into_parts(self) -> (Vec<Coord>, C) {
        (self.pts, self.context)
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.pts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.pts.len().saturating_sub(1)
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.pts.len() > 2 && self.pts.first() == self.pts.last()
    }

    /// Octant of segment `i`; 0 for a zero-length or out-of-range segment.
    pub fn segment_octant(&self, i: usize) -> u8 {
        match (self.pts.get(i), self.pts.get(i + 1)) {
            (Some(&p0), Some(&p1)) => octant(p0, p1),
            _ => 0,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SegmentNode> + '_ {
        self.nodes.iter()
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Register `pt` as a node on segment `segment_index`.
    ///
    /// A point equal to the segment's end vertex is filed under the next segment,
    /// so each location has exactly one key. Returns false if the node was
    /// already present or the index is out of range.
    pub fn add_intersection(&mut self, pt: Coord, segment_index: usize) -> bool {
        if segment_index + 1 >= self.pts.len() {
            return false;
        }
        let mut index = segment_index;
        if self.pts[index + 1] == pt {
            index += 1;
        }
        self.nodes.insert(SegmentNode::new(&self.pts, pt, index))
    }

    /// True if `pt` lies on the first or last vertex.
    #[inline]
    pub fn is_end_point(&self, pt: &Coord) -> bool {
        self.pts.first() == Some(pt) || self.pts.last() == Some(pt)
    }

    /// Nodes that would split the string: registered nodes other than its endpoints.
    pub fn splitting_node_count(&self) -> usize {
        let last = self.pts.len() - 1;
        self.nodes
            .iter()
            .filter(|n| {
                !(n.segment_index == 0 && !n.is_interior()) && !(n.segment_index == last)
            })
            .count()
    }

    /// All nodes used for splitting: registered ones, both endpoints, and collapse
    /// vertices (the middle of an A-B-A spike, found from vertices or from a pair
    /// of equal nodes with one vertex between them).
    fn split_nodes(&self) -> BTreeSet<SegmentNode> {
        let mut nodes = self.nodes.clone();
        let last = self.pts.len() - 1;
        nodes.insert(SegmentNode::new(&self.pts, self.pts[0], 0));
        nodes.insert(SegmentNode::new(&self.pts, self.pts[last], last));

        let mut collapsed: Vec<usize> = (0..self.pts.len().saturating_sub(2))
            .filter(|&i| self.pts[i] == self.pts[i + 2])
            .map(|i| i + 1)
            .collect();
        let ordered: Vec<&SegmentNode> = nodes.iter().collect();
        for pair in ordered.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.coord != b.coord {
                continue;
            }
            let mut between = b.segment_index - a.segment_index;
            if !b.is_interior() {
                between -= 1;
            }
            if between == 1 {
                collapsed.push(a.segment_index + 1);
            }
        }
        for i in collapsed {
            nodes.insert(SegmentNode::new(&self.pts, self.pts[i], i));
        }
        nodes
    }

    fn split_edge_points(&self, a: &SegmentNode, b: &SegmentNode) -> Vec<Coord> {
        let span = b.segment_index - a.segment_index;
        let mut out = Vec::with_capacity(span + 2);
        out.push(a.coord);
        out.extend_from_slice(&self.pts[a.segment_index + 1..=b.segment_index]);
        // The end node is added unless it is the vertex already copied.
        let last_seg_start = self.pts[b.segment_index];
        if span == 0 || b.is_interior() || b.coord != last_seg_start {
            out.push(b.coord);
        }
        out
    }
}

impl<C: Clone> SegmentString<C> {
    /// Split at every node. Children concatenate back to the vertex sequence with
    /// the nodes inserted, each carries a clone of the context, and zero-length
    /// pieces are dropped.
    pub fn noded_substrings(&self) -> Vec<SegmentString<C>> {
        let nodes: Vec<SegmentNode> = self.split_nodes().into_iter().collect();
        let mut out = Vec::with_capacity(nodes.len().saturating_sub(1));
        for pair in nodes.windows(2) {
            let pts = self.split_edge_points(&pair[0], &pair[1]);
            if pts.iter().all(|p| *p == pts[0]) {
                trace!(at = %pts[0], "dropped zero-length split edge");
                continue;
            }
            out.push(SegmentString::from_valid(pts, self.context.clone()));
        }
        out
    }
}

impl<C> AsRef<[Coord]> for SegmentString<C> {
    #[inline]
    fn as_ref(&self) -> &[Coord] {
        &self.pts
    }
}

/// Validate and wrap `(coordinates, context)` pairs, reporting input indices in errors.
pub fn to_segment_strings<C, I>(items: I) -> Result<Vec<SegmentString<C>>, NodingError>
where
    I: IntoIterator<Item = (Vec<Coord>, C)>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(i, (pts, ctx))| {
            validate_line(&pts, i)?;
            Ok(SegmentString::from_valid(pts, ctx))
        })
        .collect()
}

/// Split every string at its nodes, in input order.
pub fn noded_substrings<C: Clone>(strings: &[SegmentString<C>]) -> Vec<SegmentString<C>> {
    strings.iter().flat_map(SegmentString::noded_substrings).collect()
}
