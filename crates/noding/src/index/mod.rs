//! Spatial index over segment strings.
//!
//! Purpose
//! - Enumerate candidate segment pairs (and segments near a box) without testing
//!   every pair. Strings are cut into monotone chains, chain envelopes go into a
//!   packed STR tree, and overlapping chain pairs are subdivided down to segments.
//!
//! Determinism
//! - Chains are numbered in input order; each chain is only tested against chains
//!   with a larger id, visited in ascending id order. Identical input yields an
//!   identical candidate sequence.

mod chain;
mod strtree;

use std::ops::ControlFlow;

use tracing::trace;

use crate::geom::{Coord, Envelope};

pub use chain::{build_chains, MonotoneChain};
pub use strtree::StrTree;

/// Segment `segment` (from vertex `segment` to `segment + 1`) of string `string`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentRef {
    pub string: usize,
    pub segment: usize,
}

impl SegmentRef {
    #[inline]
    pub const fn new(string: usize, segment: usize) -> Self {
        Self { string, segment }
    }
}

/// Monotone chains of a set of polylines, indexed by envelope.
#[derive(Clone, Debug)]
pub struct MonotoneChainIndex {
    chains: Vec<MonotoneChain>,
    tree: StrTree<usize>,
}

impl MonotoneChainIndex {
    /// Index the chains of every line in `lines` (line `i` becomes string `i`).
    pub fn build<L: AsRef<[Coord]>>(lines: &[L], node_capacity: usize) -> Self {
        let chains: Vec<MonotoneChain> = lines
            .iter()
            .enumerate()
            .flat_map(|(i, l)| build_chains(l.as_ref(), i))
            .collect();
        let entries = chains.iter().enumerate().map(|(id, c)| (c.envelope(), id)).collect();
        let tree = StrTree::new(entries, node_capacity);
        trace!(lines = lines.len(), chains = chains.len(), depth = tree.depth(), "built chain index");
        Self { chains, tree }
    }

    #[inline]
    pub fn chains(&self) -> &[MonotoneChain] {
        &self.chains
    }

    /// Visit each candidate pair of segments whose boxes overlap within `tolerance`.
    ///
    /// `lines` must be the slice the index was built from. A segment is never
    /// paired with itself; self-intersection candidates of one string are visited.
    pub fn for_each_overlap<L, F>(&self, lines: &[L], tolerance: f64, mut visit: F) -> ControlFlow<()>
    where
        L: AsRef<[Coord]>,
        F: FnMut(SegmentRef, SegmentRef) -> ControlFlow<()>,
    {
        let mut candidates = Vec::new();
        for (id, query) in self.chains.iter().enumerate() {
            candidates.clear();
            let search = query.envelope().expanded_by(tolerance);
            self.tree.query(&search, |_, &other| {
                if other > id {
                    candidates.push(other);
                }
            });
            candidates.sort_unstable();
            let qpts = lines[query.string].as_ref();
            for &other_id in &candidates {
                let other = &self.chains[other_id];
                let opts = lines[other.string].as_ref();
                query.compute_overlaps(qpts, other, opts, tolerance, &mut |i, j| {
                    visit(SegmentRef::new(query.string, i), SegmentRef::new(other.string, j))
                })?;
            }
        }
        ControlFlow::Continue(())
    }

    /// Visit every segment whose box meets `search`, in chain order.
    pub fn for_each_segment_near<L, F>(&self, lines: &[L], search: &Envelope, mut visit: F)
    where
        L: AsRef<[Coord]>,
        F: FnMut(SegmentRef),
    {
        let mut hits: Vec<usize> = Vec::new();
        self.tree.query(search, |_, &id| hits.push(id));
        hits.sort_unstable();
        for id in hits {
            let chain = &self.chains[id];
            chain.select(lines[chain.string].as_ref(), search, &mut |i| {
                visit(SegmentRef::new(chain.string, i))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(xy: &[(f64, f64)]) -> Vec<Coord> {
        xy.iter().map(|&p| Coord::from(p)).collect()
    }

    fn all_overlaps(lines: &[Vec<Coord>]) -> Vec<(SegmentRef, SegmentRef)> {
        let index = MonotoneChainIndex::build(lines, 4);
        let mut out = Vec::new();
        let _ = index.for_each_overlap(lines, 0.0, |a, b| {
            out.push((a, b));
            ControlFlow::Continue(())
        });
        out
    }

    #[test]
    fn crossing_pair_is_reported_once() {
        let lines = vec![
            line(&[(0.0, 0.0), (10.0, 10.0)]),
            line(&[(0.0, 10.0), (10.0, 0.0)]),
        ];
        let pairs = all_overlaps(&lines);
        assert_eq!(pairs, vec![(SegmentRef::new(0, 0), SegmentRef::new(1, 0))]);
    }

    #[test]
    fn self_overlaps_of_one_string_are_candidates() {
        // A bow-tie path that crosses itself.
        let lines = vec![line(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)])];
        let pairs = all_overlaps(&lines);
        assert!(pairs.contains(&(SegmentRef::new(0, 0), SegmentRef::new(0, 2)))
            || pairs.contains(&(SegmentRef::new(0, 2), SegmentRef::new(0, 0))));
        assert!(pairs.iter().all(|(a, b)| a != b));
    }

    #[test]
    fn distant_lines_have_no_candidates() {
        let lines = vec![
            line(&[(0.0, 0.0), (1.0, 1.0)]),
            line(&[(5.0, 5.0), (6.0, 7.0)]),
        ];
        assert!(all_overlaps(&lines).is_empty());
    }

    #[test]
    fn candidates_cover_brute_force_box_overlaps() {
        use rand::{rngs::StdRng, Rng, SeedableRng};
        let mut rng = StdRng::seed_from_u64(11);
        let lines: Vec<Vec<Coord>> = (0..12)
            .map(|_| {
                (0..6)
                    .map(|_| Coord::new(rng.gen_range(0.0..50.0), rng.gen_range(0.0..50.0)))
                    .collect()
            })
            .collect();
        let pairs = all_overlaps(&lines);
        let norm = |a: SegmentRef, b: SegmentRef| if a <= b { (a, b) } else { (b, a) };
        let got: std::collections::BTreeSet<_> = pairs.iter().map(|&(a, b)| norm(a, b)).collect();
        for (i, li) in lines.iter().enumerate() {
            for (j, lj) in lines.iter().enumerate() {
                for s in 0..li.len() - 1 {
                    for t in 0..lj.len() - 1 {
                        let (a, b) = (SegmentRef::new(i, s), SegmentRef::new(j, t));
                        if a >= b {
                            continue;
                        }
                        let ea = Envelope::from_segment(li[s], li[s + 1]);
                        let eb = Envelope::from_segment(lj[t], lj[t + 1]);
                        // Segment pairs inside one chain are never candidates.
                        if ea.intersects(&eb) && !same_chain(&lines, a, b) {
                            assert!(got.contains(&(a, b)), "missing candidate {a:?} {b:?}");
                        }
                    }
                }
            }
        }
    }

    fn same_chain(lines: &[Vec<Coord>], a: SegmentRef, b: SegmentRef) -> bool {
        a.string == b.string
            && build_chains(&lines[a.string], a.string)
                .iter()
                .any(|c| c.start <= a.segment && a.segment < c.end && c.start <= b.segment && b.segment < c.end)
    }

    #[test]
    fn segments_near_box() {
        let lines = vec![
            line(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]),
            line(&[(10.0, 10.0), (12.0, 10.0)]),
        ];
        let index = MonotoneChainIndex::build(&lines, 10);
        let mut hits = Vec::new();
        let search = Envelope::from_segment(Coord::new(3.5, 1.0), Coord::new(4.5, 2.0));
        index.for_each_segment_near(&lines, &search, |r| hits.push(r));
        assert_eq!(hits, vec![SegmentRef::new(0, 1)]);
    }
}
