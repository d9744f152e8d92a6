//! Monotone chains: maximal runs of segments lying in one quadrant direction.
//!
//! Within a chain both x and y are monotone, so the envelope of any sub-run is
//! the box spanned by its two end vertices. That makes binary subdivision of a
//! chain pair down to candidate segment pairs cheap.

use std::ops::ControlFlow;

use crate::geom::{Coord, Envelope};

/// Quadrant of the direction `p0 → p1` (0 = NE, 1 = NW, 2 = SW, 3 = SE).
/// Axis-parallel directions fold into the quadrant on their counter-clockwise side.
#[inline]
fn quadrant(p0: Coord, p1: Coord) -> u8 {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    match (dx >= 0.0, dy >= 0.0) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    }
}

/// A monotone run `pts[start..=end]` of segment string `string`.
#[derive(Clone, Debug)]
pub struct MonotoneChain {
    pub string: usize,
    pub start: usize,
    pub end: usize,
    env: Envelope,
}

impl MonotoneChain {
    #[inline]
    pub fn envelope(&self) -> Envelope {
        self.env
    }

    /// Call `action(i, j)` for every segment `i` of `self` and `j` of `other`
    /// whose boxes overlap (within `tolerance`).
    pub fn compute_overlaps<F>(
        &self,
        pts: &[Coord],
        other: &MonotoneChain,
        other_pts: &[Coord],
        tolerance: f64,
        action: &mut F,
    ) -> ControlFlow<()>
    where
        F: FnMut(usize, usize) -> ControlFlow<()>,
    {
        overlaps_rec(
            pts,
            self.start,
            self.end,
            other_pts,
            other.start,
            other.end,
            tolerance,
            action,
        )
    }

    /// Call `action(i)` for every segment `i` of the chain whose box meets `search`.
    pub fn select<F>(&self, pts: &[Coord], search: &Envelope, action: &mut F)
    where
        F: FnMut(usize),
    {
        select_rec(pts, self.start, self.end, search, action);
    }
}

#[allow(clippy::too_many_arguments)]
fn overlaps_rec<F>(
    pts0: &[Coord],
    start0: usize,
    end0: usize,
    pts1: &[Coord],
    start1: usize,
    end1: usize,
    tol: f64,
    action: &mut F,
) -> ControlFlow<()>
where
    F: FnMut(usize, usize) -> ControlFlow<()>,
{
    if !boxes_overlap(pts0[start0], pts0[end0], pts1[start1], pts1[end1], tol) {
        return ControlFlow::Continue(());
    }
    if end0 - start0 == 1 && end1 - start1 == 1 {
        return action(start0, start1);
    }
    let mid0 = (start0 + end0) / 2;
    let mid1 = (start1 + end1) / 2;
    // Single-segment sides keep their whole range.
    let halves0: &[(usize, usize)] = if end0 - start0 == 1 {
        &[(start0, end0)][..]
    } else {
        &[(start0, mid0), (mid0, end0)][..]
    };
    let halves1: &[(usize, usize)] = if end1 - start1 == 1 {
        &[(start1, end1)][..]
    } else {
        &[(start1, mid1), (mid1, end1)][..]
    };
    for &(s0, e0) in halves0 {
        for &(s1, e1) in halves1 {
            overlaps_rec(pts0, s0, e0, pts1, s1, e1, tol, action)?;
        }
    }
    ControlFlow::Continue(())
}

fn select_rec<F>(pts: &[Coord], start: usize, end: usize, search: &Envelope, action: &mut F)
where
    F: FnMut(usize),
{
    if !Envelope::from_segment(pts[start], pts[end]).intersects(search) {
        return;
    }
    if end - start == 1 {
        action(start);
        return;
    }
    let mid = (start + end) / 2;
    select_rec(pts, start, mid, search, action);
    select_rec(pts, mid, end, search, action);
}

#[inline]
fn boxes_overlap(p1: Coord, p2: Coord, q1: Coord, q2: Coord, tol: f64) -> bool {
    let (min_p, max_p) = (p1.x.min(p2.x), p1.x.max(p2.x));
    let (min_q, max_q) = (q1.x.min(q2.x), q1.x.max(q2.x));
    if min_p > max_q + tol || max_p < min_q - tol {
        return false;
    }
    let (min_p, max_p) = (p1.y.min(p2.y), p1.y.max(p2.y));
    let (min_q, max_q) = (q1.y.min(q2.y), q1.y.max(q2.y));
    !(min_p > max_q + tol || max_p < min_q - tol)
}

/// Index of the last vertex of the chain starting at `start`.
/// Repeated points never end a chain.
fn find_chain_end(pts: &[Coord], start: usize) -> usize {
    let mut safe_start = start;
    while safe_start < pts.len() - 1 && pts[safe_start] == pts[safe_start + 1] {
        safe_start += 1;
    }
    if safe_start >= pts.len() - 1 {
        return pts.len() - 1;
    }
    let chain_quad = quadrant(pts[safe_start], pts[safe_start + 1]);
    let mut last = start + 1;
    while last < pts.len() {
        if pts[last - 1] != pts[last] && quadrant(pts[last - 1], pts[last]) != chain_quad {
            break;
        }
        last += 1;
    }
    last - 1
}

/// Decompose the polyline `pts` (segment string `string`) into monotone chains.
pub fn build_chains(pts: &[Coord], string: usize) -> Vec<MonotoneChain> {
    let mut chains = Vec::new();
    if pts.len() < 2 {
        return chains;
    }
    let mut start = 0;
    loop {
        let end = find_chain_end(pts, start);
        chains.push(MonotoneChain {
            string,
            start,
            end,
            env: Envelope::from_segment(pts[start], pts[end]),
        });
        start = end;
        if start >= pts.len() - 1 {
            break;
        }
    }
    chains
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(xy: &[(f64, f64)]) -> Vec<Coord> {
        xy.iter().map(|&p| Coord::from(p)).collect()
    }

    #[test]
    fn zigzag_splits_at_quadrant_changes() {
        let pts = line(&[(0.0, 0.0), (1.0, 1.0), (2.0, 3.0), (3.0, 2.0), (4.0, 0.0), (5.0, 1.0)]);
        let chains = build_chains(&pts, 0);
        let ranges: Vec<(usize, usize)> = chains.iter().map(|c| (c.start, c.end)).collect();
        assert_eq!(ranges, vec![(0, 2), (2, 4), (4, 5)]);
        assert_eq!(chains[0].envelope().max_y(), 3.0);
    }

    #[test]
    fn repeated_points_do_not_break_chains() {
        let pts = line(&[(0.0, 0.0), (0.0, 0.0), (1.0, 1.0), (1.0, 1.0), (2.0, 2.0)]);
        let chains = build_chains(&pts, 3);
        assert_eq!(chains.len(), 1);
        assert_eq!((chains[0].start, chains[0].end, chains[0].string), (0, 4, 3));
    }

    #[test]
    fn overlaps_find_only_candidate_pairs() {
        let a = line(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]);
        let b = line(&[(0.0, 4.0), (1.0, 3.0), (2.0, 2.0), (3.0, 1.0), (4.0, 0.0)]);
        let ca = build_chains(&a, 0);
        let cb = build_chains(&b, 1);
        assert_eq!((ca.len(), cb.len()), (1, 1));
        let mut pairs = Vec::new();
        let _ = ca[0].compute_overlaps(&a, &cb[0], &b, 0.0, &mut |i, j| {
            pairs.push((i, j));
            ControlFlow::Continue(())
        });
        pairs.sort_unstable();
        // Boxes overlap only around the crossing at (2, 2).
        assert_eq!(pairs, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn overlaps_stop_on_break() {
        let a = line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let chains = build_chains(&a, 0);
        let mut n = 0;
        let flow = chains[0].compute_overlaps(&a, &chains[0], &a, 0.0, &mut |_, _| {
            n += 1;
            ControlFlow::Break(())
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(n, 1);
    }

    #[test]
    fn select_segments_near_box() {
        let pts = line(&[(0.0, 0.0), (1.0, 0.5), (2.0, 1.0), (3.0, 1.5), (4.0, 2.0)]);
        let chains = build_chains(&pts, 0);
        let mut hit = Vec::new();
        let search = Envelope::from_segment(Coord::new(2.4, 1.0), Coord::new(2.6, 1.4));
        chains[0].select(&pts, &search, &mut |i| hit.push(i));
        assert_eq!(hit, vec![2]);
    }
}
