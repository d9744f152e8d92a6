//! Node positions along a segment string.
//!
//! Nodes are ordered by segment index, then by position along the segment.
//! Position is compared lexicographically on (x, y) with signs and priority
//! chosen by the segment's octant, so no distances or square roots are needed
//! and the order is total.

use std::cmp::Ordering;

use crate::geom::Coord;

/// Octant (0..8) of the direction `p0 → p1`, counter-clockwise from +x.
/// Zero-length segments report octant 0.
pub fn octant(p0: Coord, p1: Coord) -> u8 {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let (adx, ady) = (dx.abs(), dy.abs());
    match (dx >= 0.0, dy >= 0.0) {
        (true, true) => u8::from(adx < ady),
        (false, true) => {
            if adx >= ady {
                3
            } else {
                2
            }
        }
        (false, false) => {
            if adx >= ady {
                4
            } else {
                5
            }
        }
        (true, false) => {
            if adx >= ady {
                7
            } else {
                6
            }
        }
    }
}

#[inline]
fn relative_sign(a: f64, b: f64) -> i32 {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => -1,
        Some(Ordering::Greater) => 1,
        _ => 0,
    }
}

#[inline]
fn compare_signs(primary: i32, secondary: i32) -> Ordering {
    primary.cmp(&0).then(secondary.cmp(&0))
}

/// Order of `a` and `b` along a segment lying in `octant`.
pub fn compare_along(octant: u8, a: Coord, b: Coord) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let xs = relative_sign(a.x, b.x);
    let ys = relative_sign(a.y, b.y);
    match octant {
        0 => compare_signs(xs, ys),
        1 => compare_signs(ys, xs),
        2 => compare_signs(ys, -xs),
        3 => compare_signs(-xs, ys),
        4 => compare_signs(-xs, -ys),
        5 => compare_signs(-ys, -xs),
        6 => compare_signs(-ys, xs),
        _ => compare_signs(xs, -ys),
    }
}

/// An intersection position on a segment string.
#[derive(Clone, Copy, Debug)]
pub struct SegmentNode {
    pub coord: Coord,
    pub segment_index: usize,
    pub(crate) octant: u8,
    /// False when `coord` is the start vertex of its segment.
    pub(crate) interior: bool,
}

impl SegmentNode {
    pub(crate) fn new(pts: &[Coord], coord: Coord, segment_index: usize) -> Self {
        let octant = match (pts.get(segment_index), pts.get(segment_index + 1)) {
            (Some(&p0), Some(&p1)) => octant(p0, p1),
            _ => 0,
        };
        let interior = pts.get(segment_index).map_or(true, |v| *v != coord);
        Self {
            coord,
            segment_index,
            octant,
            interior,
        }
    }

    #[inline]
    pub fn is_interior(&self) -> bool {
        self.interior
    }
}

impl PartialEq for SegmentNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SegmentNode {}

impl PartialOrd for SegmentNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SegmentNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segment_index
            .cmp(&other.segment_index)
            .then_with(|| {
                if self.coord == other.coord {
                    Ordering::Equal
                } else if !self.interior {
                    Ordering::Less
                } else if !other.interior {
                    Ordering::Greater
                } else {
                    compare_along(self.octant, self.coord, other.coord)
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octants_cover_all_directions() {
        let o = Coord::new(0.0, 0.0);
        let dirs = [
            ((2.0, 1.0), 0),
            ((1.0, 2.0), 1),
            ((-1.0, 2.0), 2),
            ((-2.0, 1.0), 3),
            ((-2.0, -1.0), 4),
            ((-1.0, -2.0), 5),
            ((1.0, -2.0), 6),
            ((2.0, -1.0), 7),
        ];
        for ((dx, dy), want) in dirs {
            assert_eq!(octant(o, Coord::new(dx, dy)), want, "direction ({dx}, {dy})");
        }
        assert_eq!(octant(o, o), 0);
    }

    #[test]
    fn compare_follows_segment_direction() {
        let a = Coord::new(1.0, 1.0);
        let b = Coord::new(2.0, 2.0);
        // Heading north-east, a comes first; heading south-west, b does.
        assert_eq!(compare_along(0, a, b), Ordering::Less);
        assert_eq!(compare_along(4, a, b), Ordering::Greater);
        // Vertical heading south: higher y first.
        let hi = Coord::new(0.0, 5.0);
        let lo = Coord::new(0.0, 2.0);
        assert_eq!(compare_along(octant(hi, lo), hi, lo), Ordering::Less);
    }

    #[test]
    fn start_vertex_node_sorts_first_in_its_segment() {
        let pts = [Coord::new(10.0, 0.0), Coord::new(0.0, 0.0)];
        let start = SegmentNode::new(&pts, pts[0], 0);
        let mid = SegmentNode::new(&pts, Coord::new(4.0, 0.0), 0);
        let near = SegmentNode::new(&pts, Coord::new(8.0, 0.0), 0);
        assert!(!start.is_interior());
        assert!(start < near && near < mid);
    }
}
