//! Snap rounding with hot-pixel refinement.
//!
//! Input is mapped to grid units (`v·scale`, not rounded) and every segment
//! keeps those ends for the whole run; pixels are always tested against them.
//! The hot pixels start as the pixels of every input vertex and of every
//! interior intersection of the input. Each pass:
//! 1. routes each input segment through the centre of every shared hot pixel
//!    it meets, in order along the segment, and cuts the strings there;
//! 2. looks for intersections left in the result; their pixels join the hot
//!    set for the next pass.
//!
//! A pass that leaves nothing to resolve ends the loop. Since each output vertex
//! is the centre of a pixel its own input segment meets, it lies within half a
//! pixel of that segment on each axis, whatever the pass count. A pass whose
//! leftovers fall only in pixels that are already hot cannot make progress and
//! ends the run like an exhausted `max_passes`.

use tracing::{debug, trace};

use super::hot_pixel::{round_half_up, HotPixel};
use crate::algorithm::distance::interpolate_z;
use crate::cfg::{NodingCfg, DEFAULT_NODE_CAPACITY};
use crate::error::NodingError;
use crate::geom::{remove_repeated_points, to_grid, to_scaled, Coord, PrecisionModel};
use crate::index::{MonotoneChainIndex, SegmentRef};
use crate::noding::{
    compute_intersections, unscale_line, InteriorIntersectionFinder, Noder, SegmentString,
};

/// Per-call counters of a snap-rounding run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnapStats {
    /// Passes run, including the last one that left nothing to resolve.
    pub passes: usize,
    /// Hot pixels in the final pass.
    pub hot_pixels: usize,
    /// Places where the returned strings were cut from their input.
    pub nodes_added: usize,
    /// Strings dropped because rounding collapsed them to a point.
    pub collapsed: usize,
}

/// Snap-rounding noder for a fixed grid of spacing `1/scale`.
#[derive(Clone, Copy, Debug)]
pub struct SnapRoundingNoder {
    scale: f64,
    max_passes: usize,
    node_capacity: usize,
}

/// Where a segment meets a pixel: at one of the string's vertices, or elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Touch {
    Vertex { string: usize, vertex: usize },
    Interior(SegmentRef),
}

/// A pixel centre to route segment `at` through.
#[derive(Clone, Copy, Debug)]
struct Hit {
    at: SegmentRef,
    centre: Coord,
}

/// Snapped lines in grid units, each with the input string it came from.
#[derive(Debug, Default)]
struct Snapped {
    lines: Vec<Vec<Coord>>,
    owners: Vec<usize>,
    nodes: usize,
    collapsed: usize,
}

impl SnapRoundingNoder {
    pub fn new(scale: f64) -> Result<Self, NodingError> {
        PrecisionModel::fixed(scale)?;
        let cfg = NodingCfg::default();
        Ok(Self {
            scale,
            max_passes: cfg.max_snap_passes,
            node_capacity: DEFAULT_NODE_CAPACITY,
        })
    }

    /// Requires a fixed model; a floating model has no grid to snap to.
    pub fn from_precision(pm: PrecisionModel) -> Result<Self, NodingError> {
        match pm.scale() {
            Some(scale) => Self::new(scale),
            None => Err(NodingError::FloatingPrecision),
        }
    }

    pub fn with_cfg(mut self, cfg: &NodingCfg) -> Self {
        self.max_passes = cfg.max_snap_passes;
        self.node_capacity = cfg.node_capacity;
        self
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Like `Noder::node`, also returning run statistics.
    pub fn node_with_stats<C: Clone>(
        &self,
        strings: Vec<SegmentString<C>>,
    ) -> Result<(Vec<SegmentString<C>>, SnapStats), NodingError> {
        let mut lines = Vec::with_capacity(strings.len());
        let mut contexts = Vec::with_capacity(strings.len());
        let mut degenerate = 0usize;
        for s in strings {
            let (pts, ctx) = s.into_parts();
            let scaled = grid_units(&pts, self.scale)?;
            if scaled.len() < 2 {
                degenerate += 1;
                continue;
            }
            lines.push(scaled);
            contexts.push(ctx);
        }

        let index = MonotoneChainIndex::build(&lines, self.node_capacity);
        let mut finder = InteriorIntersectionFinder::new().find_all(true);
        compute_intersections(&lines, self.node_capacity, &mut finder)?;
        let forced: Vec<Hit> = finder
            .records()
            .iter()
            .flat_map(|r| {
                let centre = snap_point(r.coord);
                [Hit { at: r.a, centre }, Hit { at: r.b, centre }]
            })
            .collect();
        let mut hot: Vec<Coord> = lines
            .iter()
            .flatten()
            .map(|p| snap_point(*p))
            .chain(forced.iter().map(|h| h.centre))
            .collect();
        sort_centres(&mut hot);

        let mut stats = SnapStats::default();
        let mut pending = 0;
        for pass in 1..=self.max_passes.max(1) {
            let snapped = snap_to_pixels(&lines, &index, &hot, &forced);
            stats.passes = pass;
            stats.hot_pixels = hot.len();
            stats.nodes_added = snapped.nodes;
            stats.collapsed = degenerate + snapped.collapsed;

            let mut check = InteriorIntersectionFinder::new()
                .find_all(true)
                .with_vertex_touches(true);
            compute_intersections(&snapped.lines, self.node_capacity, &mut check)?;
            debug!(
                pass,
                hot_pixels = hot.len(),
                nodes = snapped.nodes,
                unresolved = check.count(),
                "snap rounding pass"
            );
            if !check.has_intersection() {
                if stats.collapsed > 0 {
                    debug!(collapsed = stats.collapsed, scale = self.scale, "dropped strings collapsed by rounding");
                }
                let out = snapped
                    .lines
                    .into_iter()
                    .zip(snapped.owners)
                    .map(|(pts, owner)| {
                        SegmentString::from_valid(unscale_line(&pts, self.scale), contexts[owner].clone())
                    })
                    .collect();
                return Ok((out, stats));
            }

            pending = check.count();
            let before = hot.len();
            hot.extend(check.records().iter().map(|r| snap_point(r.coord)));
            sort_centres(&mut hot);
            if hot.len() == before {
                break;
            }
        }
        Err(NodingError::NonConvergence {
            passes: stats.passes,
            pending,
        })
    }
}

impl<C: Clone> Noder<C> for SnapRoundingNoder {
    fn node(&self, strings: Vec<SegmentString<C>>) -> Result<Vec<SegmentString<C>>, NodingError> {
        self.node_with_stats(strings).map(|(out, _)| out)
    }
}

/// `pts` in grid units, unrounded. Repeats created by scaling are dropped.
fn grid_units(pts: &[Coord], scale: f64) -> Result<Vec<Coord>, NodingError> {
    let scaled = pts
        .iter()
        .map(|p| {
            to_grid(p.x, scale)?;
            to_grid(p.y, scale)?;
            Ok(Coord {
                x: to_scaled(p.x, scale),
                y: to_scaled(p.y, scale),
                z: p.z,
            })
        })
        .collect::<Result<Vec<_>, NodingError>>()?;
    Ok(remove_repeated_points(&scaled))
}

#[inline]
fn snap_point(p: Coord) -> Coord {
    Coord {
        x: round_half_up(p.x),
        y: round_half_up(p.y),
        z: p.z,
    }
}

fn sort_centres(centres: &mut Vec<Coord>) {
    centres.sort_by(|a, b| a.compare_xy(b));
    centres.dedup_by(|a, b| a == b);
}

/// Route every input segment through the shared hot pixels it meets and cut
/// the resulting paths at those pixels.
fn snap_to_pixels(lines: &[Vec<Coord>], index: &MonotoneChainIndex, hot: &[Coord], forced: &[Hit]) -> Snapped {
    let find = |c: &Coord| hot.binary_search_by(|h| h.compare_xy(c)).ok();
    // Pixels of intersection points are shared even if rounding error in the
    // computed point leaves their own segments just outside.
    let mut shared = vec![false; hot.len()];
    for k in forced.iter().filter_map(|h| find(&h.centre)) {
        shared[k] = true;
    }
    let mut hits: Vec<Hit> = forced.to_vec();
    let mut incident = Vec::new();
    for (k, &centre) in hot.iter().enumerate() {
        let pixel = HotPixel::new(centre, 1.0);
        incident.clear();
        index.for_each_segment_near(lines, &pixel.envelope(), |r| {
            let pts = &lines[r.string];
            if pixel.intersects(pts[r.segment], pts[r.segment + 1]) {
                incident.push(r);
            }
        });
        if shared[k] || is_shared(lines, &pixel, &incident) {
            shared[k] = true;
            hits.extend(incident.iter().map(|&at| Hit { at, centre }));
        }
    }
    hits.sort_by(|a, b| {
        a.at
            .cmp(&b.at)
            .then_with(|| along(lines, a).total_cmp(&along(lines, b)))
            .then_with(|| a.centre.compare_xy(&b.centre))
    });
    trace!(
        pixels = hot.len(),
        shared = shared.iter().filter(|&&s| s).count(),
        hits = hits.len(),
        "hot pixels matched"
    );

    let mut out = Snapped::default();
    let mut next = 0;
    for (i, pts) in lines.iter().enumerate() {
        let mut path: Vec<(Coord, bool)> = Vec::with_capacity(pts.len());
        for (j, &p) in pts.iter().enumerate() {
            let centre = snap_point(p);
            let split = find(&centre).map_or(false, |k| shared[k]);
            push_node(&mut path, centre, split);
            let Some(&q) = pts.get(j + 1) else { break };
            let seg = SegmentRef::new(i, j);
            while next < hits.len() && hits[next].at == seg {
                let c = hits[next].centre;
                let z = interpolate_z(c, p, q).or(c.z);
                push_node(&mut path, Coord { z, ..c }, true);
                next += 1;
            }
        }
        cut_path(&path, i, &mut out);
    }
    out
}

/// Position of a hit's centre along its segment, for ordering.
fn along(lines: &[Vec<Coord>], h: &Hit) -> f64 {
    let pts = &lines[h.at.string];
    let (p0, p1) = (pts[h.at.segment], pts[h.at.segment + 1]);
    (h.centre.xy() - p0.xy()).dot(&(p1.xy() - p0.xy()))
}

/// Append a centre unless it repeats the last one; a repeat keeps the first
/// Z and either split mark.
fn push_node(path: &mut Vec<(Coord, bool)>, c: Coord, split: bool) {
    match path.last_mut() {
        Some((last, s)) if *last == c => *s |= split,
        _ => path.push((c, split)),
    }
}

/// Cut at split marks and at spikes (`a, b, a`). A path of one point is a
/// collapsed string.
fn cut_path(path: &[(Coord, bool)], owner: usize, out: &mut Snapped) {
    if path.len() < 2 {
        out.collapsed += 1;
        return;
    }
    let last = path.len() - 1;
    let mut piece = vec![path[0].0];
    for k in 1..=last {
        let (c, split) = path[k];
        piece.push(c);
        if k < last && (split || path[k - 1].0 == path[k + 1].0) {
            out.nodes += 1;
            out.lines.push(std::mem::replace(&mut piece, vec![c]));
            out.owners.push(owner);
        }
    }
    out.lines.push(piece);
    out.owners.push(owner);
}

/// A pixel needs nodes unless the only thing in it is one vertex of one string
/// (with that vertex's own segments).
fn is_shared(lines: &[Vec<Coord>], pixel: &HotPixel, incident: &[SegmentRef]) -> bool {
    let mut touches = Vec::with_capacity(incident.len());
    for &r in incident {
        let pts = &lines[r.string];
        let closed = pts.len() > 2 && pts.first() == pts.last();
        let mut at_vertex = false;
        for v in [r.segment, r.segment + 1] {
            if pixel.intersects_point(pts[v]) {
                at_vertex = true;
                // A ring's closing vertex is its first vertex.
                let vertex = if closed && v == pts.len() - 1 { 0 } else { v };
                touches.push(Touch::Vertex {
                    string: r.string,
                    vertex,
                });
            }
        }
        if !at_vertex {
            touches.push(Touch::Interior(r));
        }
    }
    touches.sort_unstable();
    touches.dedup();
    !matches!(touches.as_slice(), [] | [Touch::Vertex { .. }])
}
