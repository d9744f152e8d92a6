//! Random linework for tests, benchmarks and the CLI (replay tokens).
//!
//! Purpose
//! - Reproducible inputs that exercise the noders: uniform segment fields,
//!   self-crossing random walks, perturbed grids (many collinear and near-collinear
//!   pairs) and near-parallel fans (stress for the robust intersector).
//!
//! Determinism
//! - Every draw takes a `ReplayToken { seed, index }`; the pair is mixed into one
//!   `StdRng`, so `(seed, index)` identifies a draw independent of other draws.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::Coord;

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    #[inline]
    pub fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Which generator to draw from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineworkKind {
    Segments,
    Walks,
    Grid,
    Fan,
}

/// Segments with both endpoints uniform in `[0, extent)²`.
#[derive(Clone, Copy, Debug)]
pub struct SegmentsCfg {
    pub count: usize,
    pub extent: f64,
}

impl Default for SegmentsCfg {
    fn default() -> Self {
        Self {
            count: 100,
            extent: 100.0,
        }
    }
}

/// Polylines of `steps` unit-free steps in uniformly random directions.
#[derive(Clone, Copy, Debug)]
pub struct WalkCfg {
    pub count: usize,
    pub steps: usize,
    pub step_len: f64,
    /// Walks start uniformly in `[0, extent)²`.
    pub extent: f64,
}

impl Default for WalkCfg {
    fn default() -> Self {
        Self {
            count: 10,
            steps: 50,
            step_len: 5.0,
            extent: 100.0,
        }
    }
}

/// `count` horizontal and `count` vertical lines at `spacing`, endpoints jittered.
#[derive(Clone, Copy, Debug)]
pub struct GridCfg {
    pub count: usize,
    pub spacing: f64,
    /// Absolute jitter added to every endpoint ordinate, in `[-jitter, jitter]`.
    pub jitter: f64,
}

impl Default for GridCfg {
    fn default() -> Self {
        Self {
            count: 10,
            spacing: 10.0,
            jitter: 0.0,
        }
    }
}

/// Segments through a common neighbourhood with nearly equal directions.
#[derive(Clone, Copy, Debug)]
pub struct FanCfg {
    pub count: usize,
    pub length: f64,
    /// Half-width of the angle range, in radians.
    pub spread: f64,
    /// Offset range of the segment midpoints around the origin.
    pub offset: f64,
}

impl Default for FanCfg {
    fn default() -> Self {
        Self {
            count: 20,
            length: 100.0,
            spread: 1e-6,
            offset: 1e-6,
        }
    }
}

#[inline]
fn symmetric<R: Rng>(rng: &mut R, half: f64) -> f64 {
    if half > 0.0 {
        (rng.gen::<f64>() * 2.0 - 1.0) * half
    } else {
        0.0
    }
}

pub fn random_segments(cfg: SegmentsCfg, tok: ReplayToken) -> Vec<Vec<Coord>> {
    let mut rng = tok.to_std_rng();
    let e = cfg.extent.max(f64::MIN_POSITIVE);
    let mut out = Vec::with_capacity(cfg.count);
    while out.len() < cfg.count {
        let p = Coord::new(rng.gen::<f64>() * e, rng.gen::<f64>() * e);
        let q = Coord::new(rng.gen::<f64>() * e, rng.gen::<f64>() * e);
        if p != q {
            out.push(vec![p, q]);
        }
    }
    out
}

pub fn random_walks(cfg: WalkCfg, tok: ReplayToken) -> Vec<Vec<Coord>> {
    let mut rng = tok.to_std_rng();
    let step = cfg.step_len.abs().max(1e-9);
    (0..cfg.count)
        .map(|_| {
            let mut p = Coord::new(rng.gen::<f64>() * cfg.extent, rng.gen::<f64>() * cfg.extent);
            let mut pts = Vec::with_capacity(cfg.steps.max(1) + 1);
            pts.push(p);
            for _ in 0..cfg.steps.max(1) {
                let th = rng.gen::<f64>() * 2.0 * PI;
                p = Coord::new(p.x + step * th.cos(), p.y + step * th.sin());
                pts.push(p);
            }
            pts
        })
        .collect()
}

pub fn grid_lines(cfg: GridCfg, tok: ReplayToken) -> Vec<Vec<Coord>> {
    let mut rng = tok.to_std_rng();
    let n = cfg.count.max(1);
    let span = cfg.spacing * (n as f64 + 1.0);
    let mut out = Vec::with_capacity(2 * n);
    for axis in 0..2 {
        for k in 1..=n {
            let at = cfg.spacing * k as f64;
            let (a, b) = if axis == 0 {
                ((0.0, at), (span, at))
            } else {
                ((at, 0.0), (at, span))
            };
            let p = Coord::new(a.0 + symmetric(&mut rng, cfg.jitter), a.1 + symmetric(&mut rng, cfg.jitter));
            let q = Coord::new(b.0 + symmetric(&mut rng, cfg.jitter), b.1 + symmetric(&mut rng, cfg.jitter));
            out.push(vec![p, q]);
        }
    }
    out
}

pub fn segment_fan(cfg: FanCfg, tok: ReplayToken) -> Vec<Vec<Coord>> {
    let mut rng = tok.to_std_rng();
    let half = cfg.length.abs().max(1e-9) / 2.0;
    let base = rng.gen::<f64>() * PI;
    (0..cfg.count)
        .map(|_| {
            let th = base + symmetric(&mut rng, cfg.spread);
            let (cx, cy) = (symmetric(&mut rng, cfg.offset), symmetric(&mut rng, cfg.offset));
            let (dx, dy) = (half * th.cos(), half * th.sin());
            vec![Coord::new(cx - dx, cy - dy), Coord::new(cx + dx, cy + dy)]
        })
        .collect()
}

/// Draw `count` lines of the given kind with default shape parameters.
pub fn draw_linework(kind: LineworkKind, count: usize, tok: ReplayToken) -> Vec<Vec<Coord>> {
    match kind {
        LineworkKind::Segments => random_segments(
            SegmentsCfg {
                count,
                ..SegmentsCfg::default()
            },
            tok,
        ),
        LineworkKind::Walks => random_walks(
            WalkCfg {
                count,
                ..WalkCfg::default()
            },
            tok,
        ),
        // `count` lines in total, half per axis.
        LineworkKind::Grid => grid_lines(
            GridCfg {
                count: count.div_ceil(2),
                jitter: 0.25,
                ..GridCfg::default()
            },
            tok,
        ),
        LineworkKind::Fan => segment_fan(
            FanCfg {
                count,
                ..FanCfg::default()
            },
            tok,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_is_deterministic_and_indexed() {
        let a = random_segments(SegmentsCfg::default(), ReplayToken::new(7, 0));
        let b = random_segments(SegmentsCfg::default(), ReplayToken::new(7, 0));
        let c = random_segments(SegmentsCfg::default(), ReplayToken::new(7, 1));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn shapes_have_requested_sizes() {
        let tok = ReplayToken::new(1, 2);
        let segs = random_segments(SegmentsCfg { count: 17, extent: 5.0 }, tok);
        assert_eq!(segs.len(), 17);
        assert!(segs.iter().flatten().all(|p| (0.0..5.0).contains(&p.x) && (0.0..5.0).contains(&p.y)));

        let walks = random_walks(WalkCfg { count: 3, steps: 8, ..WalkCfg::default() }, tok);
        assert_eq!(walks.len(), 3);
        assert!(walks.iter().all(|w| w.len() == 9));
        for w in &walks {
            for s in w.windows(2) {
                assert!((s[0].distance(&s[1]) - 5.0).abs() < 1e-9);
            }
        }

        let grid = grid_lines(GridCfg::default(), tok);
        assert_eq!(grid.len(), 20);
        assert_eq!(grid[0], vec![Coord::new(0.0, 10.0), Coord::new(110.0, 10.0)]);

        let fan = segment_fan(FanCfg { count: 5, ..FanCfg::default() }, tok);
        assert_eq!(fan.len(), 5);
        assert!(fan.iter().all(|s| (s[0].distance(&s[1]) - 100.0).abs() < 1e-6));
    }

    #[test]
    fn draw_dispatches_by_kind() {
        let tok = ReplayToken::new(3, 0);
        assert_eq!(draw_linework(LineworkKind::Segments, 4, tok).len(), 4);
        assert_eq!(draw_linework(LineworkKind::Walks, 4, tok).len(), 4);
        assert_eq!(draw_linework(LineworkKind::Grid, 5, tok).len(), 6);
        assert_eq!(draw_linework(LineworkKind::Fan, 4, tok).len(), 4);
    }
}
