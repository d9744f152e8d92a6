use super::*;
use crate::algorithm::distance::point_to_segment;
use crate::cfg::NodingCfg;
use crate::error::NodingError;
use crate::geom::Coord;
use crate::noding::{to_segment_strings, McIndexNoder, Noder, NodingValidator, SegmentString};
use crate::random::{random_segments, ReplayToken, SegmentsCfg};
use proptest::prelude::*;

fn line(xy: &[(f64, f64)]) -> Vec<Coord> {
    xy.iter().map(|&p| Coord::from(p)).collect()
}

fn strings(lines: &[&[(f64, f64)]]) -> Vec<SegmentString<usize>> {
    to_segment_strings(lines.iter().enumerate().map(|(i, l)| (line(l), i))).unwrap()
}

fn coords(out: &[SegmentString<usize>]) -> Vec<Vec<Coord>> {
    out.iter().map(|s| s.coordinates().to_vec()).collect()
}

/// Smallest `d` such that some point of `a`–`b` is within `d` of `p` on both axes.
fn axis_distance_to_segment(p: Coord, a: Coord, b: Coord) -> f64 {
    let (ex, ey) = (p.x - a.x, p.y - a.y);
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let at = |t: f64| (ex - dx * t).abs().max((ey - dy * t).abs());
    // Convex and piecewise linear in t: the minimum sits at a kink or an end.
    [
        0.0,
        1.0,
        ex / dx,
        ey / dy,
        (ex - ey) / (dx - dy),
        (ex + ey) / (dx + dy),
    ]
    .into_iter()
    .filter(|t| t.is_finite())
    .map(|t| at(t.clamp(0.0, 1.0)))
    .fold(f64::INFINITY, f64::min)
}

/// Worst per-axis distance from an output vertex to the input line it came from.
fn worst_snap_distance(input: &[(Vec<Coord>, usize)], out: &[SegmentString<usize>]) -> f64 {
    let mut worst: f64 = 0.0;
    for s in out {
        let src = &input.iter().find(|(_, i)| i == s.context()).unwrap().0;
        for p in s.coordinates() {
            let d = src
                .windows(2)
                .map(|w| axis_distance_to_segment(*p, w[0], w[1]))
                .fold(f64::INFINITY, f64::min);
            worst = worst.max(d);
        }
    }
    worst
}

#[test]
fn segment_passing_near_a_vertex_is_routed_through_it() {
    // At y = 3 the first segment is at x = 3.04, inside the pixel of (3, 3).
    let input = strings(&[&[(3.0, 0.0), (3.1, 7.5)], &[(0.0, 3.0), (3.0, 3.0)]]);
    let (out, stats) = SnapRoundingNoder::new(10.0).unwrap().node_with_stats(input).unwrap();
    assert_eq!(
        coords(&out),
        vec![
            line(&[(3.0, 0.0), (3.0, 3.0)]),
            line(&[(3.0, 3.0), (3.1, 7.5)]),
            line(&[(0.0, 3.0), (3.0, 3.0)]),
        ]
    );
    assert_eq!(stats.passes, 1);
    assert_eq!(stats.nodes_added, 1);
    assert_eq!(stats.hot_pixels, 4);
    assert!(NodingValidator::new(&out).is_valid().unwrap());
    // The moved point stays within half a grid cell of where the segment was.
    assert!(point_to_segment(Coord::new(3.0, 3.0), Coord::new(3.0, 0.0), Coord::new(3.1, 7.5)) <= 0.05);
}

#[test]
fn crossing_on_a_grid_point_splits_both() {
    let input = strings(&[&[(0.0, 0.0), (10.0, 10.0)], &[(0.0, 10.0), (10.0, 0.0)]]);
    let out = SnapRoundingNoder::new(1.0).unwrap().node(input).unwrap();
    assert_eq!(
        coords(&out),
        vec![
            line(&[(0.0, 0.0), (5.0, 5.0)]),
            line(&[(5.0, 5.0), (10.0, 10.0)]),
            line(&[(0.0, 10.0), (5.0, 5.0)]),
            line(&[(5.0, 5.0), (10.0, 0.0)]),
        ]
    );
    let ctx: Vec<usize> = out.iter().map(|s| *s.context()).collect();
    assert_eq!(ctx, vec![0, 0, 1, 1]);
}

#[test]
fn off_grid_crossing_is_snapped_to_its_pixel() {
    // Crossing at (5, 1.5) rounds up to (5, 2).
    let input = strings(&[&[(0.0, 0.0), (10.0, 3.0)], &[(0.0, 3.0), (10.0, 0.0)]]);
    let out = SnapRoundingNoder::new(1.0).unwrap().node(input).unwrap();
    assert_eq!(
        coords(&out),
        vec![
            line(&[(0.0, 0.0), (5.0, 2.0)]),
            line(&[(5.0, 2.0), (10.0, 3.0)]),
            line(&[(0.0, 3.0), (5.0, 2.0)]),
            line(&[(5.0, 2.0), (10.0, 0.0)]),
        ]
    );
    assert!(NodingValidator::new(&out).is_valid().unwrap());
}

#[test]
fn collapsed_strings_are_dropped() {
    let input = strings(&[&[(0.1, 0.0), (0.2, 0.1)], &[(0.0, 5.0), (4.0, 5.0)]]);
    let (out, stats) = SnapRoundingNoder::new(1.0).unwrap().node_with_stats(input).unwrap();
    assert_eq!(stats.collapsed, 1);
    assert_eq!(out.len(), 1);
    assert_eq!(*out[0].context(), 1);
}

#[test]
fn one_pass_resolves_input_hot_pixels() {
    let input = strings(&[
        &[(3.0, 0.0), (3.1, 7.5)],
        &[(0.0, 3.0), (3.0, 3.0)],
        &[(0.0, 0.0), (7.0, 7.0)],
    ]);
    let cfg = NodingCfg {
        max_snap_passes: 1,
        ..NodingCfg::default()
    };
    let (out, stats) = SnapRoundingNoder::new(10.0)
        .unwrap()
        .with_cfg(&cfg)
        .node_with_stats(input)
        .unwrap();
    assert_eq!(stats.passes, 1);
    assert!(NodingValidator::new(&out).is_valid().unwrap());
}

#[test]
fn output_stays_within_half_a_pixel_of_its_input() {
    // Iterating on already bent segments used to drift past one pixel here.
    for seed in 0..400u64 {
        let cfg = SegmentsCfg {
            count: 2 + (seed % 6) as usize,
            extent: 20.0,
        };
        let input: Vec<(Vec<Coord>, usize)> = random_segments(cfg, ReplayToken::new(seed, 0))
            .into_iter()
            .enumerate()
            .map(|(i, l)| (l, i))
            .collect();
        let (out, stats) = SnapRoundingNoder::new(1.0)
            .unwrap()
            .node_with_stats(to_segment_strings(input.clone()).unwrap())
            .unwrap();
        assert!(NodingValidator::new(&out).is_valid().unwrap(), "seed {seed}");
        let worst = worst_snap_distance(&input, &out);
        assert!(worst <= 0.5 + 1e-9, "seed {seed}: {worst} after {} passes", stats.passes);
    }
}

#[test]
fn axis_distance_measures_the_nearer_axis_gap() {
    let (a, b) = (Coord::new(0.0, 0.0), Coord::new(10.0, 0.0));
    assert_eq!(axis_distance_to_segment(Coord::new(5.0, 0.4), a, b), 0.4);
    assert_eq!(axis_distance_to_segment(Coord::new(-1.0, 0.5), a, b), 1.0);
    let diag = Coord::new(10.0, 10.0);
    // (1, 0) is 0.5 from (0.5, 0.5) on both axes.
    assert_eq!(axis_distance_to_segment(Coord::new(1.0, 0.0), a, diag), 0.5);
}

#[test]
fn floating_model_cannot_snap() {
    assert_eq!(
        SnapRoundingNoder::from_precision(crate::geom::PrecisionModel::Floating).unwrap_err(),
        NodingError::FloatingPrecision
    );
    let noder = SnapRoundingNoder::from_precision(crate::geom::PrecisionModel::fixed(4.0).unwrap()).unwrap();
    assert_eq!(noder.scale(), 4.0);
}

#[test]
fn z_is_interpolated_at_snapped_nodes() {
    let a = vec![Coord::with_z(0.0, 0.0, 0.0), Coord::with_z(10.0, 10.0, 10.0)];
    let b = line(&[(0.0, 10.0), (10.0, 0.0)]);
    let input = to_segment_strings(vec![(a, 0usize), (b, 1)]).unwrap();
    let out = SnapRoundingNoder::new(1.0).unwrap().node(input).unwrap();
    assert_eq!(out[0].coordinates()[1], Coord::new(5.0, 5.0));
    assert_eq!(out[0].coordinates()[1].z, Some(5.0));
}

#[test]
fn invalid_scale_is_rejected() {
    assert!(matches!(
        SnapRoundingNoder::new(0.0),
        Err(NodingError::InvalidPrecision { .. })
    ));
}

fn segment() -> impl Strategy<Value = [f64; 4]> {
    [0.0..20.0f64, 0.0..20.0f64, 0.0..20.0f64, 0.0..20.0f64]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn snap_rounding_output_is_noded_on_grid_and_stable(
        segs in prop::collection::vec(segment(), 1..8),
        scale in prop::sample::select(vec![1.0f64, 2.0]),
    ) {
        let input: Vec<(Vec<Coord>, usize)> = segs
            .iter()
            .enumerate()
            .filter(|(_, s)| (s[0], s[1]) != (s[2], s[3]))
            .map(|(i, s)| (vec![Coord::new(s[0], s[1]), Coord::new(s[2], s[3])], i))
            .collect();
        prop_assume!(!input.is_empty());
        let noder = SnapRoundingNoder::new(scale).unwrap();
        let (out, stats) = noder.node_with_stats(to_segment_strings(input.clone()).unwrap()).unwrap();

        // Every vertex is a grid point.
        for s in &out {
            for p in s.coordinates() {
                prop_assert_eq!((p.x * scale).fract(), 0.0);
                prop_assert_eq!((p.y * scale).fract(), 0.0);
            }
        }
        prop_assert!(NodingValidator::new(&out).is_valid().unwrap());

        // Every vertex is within half a grid cell of its input on each axis.
        prop_assert!(worst_snap_distance(&input, &out) <= 0.5 / scale + 1e-9);
        prop_assert!(stats.passes >= 1);

        // Surviving inputs keep their rounded endpoints.
        let pm = crate::geom::PrecisionModel::fixed(scale).unwrap();
        for (pts, i) in &input {
            let (p, q) = (pm.make_precise_coord(pts[0]), pm.make_precise_coord(pts[1]));
            if p == q {
                continue;
            }
            for end in [p, q] {
                prop_assert!(out.iter().any(|s| s.context() == i
                    && (s.coordinates()[0] == end || *s.coordinates().last().unwrap() == end)));
            }
        }

        // Noding the output again finds nothing to split, and the result is
        // deterministic.
        let again = McIndexNoder::new().node(out.clone()).unwrap();
        prop_assert_eq!(coords(&again), coords(&out));
        let rerun = noder.node(to_segment_strings(input).unwrap()).unwrap();
        let bits = |v: &[SegmentString<usize>]| -> Vec<(u64, u64, usize)> {
            v.iter()
                .flat_map(|s| s.coordinates().iter().map(move |p| (p.x.to_bits(), p.y.to_bits(), *s.context())))
                .collect()
        };
        prop_assert_eq!(bits(&rerun), bits(&out));
    }
}
