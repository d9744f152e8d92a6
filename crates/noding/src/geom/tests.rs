use super::*;
use crate::error::NodingError;

#[test]
fn coord_equality_ignores_z() {
    let a = Coord::with_z(1.0, 2.0, 5.0);
    let b = Coord::new(1.0, 2.0);
    assert_eq!(a, b);
    assert!(a.equals_2d(&b));
    assert_ne!(a, Coord::new(1.0, 2.0000001));
    // -0.0 and 0.0 share a key.
    assert_eq!(Coord::new(-0.0, 0.0).key(), Coord::new(0.0, -0.0).key());
}

#[test]
fn repeated_points_are_removed() {
    let pts = vec![
        Coord::new(0.0, 0.0),
        Coord::new(0.0, 0.0),
        Coord::new(1.0, 0.0),
        Coord::new(1.0, 0.0),
        Coord::new(0.0, 0.0),
    ];
    let out = remove_repeated_points(&pts);
    assert_eq!(out.len(), 3);
    assert_eq!(count_distinct(&pts), 2);
}

#[test]
fn envelope_empty_and_expand() {
    let mut env = Envelope::default();
    assert!(env.is_empty());
    assert!(env.centre().is_none());
    assert!(!env.intersects(&Envelope::from_coord(Coord::new(0.0, 0.0))));
    env.expand_to_include(Coord::new(1.0, 2.0));
    env.expand_to_include(Coord::new(-1.0, 4.0));
    assert!(!env.is_empty());
    assert_eq!(env.min_x(), -1.0);
    assert_eq!(env.max_y(), 4.0);
    assert_eq!(env.centre(), Some(Coord::new(0.0, 3.0)));
    assert!(env.contains_coord(&Coord::new(0.0, 3.0)));
    let mut other = Envelope::empty();
    other.expand_to_include_env(&env);
    assert_eq!(other, env);
}

#[test]
fn envelope_touching_boxes_intersect() {
    let a = Envelope::from_segment(Coord::new(0.0, 0.0), Coord::new(1.0, 1.0));
    let b = Envelope::from_segment(Coord::new(1.0, 1.0), Coord::new(2.0, 3.0));
    let c = Envelope::from_segment(Coord::new(1.5, 0.0), Coord::new(2.0, 0.5));
    assert!(a.intersects(&b));
    assert!(!a.intersects(&c));
    assert!(a.expanded_by(0.5).intersects(&c));
    assert!(Envelope::segments_intersect(
        Coord::new(0.0, 0.0),
        Coord::new(1.0, 1.0),
        Coord::new(1.0, 1.0),
        Coord::new(2.0, 3.0)
    ));
}

#[test]
fn fixed_precision_rounds_to_grid() {
    let pm = PrecisionModel::fixed(10.0).unwrap();
    assert_eq!(pm.make_precise(3.04), 3.0);
    assert_eq!(pm.make_precise(3.06), 3.1);
    assert_eq!(pm.make_precise(-3.06), -3.1);
    assert_eq!(pm.grid_size(), Some(0.1));
    let coarse = PrecisionModel::fixed(0.01).unwrap();
    assert_eq!(coarse.make_precise(149.0), 100.0);
    assert_eq!(coarse.make_precise(151.0), 200.0);
    assert_eq!(PrecisionModel::Floating.make_precise(3.04), 3.04);
}

#[test]
fn fixed_precision_rejects_bad_scales() {
    assert!(matches!(
        PrecisionModel::fixed(0.0),
        Err(NodingError::InvalidPrecision { .. })
    ));
    assert!(PrecisionModel::fixed(f64::NAN).is_err());
    assert!(PrecisionModel::fixed(-2.0).is_err());
}

#[test]
fn pointwise_reduction_collapses_short_lines() {
    let pm = PrecisionModel::fixed(1.0).unwrap();
    let line = vec![Coord::new(0.1, 0.1), Coord::new(0.2, 0.3)];
    assert_eq!(pm.reduce_pointwise(&line).len(), 1);
    let z = pm.make_precise_coord(Coord::with_z(0.4, 0.6, 7.0));
    assert_eq!(z.z, Some(7.0));
    assert_eq!(z, Coord::new(0.0, 1.0));
}

#[test]
fn grid_mapping_rejects_overflow() {
    assert_eq!(to_grid(2.5, 2.0).unwrap(), 5.0);
    assert!(matches!(
        to_grid(1e300, 1e10),
        Err(NodingError::PrecisionOverflow { .. })
    ));
}

#[test]
fn grid_round_trip_matches_make_precise() {
    for &scale in &[10.0, 1000.0, 0.01] {
        let pm = PrecisionModel::fixed(scale).unwrap();
        for &v in &[3.04, -17.5, 149.0, 1234.5678] {
            let g = to_grid(v, scale).unwrap();
            assert_eq!(from_grid(g, scale), pm.make_precise(v), "v={v} scale={scale}");
        }
    }
}
