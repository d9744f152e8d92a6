//! Point/segment metrics on `nalgebra` vectors.

use crate::geom::Coord;

/// Euclidean distance from `p` to the closed segment `a`–`b`.
pub fn point_to_segment(p: Coord, a: Coord, b: Coord) -> f64 {
    let ab = b.xy() - a.xy();
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return p.distance(&a);
    }
    let r = ((p.xy() - a.xy()).dot(&ab) / len2).clamp(0.0, 1.0);
    let closest = a.xy() + ab * r;
    (p.xy() - closest).norm()
}

/// Fraction of the way along `a → b` of the projection of `p`, clamped to [0, 1].
pub(crate) fn segment_fraction(p: Coord, a: Coord, b: Coord) -> f64 {
    let ab = b.xy() - a.xy();
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return 0.0;
    }
    ((p.xy() - a.xy()).dot(&ab) / len2).clamp(0.0, 1.0)
}

/// Z of `p` interpolated along `a`–`b`; a single known endpoint Z is used as is.
pub(crate) fn interpolate_z(p: Coord, a: Coord, b: Coord) -> Option<f64> {
    match (a.z, b.z) {
        (Some(za), Some(zb)) => Some(za + segment_fraction(p, a, b) * (zb - za)),
        (Some(z), None) | (None, Some(z)) => Some(z),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_interior_and_endpoints() {
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(10.0, 0.0);
        assert!((point_to_segment(Coord::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        assert!((point_to_segment(Coord::new(-3.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        assert!((point_to_segment(Coord::new(1.0, 1.0), a, a) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn z_interpolation() {
        let a = Coord::with_z(0.0, 0.0, 0.0);
        let b = Coord::with_z(10.0, 0.0, 20.0);
        let z = interpolate_z(Coord::new(2.5, 0.0), a, b).unwrap();
        assert!((z - 5.0).abs() < 1e-12);
        assert_eq!(interpolate_z(Coord::new(2.5, 0.0), a, Coord::new(10.0, 0.0)), Some(0.0));
        assert_eq!(
            interpolate_z(Coord::new(2.5, 0.0), Coord::new(0.0, 0.0), Coord::new(10.0, 0.0)),
            None
        );
    }
}
