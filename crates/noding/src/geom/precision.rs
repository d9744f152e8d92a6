//! Precision models: floating (identity) or a fixed grid of spacing `1/scale`.
//!
//! Rounding is `floor(v·s + 0.5) / s` (ties go up). For `scale < 1` the grid size
//! is used directly so that the result is a multiple of the grid size.

use super::coord::{remove_repeated_points, Coord};
use crate::cfg::MAX_EXACT_SCALED;
use crate::error::NodingError;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PrecisionModel {
    #[default]
    Floating,
    Fixed {
        scale: f64,
    },
}

impl PrecisionModel {
    /// Fixed-grid model; rejects non-finite or non-positive scales.
    pub fn fixed(scale: f64) -> Result<Self, NodingError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(NodingError::InvalidPrecision { scale });
        }
        Ok(PrecisionModel::Fixed { scale })
    }

    #[inline]
    pub fn is_floating(&self) -> bool {
        matches!(self, PrecisionModel::Floating)
    }

    #[inline]
    pub fn scale(&self) -> Option<f64> {
        match *self {
            PrecisionModel::Floating => None,
            PrecisionModel::Fixed { scale } => Some(scale),
        }
    }

    #[inline]
    pub fn grid_size(&self) -> Option<f64> {
        self.scale().map(|s| 1.0 / s)
    }

    pub fn make_precise(&self, v: f64) -> f64 {
        match *self {
            PrecisionModel::Floating => v,
            PrecisionModel::Fixed { scale } => {
                if scale < 1.0 {
                    let grid = 1.0 / scale;
                    (v / grid + 0.5).floor() * grid
                } else {
                    (v * scale + 0.5).floor() / scale
                }
            }
        }
    }

    /// Round both ordinates; Z is carried unchanged.
    #[inline]
    pub fn make_precise_coord(&self, c: Coord) -> Coord {
        Coord {
            x: self.make_precise(c.x),
            y: self.make_precise(c.y),
            z: c.z,
        }
    }

    /// Round every vertex and drop the repeats this creates.
    ///
    /// The result may have a single point if the line collapses.
    pub fn reduce_pointwise(&self, pts: &[Coord]) -> Vec<Coord> {
        let rounded: Vec<Coord> = pts.iter().map(|p| self.make_precise_coord(*p)).collect();
        remove_repeated_points(&rounded)
    }
}

/// Map `v` onto the integer grid of spacing `1/scale`, rejecting values whose
/// grid index is no longer exactly representable.
pub(crate) fn to_grid(v: f64, scale: f64) -> Result<f64, NodingError> {
    let g = (to_scaled(v, scale) + 0.5).floor();
    if !g.is_finite() || g.abs() >= MAX_EXACT_SCALED {
        return Err(NodingError::PrecisionOverflow { value: v, scale });
    }
    Ok(g)
}

/// `v` in grid units, unrounded.
#[inline]
pub(crate) fn to_scaled(v: f64, scale: f64) -> f64 {
    if scale < 1.0 {
        v / (1.0 / scale)
    } else {
        v * scale
    }
}

/// Inverse of `to_grid`, matching `make_precise` bit for bit on grid indices.
#[inline]
pub(crate) fn from_grid(g: f64, scale: f64) -> f64 {
    if scale < 1.0 {
        g * (1.0 / scale)
    } else {
        g / scale
    }
}
