//! Noding on an integer grid: scale, round, node, scale back.
//!
//! Rounding trades coordinate precision for exact predicates on the scaled
//! values. Distinct vertices closer than `1/scale` merge; a string that merges
//! down to a single point is dropped. Choosing a scale that suits the data is
//! the caller's job; coordinates whose grid index leaves the exactly
//! representable integer range are rejected with `PrecisionOverflow`.
//!
//! Only vertices are rounded here. Intersection points stay on the `1/scale`
//! grid only if the inner noder keeps them on the unit grid: use
//! `ScaledNoder::snap_rounding`, or an `McIndexNoder` with a unit fixed
//! precision. A floating inner noder leaves computed points off the grid.

use tracing::debug;

use super::mc_noder::Noder;
use super::segment_string::SegmentString;
use crate::error::NodingError;
use crate::geom::{count_distinct, from_grid, remove_repeated_points, to_grid, Coord, PrecisionModel};
use crate::snapround::SnapRoundingNoder;

/// Wraps an inner noder that runs on grid-index coordinates.
#[derive(Clone, Debug)]
pub struct ScaledNoder<N> {
    inner: N,
    scale: f64,
}

impl<N> ScaledNoder<N> {
    pub fn new(inner: N, scale: f64) -> Result<Self, NodingError> {
        PrecisionModel::fixed(scale)?;
        Ok(Self { inner, scale })
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub fn inner(&self) -> &N {
        &self.inner
    }

    /// Unit scale: grid indices are the output coordinates.
    #[inline]
    pub fn is_integer_precision(&self) -> bool {
        self.scale == 1.0
    }
}

impl ScaledNoder<SnapRoundingNoder> {
    /// Snap rounding on the unit grid of the scaled input: every output
    /// coordinate is a multiple of `1/scale`.
    pub fn snap_rounding(scale: f64) -> Result<Self, NodingError> {
        Self::new(SnapRoundingNoder::new(1.0)?, scale)
    }
}

/// Map `pts` to grid indices and drop the repeats this creates.
pub(crate) fn scale_line(pts: &[Coord], scale: f64) -> Result<Vec<Coord>, NodingError> {
    let scaled = pts
        .iter()
        .map(|p| {
            Ok(Coord {
                x: to_grid(p.x, scale)?,
                y: to_grid(p.y, scale)?,
                z: p.z,
            })
        })
        .collect::<Result<Vec<_>, NodingError>>()?;
    Ok(remove_repeated_points(&scaled))
}

pub(crate) fn unscale_line(pts: &[Coord], scale: f64) -> Vec<Coord> {
    pts.iter()
        .map(|p| Coord {
            x: from_grid(p.x, scale),
            y: from_grid(p.y, scale),
            z: p.z,
        })
        .collect()
}

/// Scale every string; strings collapsing to one point are dropped.
pub(crate) fn scale_strings<C>(
    strings: Vec<SegmentString<C>>,
    scale: f64,
) -> Result<Vec<SegmentString<C>>, NodingError> {
    let mut out = Vec::with_capacity(strings.len());
    let mut collapsed = 0usize;
    for s in strings {
        let (pts, ctx) = s.into_parts();
        let scaled = scale_line(&pts, scale)?;
        if count_distinct(&scaled) < 2 {
            collapsed += 1;
            continue;
        }
        out.push(SegmentString::from_valid(scaled, ctx));
    }
    if collapsed > 0 {
        debug!(collapsed, scale, "dropped strings collapsed by scaling");
    }
    Ok(out)
}

impl<C: Clone, N: Noder<C>> Noder<C> for ScaledNoder<N> {
    fn node(&self, strings: Vec<SegmentString<C>>) -> Result<Vec<SegmentString<C>>, NodingError> {
        let scaled = scale_strings(strings, self.scale)?;
        let noded = self.inner.node(scaled)?;
        if self.is_integer_precision() {
            return Ok(noded);
        }
        Ok(noded
            .into_iter()
            .map(|s| {
                let (pts, ctx) = s.into_parts();
                SegmentString::from_valid(unscale_line(&pts, self.scale), ctx)
            })
            .collect())
    }
}
