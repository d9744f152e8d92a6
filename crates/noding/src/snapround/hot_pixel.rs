//! Hot pixels: grid cells around rounded vertices and intersection points.
//!
//! A pixel is the half-open square `[cx - 1/2, cx + 1/2) × [cy - 1/2, cy + 1/2)`
//! in scaled units: left and bottom sides are inside, top and right are not, so
//! every point of the plane lies in exactly one pixel and rounding a point
//! (ties up) yields the centre of the pixel containing it.

use crate::algorithm::orientation_index_xy;
use crate::cfg::PIXEL_TOLERANCE;
use crate::geom::{from_grid, to_scaled, Coord, Envelope};

/// Round half up, the grid rounding used everywhere in the crate.
#[inline]
pub(crate) fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// The pixel around a point at scale `scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HotPixel {
    scale: f64,
    /// Centre in scaled units.
    hx: f64,
    hy: f64,
    z: Option<f64>,
}

impl HotPixel {
    /// Pixel containing `pt`.
    pub fn new(pt: Coord, scale: f64) -> Self {
        Self {
            scale,
            hx: round_half_up(to_scaled(pt.x, scale)),
            hy: round_half_up(to_scaled(pt.y, scale)),
            z: pt.z,
        }
    }

    /// Centre in input units (carries the Z of the point it was built from).
    pub fn centre(&self) -> Coord {
        Coord {
            x: from_grid(self.hx, self.scale),
            y: from_grid(self.hy, self.scale),
            z: self.z,
        }
    }

    /// Closed bounding box of the pixel in input units, for index queries.
    pub fn envelope(&self) -> Envelope {
        let h = PIXEL_TOLERANCE;
        Envelope::from_segment(
            Coord::new(from_grid(self.hx - h, self.scale), from_grid(self.hy - h, self.scale)),
            Coord::new(from_grid(self.hx + h, self.scale), from_grid(self.hy + h, self.scale)),
        )
    }

    #[inline]
    fn scaled(&self, v: f64) -> f64 {
        to_scaled(v, self.scale)
    }

    pub fn intersects_point(&self, p: Coord) -> bool {
        let (x, y) = (self.scaled(p.x), self.scaled(p.y));
        let h = PIXEL_TOLERANCE;
        x >= self.hx - h && x < self.hx + h && y >= self.hy - h && y < self.hy + h
    }

    /// Does the closed segment `p0`–`p1` meet the (half-open) pixel?
    pub fn intersects(&self, p0: Coord, p1: Coord) -> bool {
        let (mut px, mut py) = (self.scaled(p0.x), self.scaled(p0.y));
        let (mut qx, mut qy) = (self.scaled(p1.x), self.scaled(p1.y));
        if px > qx {
            std::mem::swap(&mut px, &mut qx);
            std::mem::swap(&mut py, &mut qy);
        }
        let h = PIXEL_TOLERANCE;
        let (min_x, max_x) = (self.hx - h, self.hx + h);
        let (min_y, max_y) = (self.hy - h, self.hy + h);

        // Box rejection against the half-open pixel.
        if px >= max_x || qx < min_x {
            return false;
        }
        if py.min(qy) >= max_y || py.max(qy) < min_y {
            return false;
        }
        // Axis-parallel segments that survive the box test cross the interior
        // or run along the included left/bottom sides.
        if px == qx || py == qy {
            return true;
        }

        let rising = py < qy;
        let orient = |cx: f64, cy: f64| orientation_index_xy(px, py, qx, qy, cx, cy);

        // Through a top corner: only the upper-left corner of a falling segment
        // and the upper-right corner of a rising one lead into the pixel.
        let ul = orient(min_x, max_y);
        if ul == 0 {
            return !rising;
        }
        let ur = orient(max_x, max_y);
        if ur == 0 {
            return rising;
        }
        if ul != ur {
            return true; // crosses the top side
        }
        let ll = orient(min_x, min_y);
        if ll == 0 {
            return true; // the lower-left corner belongs to the pixel
        }
        if ll != ul {
            return true; // crosses the left side
        }
        let lr = orient(max_x, min_y);
        if lr == 0 {
            return !rising;
        }
        // Crosses the bottom or the right side.
        ll != lr || lr != ur
    }
}
