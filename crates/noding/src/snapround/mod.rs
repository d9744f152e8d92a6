//! Snap rounding: noding whose output lives on a fixed grid.
//!
//! Rounding vertices alone can create new crossings (a segment moved across a
//! nearby vertex). Snap rounding avoids that by routing every segment through
//! the centre of each "hot" pixel it passes: pixels holding a vertex or an
//! intersection point. The result is fully noded on the grid and each output
//! vertex stays within half a pixel, on each axis, of the input it came from.
//!
//! - `HotPixel`: half-open grid cell and its exact segment test.
//! - `SnapRoundingNoder`: snaps input segments to hot pixels, adding pixels
//!   until the result is fully noded.

mod hot_pixel;
mod noder;

pub use hot_pixel::HotPixel;
pub use noder::{SnapRoundingNoder, SnapStats};

#[cfg(test)]
mod tests;
