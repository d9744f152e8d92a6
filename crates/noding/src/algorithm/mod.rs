//! Exact predicates and robust segment intersection.
//!
//! - `orientation`: filtered floating-point / double-double orientation test.
//! - `RobustLineIntersector`: none / point / collinear classification of two segments.
//! - `distance`: point-to-segment metrics used by the intersector fallbacks.

mod dd;
pub mod distance;
mod intersector;
mod orientation;

pub use intersector::{RobustLineIntersector, SegmentIntersection};
pub use orientation::{orientation, orientation_index, Orientation};

pub(crate) use orientation::orientation_index_xy;
