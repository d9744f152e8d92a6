//! Noding: compute all intersections of a set of polylines and split them there.
//!
//! Pipeline
//! - `SegmentString`: validated polyline + caller context + node set.
//! - `compute_intersections`: index traversal feeding a `SegmentIntersector`.
//! - `IntersectionAdder` records nodes; `apply_records` registers them.
//! - `noded_substrings`: split at nodes (endpoints and spike collapses included).
//! - `McIndexNoder` runs the above on exact coordinates; `ScaledNoder` wraps any
//!   noder to run on an integer grid.
//! - `NodingValidator`: checks that a set is fully noded.

mod mc_noder;
pub mod node;
mod scaled;
mod segment_intersector;
mod segment_string;
mod validator;

pub use mc_noder::{apply_records, compute_intersections, McIndexNoder, Noder};
pub use node::SegmentNode;
pub use scaled::ScaledNoder;
pub use segment_intersector::{
    InteriorIntersectionFinder, IntersectionAdder, IntersectionRecord, SegmentIntersector,
};
pub use segment_string::{noded_substrings, to_segment_strings, SegmentString};
pub use validator::{NodingValidator, ValidationReport};

pub(crate) use scaled::unscale_line;
pub(crate) use segment_string::validate_line;
