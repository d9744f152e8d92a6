//! Curated API surface.
//!
//! Prefer these re-exports over deep module paths; internal layout may change.

// Values and errors
pub use crate::cfg::NodingCfg;
pub use crate::error::NodingError;
pub use crate::geom::{remove_repeated_points, Coord, Envelope, PrecisionModel};
// Predicates and intersection
pub use crate::algorithm::distance::point_to_segment;
pub use crate::algorithm::{
    orientation, orientation_index, Orientation, RobustLineIntersector, SegmentIntersection,
};
// Index
pub use crate::index::{MonotoneChainIndex, SegmentRef, StrTree};
// Noders
pub use crate::noding::{
    noded_substrings, to_segment_strings, InteriorIntersectionFinder, IntersectionAdder,
    IntersectionRecord, McIndexNoder, Noder, NodingValidator, ScaledNoder, SegmentIntersector,
    SegmentString, ValidationReport,
};
pub use crate::snapround::{HotPixel, SnapRoundingNoder, SnapStats};
// Facade
pub use crate::geometry_noder::{
    extract_strings, CoordFactory, GeometryNoder, LineFactory, LineOrigin, Linework, NodedLine,
};
// Random linework
pub use crate::random::{
    draw_linework, grid_lines, random_segments, random_walks, segment_fan, FanCfg, GridCfg,
    LineworkKind, ReplayToken, SegmentsCfg, WalkCfg,
};
