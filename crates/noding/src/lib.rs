//! Robust line noding and snap rounding.
//!
//! Given a set of polylines, compute every intersection despite floating-point
//! error and split the lines so that no two pieces meet except at shared
//! endpoints, optionally with all output vertices on a fixed grid.
//!
//! Layout
//! - `geom`: coordinates, envelopes, precision models.
//! - `algorithm`: orientation predicates, the robust segment intersector, distances.
//! - `index`: monotone chains in a packed STR tree.
//! - `noding`: segment strings, intersection visitors, the direct and scaled
//!   noders, and the validator.
//! - `snapround`: hot pixels and the iterated snap-rounding noder.
//! - `geometry_noder`: linework in, noded lines out.
//! - `random`: reproducible random linework.
//!
//! API Policy
//! - `api` is the curated surface for callers; module paths may move.

pub mod algorithm;
pub mod api;
pub mod cfg;
pub mod error;
pub mod geom;
pub mod geometry_noder;
pub mod index;
pub mod noding;
pub mod random;
pub mod snapround;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::NodingCfg;
pub use error::NodingError;
pub use geom::{Coord, Envelope, PrecisionModel};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::geometry_noder::{CoordFactory, GeometryNoder, LineFactory, LineOrigin, Linework, NodedLine};
    pub use crate::noding::{
        to_segment_strings, McIndexNoder, Noder, NodingValidator, ScaledNoder, SegmentString,
    };
    pub use crate::snapround::SnapRoundingNoder;
    pub use crate::{Coord, Envelope, NodingCfg, NodingError, PrecisionModel};
}
