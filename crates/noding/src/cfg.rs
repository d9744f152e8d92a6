//! Noding configuration and numeric constants.
//!
//! Policy
//! - Numeric constants are fixed; only the knobs a caller plausibly tunes per call
//!   live in `NodingCfg`.

/// Relative error bound for the floating-point orientation filter.
pub(crate) const DP_SAFE_EPSILON: f64 = 1e-15;
/// Half-width of a hot pixel, in scaled (integer grid) units.
pub(crate) const PIXEL_TOLERANCE: f64 = 0.5;
/// Largest magnitude whose integers are all exactly representable as `f64`.
pub(crate) const MAX_EXACT_SCALED: f64 = 9_007_199_254_740_992.0;
/// Default fan-out of the packed R-tree.
pub(crate) const DEFAULT_NODE_CAPACITY: usize = 10;

/// Per-call noding options.
#[derive(Clone, Copy, Debug)]
pub struct NodingCfg {
    /// Upper bound on snap-rounding passes before reporting `NonConvergence`.
    pub max_snap_passes: usize,
    /// Run the validator over the output before returning it (facade only).
    pub validate: bool,
    /// Fan-out of the spatial index nodes.
    pub node_capacity: usize,
}

impl Default for NodingCfg {
    fn default() -> Self {
        Self {
            max_snap_passes: 64,
            validate: true,
            node_capacity: DEFAULT_NODE_CAPACITY,
        }
    }
}
