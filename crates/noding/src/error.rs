//! Failure values surfaced by the noding core.
//!
//! Every public entry point returns `Result<_, NodingError>`; nothing is retried
//! internally and nothing is swallowed. Callers decide policy (for example,
//! re-running with a fixed precision model after `NodingIncomplete`).

use std::fmt;

use crate::geom::Coord;

/// Errors surfaced by noding, validation and snap rounding.
#[derive(Clone, Debug, PartialEq)]
pub enum NodingError {
    /// An input string has fewer than two distinct coordinates.
    DegenerateInput { string: usize, distinct: usize },
    /// An input coordinate is NaN or infinite.
    InvalidCoordinate { string: usize, vertex: usize },
    /// A fixed precision model was requested with a non-positive or non-finite scale.
    InvalidPrecision { scale: f64 },
    /// Snap rounding was asked to run with a floating precision model.
    FloatingPrecision,
    /// A coordinate cannot be represented exactly on the scaled integer grid.
    PrecisionOverflow { value: f64, scale: f64 },
    /// The intersector could not produce a finite intersection point.
    RobustnessFailure { segments: [Coord; 4] },
    /// The validator found proper intersections left in the output.
    NodingIncomplete { intersections: Vec<Coord> },
    /// Snap rounding did not reach a fixed point within the configured pass budget.
    NonConvergence { passes: usize, pending: usize },
    /// A component of a caller geometry failed input checks; `source` carries
    /// the check that failed, with `string` set to the component index.
    InvalidComponent {
        geometry: usize,
        component: usize,
        source: Box<NodingError>,
    },
}

impl NodingError {
    /// True for the failure that a stricter precision model usually resolves.
    #[inline]
    pub fn is_noding_incomplete(&self) -> bool {
        matches!(self, NodingError::NodingIncomplete { .. })
    }

    #[inline]
    pub fn is_robustness_failure(&self) -> bool {
        matches!(self, NodingError::RobustnessFailure { .. })
    }
}

impl fmt::Display for NodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodingError::DegenerateInput { string, distinct } => write!(
                f,
                "segment string {} is degenerate (needs ≥2 distinct coordinates, has {})",
                string, distinct
            ),
            NodingError::InvalidCoordinate { string, vertex } => write!(
                f,
                "segment string {} has a non-finite coordinate at vertex {}",
                string, vertex
            ),
            NodingError::InvalidPrecision { scale } => {
                write!(f, "precision scale must be finite and > 0 (got {scale})")
            }
            NodingError::FloatingPrecision => {
                write!(f, "snap rounding needs a fixed precision model")
            }
            NodingError::PrecisionOverflow { value, scale } => write!(
                f,
                "coordinate {value} exceeds the exact integer range at scale {scale}"
            ),
            NodingError::RobustnessFailure { segments } => write!(
                f,
                "cannot classify intersection of {} - {} and {} - {}",
                segments[0], segments[1], segments[2], segments[3]
            ),
            NodingError::NodingIncomplete { intersections } => {
                write!(f, "found {} unnoded interior intersection(s)", intersections.len())?;
                if let Some(first) = intersections.first() {
                    write!(f, ", first at {first}")?;
                }
                Ok(())
            }
            NodingError::NonConvergence { passes, pending } => write!(
                f,
                "snap rounding did not converge after {passes} passes ({pending} nodes pending)"
            ),
            NodingError::InvalidComponent {
                geometry,
                component,
                source,
            } => write!(f, "geometry {geometry}, component {component}: {source}"),
        }
    }
}

impl std::error::Error for NodingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NodingError::InvalidComponent { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
