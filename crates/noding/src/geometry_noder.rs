//! Geometry-level entry point: linework in, noded lines out.
//!
//! Purpose
//! - Pull polylines out of caller geometries (`Linework`), node them with the
//!   noder the precision model calls for, optionally validate, and hand every
//!   piece back to a caller factory (`LineFactory`) tagged with where it came from.
//!
//! Policy
//! - Floating precision runs `McIndexNoder`; fixed precision runs
//!   `SnapRoundingNoder`, so fixed output is always on the grid.
//! - Components with fewer than two points carry no linework and are skipped.
//!   A component with two or more points but a single distinct one, or with a
//!   non-finite ordinate, fails as `InvalidComponent` naming its geometry and
//!   component, wrapping `DegenerateInput` or `InvalidCoordinate`.
//! - Under fixed precision, lines that round to a single point are dropped.
//! - With `NodingCfg::validate`, output that is not fully noded fails with
//!   `NodingIncomplete` instead of being returned.

use tracing::{debug, info};

use crate::cfg::NodingCfg;
use crate::error::NodingError;
use crate::geom::{Coord, PrecisionModel};
use crate::noding::{validate_line, McIndexNoder, Noder, NodingValidator, SegmentString};
use crate::snapround::SnapRoundingNoder;

/// Anything that can list its polyline components.
pub trait Linework {
    fn for_each_component(&self, f: &mut dyn FnMut(&[Coord]));
}

impl Linework for Vec<Coord> {
    fn for_each_component(&self, f: &mut dyn FnMut(&[Coord])) {
        f(self)
    }
}

impl Linework for Vec<Vec<Coord>> {
    fn for_each_component(&self, f: &mut dyn FnMut(&[Coord])) {
        for line in self {
            f(line)
        }
    }
}

/// Which input geometry and which of its components a noded line came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineOrigin {
    pub geometry: usize,
    pub component: usize,
}

/// Builds caller-side lines from noded coordinates.
pub trait LineFactory {
    type Line;
    fn create_line(&mut self, coords: Vec<Coord>, origin: LineOrigin) -> Self::Line;
}

/// A noded line as plain coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct NodedLine {
    pub coords: Vec<Coord>,
    pub origin: LineOrigin,
}

/// Factory producing `NodedLine`s.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoordFactory;

impl LineFactory for CoordFactory {
    type Line = NodedLine;
    fn create_line(&mut self, coords: Vec<Coord>, origin: LineOrigin) -> NodedLine {
        NodedLine { coords, origin }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GeometryNoder {
    precision: PrecisionModel,
    cfg: NodingCfg,
}

impl Default for GeometryNoder {
    fn default() -> Self {
        Self::new(PrecisionModel::Floating)
    }
}

impl GeometryNoder {
    pub fn new(precision: PrecisionModel) -> Self {
        Self {
            precision,
            cfg: NodingCfg::default(),
        }
    }

    pub fn with_cfg(mut self, cfg: NodingCfg) -> Self {
        self.cfg = cfg;
        self
    }

    #[inline]
    pub fn precision(&self) -> PrecisionModel {
        self.precision
    }

    /// Extract, node and rebuild the linework of `geoms`.
    pub fn node<G, F>(&self, geoms: &[G], factory: &mut F) -> Result<Vec<F::Line>, NodingError>
    where
        G: Linework,
        F: LineFactory,
    {
        let strings = extract_strings(geoms)?;
        let noded = self.node_strings(strings)?;
        Ok(noded
            .into_iter()
            .map(|s| {
                let (pts, origin) = s.into_parts();
                factory.create_line(pts, origin)
            })
            .collect())
    }

    /// Node already-built strings with this noder's precision and options.
    pub fn node_strings<C: Clone>(
        &self,
        strings: Vec<SegmentString<C>>,
    ) -> Result<Vec<SegmentString<C>>, NodingError> {
        let n_in = strings.len();
        let out = match self.precision.scale() {
            None => McIndexNoder::new()
                .with_node_capacity(self.cfg.node_capacity)
                .node(strings)?,
            Some(scale) => SnapRoundingNoder::new(scale)?
                .with_cfg(&self.cfg)
                .node(strings)?,
        };
        debug!(
            strings_in = n_in,
            strings_out = out.len(),
            floating = self.precision.is_floating(),
            "noded linework"
        );
        if self.cfg.validate {
            NodingValidator::new(&out)
                .node_capacity(self.cfg.node_capacity)
                .check_valid()?;
        }
        Ok(out)
    }

    /// Like `node`, but retry once with snap rounding at `fallback` when the
    /// result is not fully noded.
    pub fn node_or_snap<G, F>(
        &self,
        geoms: &[G],
        factory: &mut F,
        fallback: PrecisionModel,
    ) -> Result<Vec<F::Line>, NodingError>
    where
        G: Linework,
        F: LineFactory,
    {
        match self.node(geoms, factory) {
            Err(e) if e.is_noding_incomplete() && !fallback.is_floating() => {
                info!(%e, scale = ?fallback.scale(), "retrying with snap rounding");
                Self {
                    precision: fallback,
                    cfg: self.cfg,
                }
                .node(geoms, factory)
            }
            other => other,
        }
    }
}

/// Validated segment strings for every component with at least two points.
///
/// The first failing component is reported as `InvalidComponent`; the wrapped
/// error's `string` is the component index within its geometry.
pub fn extract_strings<G: Linework>(
    geoms: &[G],
) -> Result<Vec<SegmentString<LineOrigin>>, NodingError> {
    let mut out = Vec::new();
    let mut first_err = None;
    for (geometry, g) in geoms.iter().enumerate() {
        let mut component = 0usize;
        g.for_each_component(&mut |pts| {
            let origin = LineOrigin {
                geometry,
                component,
            };
            component += 1;
            if first_err.is_some() || pts.len() < 2 {
                return;
            }
            match validate_line(pts, origin.component) {
                Ok(()) => out.push(SegmentString::from_valid(pts.to_vec(), origin)),
                Err(e) => {
                    first_err = Some(NodingError::InvalidComponent {
                        geometry,
                        component: origin.component,
                        source: Box::new(e),
                    })
                }
            }
        });
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(out),
    }
}
