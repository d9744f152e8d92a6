//! Basic 2D value types shared by every noding component.
//!
//! - `Coord`: x/y with optional carried Z; `==` is exact 2D equality.
//! - `Envelope`: axis-aligned box with a distinguished empty state.
//! - `PrecisionModel`: floating or fixed grid (`1/scale` spacing).

mod coord;
mod envelope;
mod precision;

pub use coord::{remove_repeated_points, Coord};
pub use envelope::Envelope;
pub use precision::PrecisionModel;

pub(crate) use coord::count_distinct;
pub(crate) use precision::{from_grid, to_grid, to_scaled};

#[cfg(test)]
mod tests;
