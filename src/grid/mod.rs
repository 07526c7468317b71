//! Grid and field containers.
//!
//! Every simulated quantity lives on the same fixed-size rectangular grid.
//! Row `y = 0` is the north edge; the x axis wraps around (longitude) while
//! the y axis clamps at the poles. See [`ops`] for the finite-difference
//! operators built on that boundary rule.

mod field;
pub mod ops;

pub use field::{Field, GridSize, ScalarField, VectorField};
