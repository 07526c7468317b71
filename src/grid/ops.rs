//! Finite-difference operators over grid fields.
//!
//! All operators share one boundary rule: the x axis wraps toroidally
//! (longitude), the y axis clamps at the top and bottom rows (poles).
//! The asymmetry is a sphere-topology approximation and the compute
//! kernels in `gpu/shaders/common.wgsl` must implement it identically.

use glam::Vec2;

use super::{Field, ScalarField, VectorField};

/// Physical cell spacing in meters, derived from the planet circumference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSize {
    pub dx: f32,
    pub dy: f32,
}

impl StepSize {
    /// Spacing for a grid spanning the full circumference in both directions.
    pub fn from_circumference(circumference: f32, width: usize, height: usize) -> Self {
        Self {
            dx: circumference / width as f32,
            dy: circumference / height as f32,
        }
    }
}

/// The four axis-aligned neighbor values of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighborhood<T> {
    pub up: T,
    pub down: T,
    pub left: T,
    pub right: T,
}

/// Resolves the four neighbors of `(x, y)`.
///
/// `left`/`right` wrap around the x axis; `up` at `y = 0` and `down` at
/// `y = height - 1` return the cell's own value.
pub fn neighbors<T: Copy>(field: &Field<T>, x: usize, y: usize) -> Neighborhood<T> {
    let w = field.width();
    let h = field.height();

    let left = if x == 0 { field.get(w - 1, y) } else { field.get(x - 1, y) };
    let right = if x == w - 1 { field.get(0, y) } else { field.get(x + 1, y) };
    let up = if y == 0 { field.get(x, y) } else { field.get(x, y - 1) };
    let down = if y == h - 1 { field.get(x, y) } else { field.get(x, y + 1) };

    Neighborhood { up, down, left, right }
}

/// Centered-difference gradient of a scalar field.
pub fn gradient(field: &ScalarField, x: usize, y: usize, step: StepSize) -> Vec2 {
    let n = neighbors(field, x, y);
    Vec2::new(
        (n.right - n.left) / (2.0 * step.dx),
        (n.down - n.up) / (2.0 * step.dy),
    )
}

/// Per-component centered-difference gradient of a vector field.
///
/// Returns `(d/dx, d/dy)` of the `(u, v)` components.
pub fn vector_gradient(field: &VectorField, x: usize, y: usize, step: StepSize) -> (Vec2, Vec2) {
    let n = neighbors(field, x, y);
    let ddx = (n.right - n.left) / (2.0 * step.dx);
    let ddy = (n.down - n.up) / (2.0 * step.dy);
    (ddx, ddy)
}

/// Five-point Laplacian of a scalar field.
pub fn laplacian(field: &ScalarField, x: usize, y: usize, step: StepSize) -> f32 {
    let n = neighbors(field, x, y);
    let center = field.get(x, y);
    (n.right - 2.0 * center + n.left) / (step.dx * step.dx)
        + (n.down - 2.0 * center + n.up) / (step.dy * step.dy)
}

/// Eulerian (fixed-point) rate of change of a scalar quantity, given its
/// material (Lagrangian) rate: `∂f/∂t = Df/Dt − v·∇f`.
pub fn local_derivative(
    field: &ScalarField,
    velocity: Vec2,
    material: f32,
    x: usize,
    y: usize,
    step: StepSize,
) -> f32 {
    material - velocity.dot(gradient(field, x, y, step))
}

/// Vector counterpart of [`local_derivative`]: the advection term
/// `(v·∇)V` is subtracted componentwise from the material rate.
pub fn local_derivative_vec(
    field: &VectorField,
    velocity: Vec2,
    material: Vec2,
    x: usize,
    y: usize,
    step: StepSize,
) -> Vec2 {
    let (ddx, ddy) = vector_gradient(field, x, y, step);
    material - (velocity.x * ddx + velocity.y * ddy)
}
