//! Grid-shaped storage for scalar and vector quantities.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Dimensions of the simulation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    /// Number of columns (longitude direction, wraps).
    pub width: usize,
    /// Number of rows (latitude direction, row 0 is north).
    pub height: usize,
}

impl GridSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Returns an iterator over all `(x, y)` cell coordinates in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.width;
        (0..self.height).flat_map(move |y| (0..w).map(move |x| (x, y)))
    }
}

/// A grid-shaped array of one physical quantity.
///
/// Values are stored in row-major order (`y * width + x`), matching the
/// flat buffer layout the compute kernels use.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<T> {
    size: GridSize,
    data: Vec<T>,
}

/// Scalar field: temperature, elevation, ice thickness.
pub type ScalarField = Field<f32>;
/// Two-component vector field: velocity.
pub type VectorField = Field<Vec2>;

impl<T: Copy> Field<T> {
    /// Creates a field with every cell set to `value`.
    pub fn filled(size: GridSize, value: T) -> Self {
        Self {
            size,
            data: vec![value; size.cell_count()],
        }
    }

    /// Wraps an existing row-major buffer.
    ///
    /// Returns `None` if the buffer length does not match `size`.
    pub fn from_vec(size: GridSize, data: Vec<T>) -> Option<Self> {
        if data.len() != size.cell_count() {
            return None;
        }
        Some(Self { size, data })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.width
    }

    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Returns the value at `(x, y)`.
    ///
    /// # Panics
    /// Panics if `x` or `y` is out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        debug_assert!(x < self.size.width && y < self.size.height);
        self.data[y * self.size.width + x]
    }

    /// Sets the value at `(x, y)`.
    ///
    /// # Panics
    /// Panics if `x` or `y` is out of bounds.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        debug_assert!(x < self.size.width && y < self.size.height);
        self.data[y * self.size.width + x] = value;
    }

    /// Flat row-major view of the cell data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl ScalarField {
    /// Returns the maximum value, or `floor` if every cell is below it.
    pub fn max_or(&self, floor: f32) -> f32 {
        self.data.iter().copied().fold(floor, f32::max)
    }

    /// Returns `(min, max)` over all cells.
    pub fn value_range(&self) -> (f32, f32) {
        let min = self.data.iter().copied().fold(f32::MAX, f32::min);
        let max = self.data.iter().copied().fold(f32::MIN, f32::max);
        (min, max)
    }
}

impl VectorField {
    /// Per-cell vector magnitude as a scalar field (e.g. wind speed).
    pub fn speed(&self) -> ScalarField {
        let data = self.data.iter().map(|v| v.length()).collect();
        ScalarField::from_vec(self.size, data).expect("same size")
    }

    /// Flattens to interleaved `[u0, v0, u1, v1, ...]` for GPU upload.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.data.len() * 2);
        for v in &self.data {
            out.push(v.x);
            out.push(v.y);
        }
        out
    }

    /// Rebuilds a vector field from interleaved `[u, v]` pairs.
    pub fn from_interleaved(size: GridSize, flat: &[f32]) -> Option<Self> {
        if flat.len() != size.cell_count() * 2 {
            return None;
        }
        let data = flat
            .chunks_exact(2)
            .map(|uv| Vec2::new(uv[0], uv[1]))
            .collect();
        Some(Self { size, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_field_has_uniform_values() {
        let f = ScalarField::filled(GridSize::new(8, 4), 273.15);
        assert_eq!(f.as_slice().len(), 32);
        assert!(f.iter().all(|&v| v == 273.15));
    }

    #[test]
    fn get_set_round_trip() {
        let mut f = ScalarField::filled(GridSize::new(6, 3), 0.0);
        f.set(5, 2, 1.5);
        assert_eq!(f.get(5, 2), 1.5);
        assert_eq!(f.get(0, 0), 0.0);
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        assert!(ScalarField::from_vec(GridSize::new(4, 4), vec![0.0; 15]).is_none());
        assert!(ScalarField::from_vec(GridSize::new(4, 4), vec![0.0; 16]).is_some());
    }

    #[test]
    fn speed_is_the_per_cell_magnitude() {
        let size = GridSize::new(2, 2);
        let mut f = VectorField::filled(size, Vec2::ZERO);
        f.set(1, 0, Vec2::new(3.0, 4.0));
        let speed = f.speed();
        assert_eq!(speed.get(1, 0), 5.0);
        assert_eq!(speed.get(0, 0), 0.0);
    }

    #[test]
    fn interleaved_round_trip() {
        let size = GridSize::new(3, 2);
        let mut f = VectorField::filled(size, Vec2::ZERO);
        f.set(1, 1, Vec2::new(2.0, -3.0));
        let flat = f.to_interleaved();
        assert_eq!(flat.len(), 12);
        let back = VectorField::from_interleaved(size, &flat).unwrap();
        assert_eq!(back.get(1, 1), Vec2::new(2.0, -3.0));
    }

    #[test]
    fn cells_iterate_row_major() {
        let coords: Vec<_> = GridSize::new(3, 2).cells().collect();
        assert_eq!(coords[0], (0, 0));
        assert_eq!(coords[1], (1, 0));
        assert_eq!(coords[3], (0, 1));
        assert_eq!(coords.len(), 6);
    }
}
