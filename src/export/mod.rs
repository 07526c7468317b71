//! Snapshot export: grayscale PNG dumps of scalar fields.

mod png;

pub use png::{write_scalar_png, ExportError};
