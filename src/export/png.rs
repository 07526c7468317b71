//! PNG export for scalar fields.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};
use thiserror::Error;

use crate::grid::ScalarField;

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Degenerate value range: min ({0}) >= max ({1})")]
    DegenerateRange(f32, f32),
}

/// Writes a scalar field as a 16-bit grayscale PNG, normalized over the
/// field's own value range.
///
/// Useful for eyeballing temperature or elevation snapshots; a rendering
/// layer with real color scales lives outside this crate.
pub fn write_scalar_png(field: &ScalarField, path: &Path) -> Result<(), ExportError> {
    let (min, max) = field.value_range();
    if min >= max {
        return Err(ExportError::DegenerateRange(min, max));
    }
    let range = max - min;

    let width = field.width() as u32;
    let height = field.height() as u32;
    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let value = field.get(x as usize, y as usize);
            let normalized = ((value - min) / range).clamp(0.0, 1.0);
            img.put_pixel(x, y, Luma([(normalized * 65535.0) as u16]));
        }
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder =
        PngEncoder::new_with_quality(writer, CompressionType::Default, FilterType::Adaptive);
    encoder.write_image(
        bytemuck::cast_slice(img.as_raw()),
        width,
        height,
        image::ExtendedColorType::L16,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSize;

    #[test]
    fn uniform_field_is_rejected() {
        let field = ScalarField::filled(GridSize::new(4, 4), 1.0);
        let err = write_scalar_png(&field, Path::new("/tmp/climatesim-test-uniform.png"));
        assert!(matches!(err, Err(ExportError::DegenerateRange(..))));
    }

    #[test]
    fn gradient_field_round_trips_to_disk() {
        let size = GridSize::new(8, 8);
        let data = size.cells().map(|(x, y)| (x + y) as f32).collect();
        let field = ScalarField::from_vec(size, data).unwrap();
        let dir = std::env::temp_dir().join("climatesim-test-export");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ramp.png");
        write_scalar_png(&field, &path).unwrap();
        assert!(path.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
