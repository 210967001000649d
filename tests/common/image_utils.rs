//! Image checks for rendered colorbars.

use image::{DynamicImage, GenericImageView, ImageError, ImageFormat};
use std::path::Path;

/// Load an image from a file
pub fn load_image(path: &Path) -> Result<DynamicImage, ImageError> {
    image::open(path)
}

/// Check that the file at `path` is encoded as `expected_format`
pub fn assert_image_format(path: &Path, expected_format: ImageFormat) -> Result<(), String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    let actual_format =
        image::guess_format(&bytes).map_err(|_| "Could not detect image format".to_string())?;

    if actual_format != expected_format {
        return Err(format!(
            "Image format differs: actual = {:?}, expected = {:?}",
            actual_format, expected_format
        ));
    }

    Ok(())
}

/// Check that a colorbar reads horizontally
pub fn assert_landscape(image: &DynamicImage) -> Result<(), String> {
    let (width, height) = image.dimensions();
    if width <= height {
        return Err(format!(
            "Expected a horizontal colorbar, got {}x{}",
            width, height
        ));
    }
    Ok(())
}

/// Check that all four corners are fully transparent
pub fn assert_transparent_corners(image: &DynamicImage) -> Result<(), String> {
    let (width, height) = image.dimensions();
    for (x, y) in [(0, 0), (width - 1, 0), (0, height - 1), (width - 1, height - 1)] {
        let alpha = image.get_pixel(x, y).0[3];
        if alpha != 0 {
            return Err(format!("Corner ({}, {}) has alpha {}", x, y, alpha));
        }
    }
    Ok(())
}

/// Whether any pixel has exactly this opaque color
pub fn contains_color(image: &DynamicImage, rgb: [u8; 3]) -> bool {
    image
        .pixels()
        .any(|(_, _, p)| p.0 == [rgb[0], rgb[1], rgb[2], 255])
}
