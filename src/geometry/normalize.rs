//! Conversion between pixel and normalized polygons.

use super::{Normalized, Pixel, Point, Polygon};
use crate::error::SegsetError;

/// Converts a pixel polygon to normalized [0, 1] coordinates.
///
/// Each x is divided by `width` and each y by `height`. Coordinates outside
/// the image are scaled like any other and left for validation to report.
///
/// # Errors
/// Returns [`SegsetError::DimensionError`] if either dimension is not a
/// positive finite number.
pub fn normalize(
    polygon: &Polygon<Pixel>,
    width: f64,
    height: f64,
) -> Result<Polygon<Normalized>, SegsetError> {
    check_dimensions(width, height)?;
    Ok(Polygon::new(
        polygon
            .points()
            .iter()
            .map(|p| Point::new(p.x / width, p.y / height))
            .collect(),
    ))
}

/// Converts a normalized polygon back to pixel coordinates.
///
/// # Errors
/// Returns [`SegsetError::DimensionError`] if either dimension is not a
/// positive finite number.
pub fn denormalize(
    polygon: &Polygon<Normalized>,
    width: f64,
    height: f64,
) -> Result<Polygon<Pixel>, SegsetError> {
    check_dimensions(width, height)?;
    Ok(Polygon::new(
        polygon
            .points()
            .iter()
            .map(|p| p.scaled(width, height))
            .collect(),
    ))
}

fn check_dimensions(width: f64, height: f64) -> Result<(), SegsetError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(SegsetError::DimensionError { width, height })
    }
}
