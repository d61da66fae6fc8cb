//! Coordinate space marker types.
//!
//! These are zero-sized types (ZSTs) used as type parameters to distinguish
//! pixel polygons from normalized polygons at compile time.

use std::fmt;

/// Behaviour shared by the coordinate space markers.
pub trait CoordinateSpace: Copy + 'static {
    /// Short name used in log and validation messages.
    const NAME: &'static str;

    /// True when valid coordinates must lie within [0, 1].
    const UNIT_BOUNDED: bool;
}

/// Marker type for pixel coordinates (absolute values).
///
/// (0, 0) is the top-left corner of the source image.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for normalized coordinates (0.0 to 1.0).
///
/// Normalized coordinates are fractions of the image width and height.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl CoordinateSpace for Pixel {
    const NAME: &'static str = "pixel";
    const UNIT_BOUNDED: bool = false;
}

impl CoordinateSpace for Normalized {
    const NAME: &'static str = "normalized";
    const UNIT_BOUNDED: bool = true;
}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
