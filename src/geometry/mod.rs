//! Polygon geometry for segmentation annotations.
//!
//! This module holds the pure, synchronous building blocks of the
//! annotation pipeline:
//!
//! - [`normalize`] / [`denormalize`]: pixel <-> [0, 1] coordinate conversion
//! - [`simplify`]: Douglas-Peucker point reduction
//! - [`compute_metrics`]: area, perimeter and compactness
//!
//! # Design Principles
//!
//! 1. **Type Safety**: Polygons carry a marker type ([`Pixel`] or
//!    [`Normalized`]) so the two coordinate spaces cannot be mixed.
//!
//! 2. **Permissive Construction**: Polygons with too few points or
//!    non-finite coordinates can be built, so that validation can report
//!    problems instead of construction panicking.
//!
//! 3. **No Shared State**: Every function takes its input by reference and
//!    returns new output, so distinct polygons can be processed concurrently.
//!
//! # Example
//!
//! ```
//! use segset::geometry::{compute_metrics, normalize, simplify, Pixel, Polygon};
//!
//! let px = Polygon::<Pixel>::from_pairs([(0.0, 0.0), (64.0, 0.0), (64.0, 48.0), (0.0, 48.0)]);
//! let norm = normalize(&px, 640.0, 480.0)?;
//! let simplified = simplify(&norm, 0.002)?;
//! let metrics = compute_metrics(&simplified);
//! assert!((metrics.area - 0.01).abs() < 1e-12);
//! # Ok::<(), segset::SegsetError>(())
//! ```

mod bbox;
mod metrics;
mod normalize;
mod point;
mod polygon;
mod simplify;
mod space;

pub use bbox::BBoxXYWH;
pub use metrics::{area, compactness, compute_metrics, perimeter, signed_area, PolygonMetrics};
pub use normalize::{denormalize, normalize};
pub use point::Point;
pub use polygon::Polygon;
pub use simplify::{perpendicular_distance, simplify, simplify_indices, SimplifyOutcome};
pub(crate) use simplify::check_tolerance;
pub use space::{CoordinateSpace, Normalized, Pixel};

/// A polygon in absolute pixel coordinates.
pub type PixelPolygon = Polygon<Pixel>;

/// A polygon in normalized [0, 1] coordinates.
pub type NormalizedPolygon = Polygon<Normalized>;
