//! Douglas-Peucker polygon simplification.
//!
//! The first and last vertex of the input sequence are fixed endpoints. The
//! interior vertex farthest from the chord joining them is kept when its
//! perpendicular distance exceeds the tolerance, and both halves are
//! processed the same way; otherwise every interior vertex is dropped.
//!
//! The split vertex is the first one reaching the maximum distance, so the
//! result depends only on the input order. Because every kept split vertex
//! is also the farthest vertex among the survivors, running the simplifier
//! again with the same tolerance returns its input unchanged.

use serde::Serialize;

use super::{Point, Polygon};
use crate::error::SegsetError;

/// Counts describing one simplification run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SimplifyOutcome {
    pub original_count: usize,
    pub simplified_count: usize,
    pub tolerance: f64,
}

impl SimplifyOutcome {
    /// Fraction of points removed: `1 - simplified / original`.
    ///
    /// Zero for an empty input.
    pub fn reduction_percentage(&self) -> f64 {
        if self.original_count == 0 {
            return 0.0;
        }
        1.0 - self.simplified_count as f64 / self.original_count as f64
    }
}

/// Simplifies a polygon with the Douglas-Peucker algorithm.
///
/// `tolerance` is in the same units as the polygon's coordinates. Polygons
/// with two or fewer points are returned unchanged.
///
/// # Errors
/// Returns [`SegsetError::InvalidGeometry`] if `tolerance` is negative or
/// not finite.
pub fn simplify<TSpace: Copy>(
    polygon: &Polygon<TSpace>,
    tolerance: f64,
) -> Result<Polygon<TSpace>, SegsetError> {
    check_tolerance(tolerance)?;
    let keep = simplify_indices(polygon.points(), tolerance);
    Ok(polygon.retain_indices(&keep))
}

/// Returns the ascending indices of the vertices Douglas-Peucker keeps.
///
/// A negative tolerance behaves like zero; callers that need to reject it
/// should go through [`simplify`].
pub fn simplify_indices<TSpace>(points: &[Point<TSpace>], tolerance: f64) -> Vec<usize> {
    let n = points.len();
    if n <= 2 {
        return (0..n).collect();
    }

    let tolerance = tolerance.max(0.0);
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    // Explicit stack keeps deep, nearly-collinear inputs off the call stack.
    let mut ranges = vec![(0usize, n - 1)];
    while let Some((start, end)) = ranges.pop() {
        if end <= start + 1 {
            continue;
        }

        let mut max_dist = 0.0f64;
        let mut split: Option<usize> = None;
        for (i, point) in points.iter().enumerate().take(end).skip(start + 1) {
            let dist = perpendicular_distance(point, &points[start], &points[end]);
            if dist > max_dist {
                max_dist = dist;
                split = Some(i);
            }
        }

        if let Some(mid) = split {
            if max_dist > tolerance {
                keep[mid] = true;
                ranges.push((mid, end));
                ranges.push((start, mid));
            }
        }
    }

    keep.iter()
        .enumerate()
        .filter_map(|(i, &kept)| kept.then_some(i))
        .collect()
}

/// Distance from `point` to the line through `a` and `b`.
///
/// Falls back to the distance from `a` when the chord has zero length,
/// which happens for explicitly closed rings.
pub fn perpendicular_distance<TSpace>(
    point: &Point<TSpace>,
    a: &Point<TSpace>,
    b: &Point<TSpace>,
) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let chord = dx.hypot(dy);
    if chord == 0.0 {
        return point.distance(a);
    }
    (dx * (point.y - a.y) - dy * (point.x - a.x)).abs() / chord
}

pub(crate) fn check_tolerance(tolerance: f64) -> Result<(), SegsetError> {
    if tolerance.is_finite() && tolerance >= 0.0 {
        Ok(())
    } else {
        Err(SegsetError::InvalidGeometry {
            message: format!("simplification tolerance must be finite and >= 0, got {tolerance}"),
        })
    }
}
