//! Shape-quality metrics: area, perimeter and compactness.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::Polygon;

/// Metrics of one polygon, in the polygon's own units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonMetrics {
    pub area: f64,
    pub perimeter: f64,
    /// Isoperimetric ratio `4π·area / perimeter²`: 1.0 for a circle.
    pub compactness: f64,
}

impl PolygonMetrics {
    pub fn is_finite(&self) -> bool {
        self.area.is_finite() && self.perimeter.is_finite() && self.compactness.is_finite()
    }
}

/// Computes area, perimeter and compactness of a polygon.
///
/// Coordinates large enough to overflow any metric yield all-zero metrics,
/// so stored metrics are always finite.
pub fn compute_metrics<TSpace: Copy>(polygon: &Polygon<TSpace>) -> PolygonMetrics {
    let area = area(polygon);
    let perimeter = perimeter(polygon);
    let metrics = PolygonMetrics {
        area,
        perimeter,
        compactness: compactness(area, perimeter),
    };
    if metrics.is_finite() {
        metrics
    } else {
        PolygonMetrics::default()
    }
}

/// Shoelace area: `0.5 * |Σ(x_i·y_{i+1} − x_{i+1}·y_i)|`.
///
/// Zero for fewer than three points.
pub fn area<TSpace: Copy>(polygon: &Polygon<TSpace>) -> f64 {
    signed_area(polygon).abs()
}

/// Signed shoelace area; positive for counter-clockwise rings in a y-up frame.
pub fn signed_area<TSpace: Copy>(polygon: &Polygon<TSpace>) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let twice: f64 = polygon
        .edges()
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice / 2.0
}

/// Sum of the closed ring's edge lengths.
pub fn perimeter<TSpace: Copy>(polygon: &Polygon<TSpace>) -> f64 {
    polygon.edges().map(|(a, b)| a.distance(&b)).sum()
}

/// `4π·area / perimeter²`, or zero when the perimeter is zero.
pub fn compactness(area: f64, perimeter: f64) -> f64 {
    if perimeter == 0.0 {
        return 0.0;
    }
    4.0 * PI * area / (perimeter * perimeter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Normalized, Pixel};

    #[test]
    fn unit_square_metrics() {
        let square = Polygon::<Normalized>::from_pairs([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let metrics = compute_metrics(&square);
        assert_eq!(metrics.area, 1.0);
        assert_eq!(metrics.perimeter, 4.0);
        assert!((metrics.compactness - PI / 4.0).abs() < 1e-12);
    }

    #[test]
    fn orientation_does_not_change_area() {
        let ccw = Polygon::<Pixel>::from_pairs([(0.0, 0.0), (4.0, 0.0), (0.0, 3.0)]);
        let cw = Polygon::<Pixel>::from_pairs([(0.0, 0.0), (0.0, 3.0), (4.0, 0.0)]);
        assert_eq!(area(&ccw), 6.0);
        assert_eq!(area(&cw), 6.0);
        assert_eq!(signed_area(&ccw), -signed_area(&cw));
        assert_eq!(perimeter(&ccw), 12.0);
    }

    #[test]
    fn regular_polygon_approaches_circle() {
        let n = 360;
        let ring = Polygon::<Pixel>::from_pairs((0..n).map(|i| {
            let t = 2.0 * PI * i as f64 / n as f64;
            (t.cos(), t.sin())
        }));
        let metrics = compute_metrics(&ring);
        assert!(metrics.compactness > 0.999 && metrics.compactness <= 1.0);
    }

    #[test]
    fn degenerate_inputs_have_zero_metrics() {
        let point = Polygon::<Pixel>::from_pairs([(2.0, 2.0)]);
        assert_eq!(compute_metrics(&point), PolygonMetrics::default());

        let segment = Polygon::<Pixel>::from_pairs([(0.0, 0.0), (3.0, 4.0)]);
        let metrics = compute_metrics(&segment);
        assert_eq!(metrics.area, 0.0);
        assert_eq!(metrics.perimeter, 10.0);
        assert_eq!(metrics.compactness, 0.0);
    }

    #[test]
    fn overflowing_coordinates_give_zero_metrics() {
        let huge = Polygon::<Pixel>::from_pairs([(1e308, 1e308), (-1e308, 1e308), (0.0, -1e308)]);
        assert!(!area(&huge).is_finite());
        assert_eq!(compute_metrics(&huge), PolygonMetrics::default());

        let nan = Polygon::<Pixel>::from_pairs([(0.0, 0.0), (f64::NAN, 1.0), (1.0, 1.0)]);
        assert_eq!(compute_metrics(&nan), PolygonMetrics::default());
    }
}
