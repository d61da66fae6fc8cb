//! Polygon validation for segset.
//!
//! Validation never fails: every problem becomes an issue in a
//! [`ValidationReport`], so a batch export can skip bad annotations and
//! report how many were skipped. The checks are:
//! - Structural: enough points, not too many points
//! - Numeric: finite coordinates, within [0, 1] for normalized polygons
//! - Geometric: non-zero area, no self-intersections

mod intersection;
mod report;

pub use report::{
    IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport, ValidationResult,
};

use crate::config::PipelineConfig;
use crate::geometry::{area, CoordinateSpace, Polygon};

/// Validates a polygon against the configured limits.
///
/// Normalized polygons must lie within [0, 1]; pixel polygons only need
/// finite coordinates. Area and self-intersection checks are skipped when
/// the polygon has too few points or non-finite coordinates, and the
/// O(n²) self-intersection check is skipped above `config.max_points`.
pub fn validate_polygon<S: CoordinateSpace>(
    polygon: &Polygon<S>,
    config: &PipelineConfig,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    let count = polygon.len();

    // Point count limits
    let enough_points = count >= config.min_points;
    if !enough_points {
        report.add(ValidationIssue::error(
            IssueCode::InsufficientPoints,
            format!(
                "{} point(s), at least {} required",
                count, config.min_points
            ),
        ));
    }

    let too_many_points = count > config.max_points;
    if too_many_points {
        report.add(ValidationIssue::error(
            IssueCode::TooManyPoints,
            format!("{} points exceed the limit of {}", count, config.max_points),
        ));
    } else if count >= config.near_limit_threshold() {
        report.add(ValidationIssue::warning(
            IssueCode::NearPointLimit,
            format!("{} of {} allowed points", count, config.max_points),
        ));
    }

    // Coordinate ranges
    let finite = check_coordinates(polygon, &mut report);

    if !enough_points || !finite {
        return report;
    }

    // Geometry
    let ring = intersection::dedup_ring(polygon.points());
    if ring.len() < count {
        report.add(ValidationIssue::warning(
            IssueCode::DuplicatePoints,
            format!("{} repeated vertex(es)", count - ring.len()),
        ));
    }

    let area = area(polygon);
    if area <= config.min_area {
        report.add(ValidationIssue::error(
            IssueCode::DegeneratePolygon,
            format!("area {:e} is not above {:e}", area, config.min_area),
        ));
    }

    if !too_many_points && intersection::has_self_intersection(&ring) {
        report.add(ValidationIssue::error(
            IssueCode::SelfIntersecting,
            "two non-adjacent edges intersect",
        ));
    }

    report
}

/// Adds at most one range issue; returns false if any coordinate is non-finite.
fn check_coordinates<S: CoordinateSpace>(polygon: &Polygon<S>, report: &mut ValidationReport) -> bool {
    if let Some(idx) = polygon.points().iter().position(|p| !p.is_finite()) {
        let p = polygon.points()[idx];
        report.add(ValidationIssue::error(
            IssueCode::CoordinateOutOfRange,
            format!("point {} has non-finite coordinates ({}, {})", idx, p.x, p.y),
        ));
        return false;
    }

    if S::UNIT_BOUNDED {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        let outside: Vec<usize> = polygon
            .points()
            .iter()
            .enumerate()
            .filter(|(_, p)| !in_unit(p.x) || !in_unit(p.y))
            .map(|(i, _)| i)
            .collect();

        if let Some(&first) = outside.first() {
            let p = polygon.points()[first];
            report.add(ValidationIssue::error(
                IssueCode::CoordinateOutOfRange,
                format!(
                    "{} {} point(s) outside [0, 1], first at index {} ({}, {})",
                    outside.len(),
                    S::NAME,
                    first,
                    p.x,
                    p.y
                ),
            ));
        }
    }

    true
}
