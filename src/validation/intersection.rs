//! Pairwise segment intersection for self-intersection detection.

use crate::geometry::Point;

/// Returns true if any two non-adjacent edges of the closed ring intersect.
///
/// Runs in O(n²); callers bound `n` with the configured point limit.
/// Touching and collinear overlap count as intersections.
pub(super) fn has_self_intersection<TSpace: Copy>(ring: &[Point<TSpace>]) -> bool {
    let n = ring.len();
    if n < 4 {
        return false;
    }

    for i in 0..n {
        let (a1, a2) = (ring[i], ring[(i + 1) % n]);
        // j starts two edges later; the last edge is adjacent to the first.
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (b1, b2) = (ring[j], ring[(j + 1) % n]);
            if segments_intersect(&a1, &a2, &b1, &b2) {
                return true;
            }
        }
    }
    false
}

/// Drops vertices equal to their predecessor, including the wrap-around.
pub(super) fn dedup_ring<TSpace: Copy>(points: &[Point<TSpace>]) -> Vec<Point<TSpace>> {
    let mut ring: Vec<Point<TSpace>> = Vec::with_capacity(points.len());
    for p in points {
        if ring.last() != Some(p) {
            ring.push(*p);
        }
    }
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

fn segments_intersect<TSpace>(
    p1: &Point<TSpace>,
    p2: &Point<TSpace>,
    q1: &Point<TSpace>,
    q2: &Point<TSpace>,
) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// Cross product of (b - a) x (c - a).
fn orientation<TSpace>(a: &Point<TSpace>, b: &Point<TSpace>, c: &Point<TSpace>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Whether collinear point `p` lies within the bounding box of segment `a`-`b`.
fn on_segment<TSpace>(a: &Point<TSpace>, b: &Point<TSpace>, p: &Point<TSpace>) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}
