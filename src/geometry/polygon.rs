//! Implicitly closed polygons.

use serde::{Deserialize, Serialize};

use super::bbox::BBoxXYWH;
use super::point::Point;

/// An ordered sequence of vertices; the last vertex connects to the first.
///
/// Construction is permissive: fewer than three points or non-finite
/// coordinates are representable so that validation can report them.
#[derive(Clone, PartialEq)]
pub struct Polygon<TSpace> {
    points: Vec<Point<TSpace>>,
}

impl<TSpace> Polygon<TSpace> {
    /// Creates a polygon from its vertices.
    pub fn new(points: Vec<Point<TSpace>>) -> Self {
        Self { points }
    }

    /// Creates a polygon from `(x, y)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(pairs.into_iter().map(|(x, y)| Point::new(x, y)).collect())
    }

    /// Creates a polygon from a flat `[x1, y1, x2, y2, ...]` list.
    ///
    /// Returns `None` when the list has an odd length.
    pub fn from_flat(coords: &[f64]) -> Option<Self> {
        if coords.len() % 2 != 0 {
            return None;
        }
        Some(Self::from_pairs(
            coords.chunks_exact(2).map(|chunk| (chunk[0], chunk[1])),
        ))
    }

    pub fn points(&self) -> &[Point<TSpace>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Flattens the vertices into `[x1, y1, x2, y2, ...]`.
    pub fn to_flat(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Returns true if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(Point::is_finite)
    }

    /// Iterates over the closed ring's edges, including last -> first.
    ///
    /// A single point yields no edges; two points yield the segment twice
    /// (there and back), matching the closed-ring perimeter definition.
    pub fn edges(&self) -> impl Iterator<Item = (Point<TSpace>, Point<TSpace>)> + '_
    where
        TSpace: Copy,
    {
        let n = if self.points.len() < 2 {
            0
        } else {
            self.points.len()
        };
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Keeps only the vertices at the given ascending indices.
    pub(crate) fn retain_indices(&self, indices: &[usize]) -> Self
    where
        TSpace: Copy,
    {
        Self::new(indices.iter().map(|&i| self.points[i]).collect())
    }

    /// Axis-aligned bounding box, or `None` for an empty polygon.
    pub fn bounding_box(&self) -> Option<BBoxXYWH<TSpace>> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(BBoxXYWH::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

impl<TSpace> std::fmt::Debug for Polygon<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.points).finish()
    }
}

impl<TSpace> Default for Polygon<TSpace> {
    fn default() -> Self {
        Self { points: Vec::new() }
    }
}

impl<TSpace> Serialize for Polygon<TSpace> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.points.serialize(serializer)
    }
}

impl<'de, TSpace> Deserialize<'de> for Polygon<TSpace> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Polygon::new(Vec::<Point<TSpace>>::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Normalized, Pixel};

    #[test]
    fn from_flat_rejects_odd_length() {
        assert!(Polygon::<Pixel>::from_flat(&[1.0, 2.0, 3.0]).is_none());

        let poly = Polygon::<Pixel>::from_flat(&[1.0, 2.0, 3.0, 4.0]).expect("even length");
        assert_eq!(poly.len(), 2);
        assert_eq!(poly.to_flat(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn edges_close_the_ring() {
        let poly = Polygon::<Normalized>::from_pairs([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let edges: Vec<_> = poly.edges().collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2].0, Point::new(1.0, 1.0));
        assert_eq!(edges[2].1, Point::new(0.0, 0.0));

        let single = Polygon::<Normalized>::from_pairs([(0.5, 0.5)]);
        assert_eq!(single.edges().count(), 0);
    }

    #[test]
    fn bounding_box_covers_all_points() {
        let poly = Polygon::<Pixel>::from_pairs([(10.0, 40.0), (30.0, 5.0), (25.0, 60.0)]);
        let bbox = poly.bounding_box().expect("non-empty polygon");
        assert_eq!(bbox.to_array(), [10.0, 5.0, 20.0, 55.0]);

        assert!(Polygon::<Pixel>::default().bounding_box().is_none());
    }

    #[test]
    fn serializes_as_nested_pairs() {
        let poly = Polygon::<Normalized>::from_pairs([(0.0, 0.5), (1.0, 0.25)]);
        let json = serde_json::to_string(&poly).expect("serialize");
        assert_eq!(json, "[[0.0,0.5],[1.0,0.25]]");
    }
}
