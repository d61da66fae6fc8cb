//! Project statistics.
//!
//! Counts images per partition and annotations per lifecycle state and
//! class, from records that were already validated.

mod report;

pub use report::{AnnotationCounts, ClassCount, GeometrySummary, ImageCounts, ProjectStats};

use std::collections::{BTreeMap, BTreeSet};

use crate::annotation::{AnnotationRecord, ClassIndex, ClassRegistry, ImageRecord, Partition};

/// Computes statistics for a project.
pub fn project_stats(
    images: &[ImageRecord],
    annotations: &[AnnotationRecord],
    classes: &ClassRegistry,
) -> ProjectStats {
    let mut image_counts = ImageCounts {
        total: images.len(),
        ..Default::default()
    };
    for image in images {
        match image.partition {
            Partition::Train => image_counts.train += 1,
            Partition::Val => image_counts.val += 1,
            Partition::Test => image_counts.test += 1,
        }
    }

    let known_images: BTreeSet<_> = images.iter().map(|img| img.id).collect();
    image_counts.annotated = annotations
        .iter()
        .map(|a| a.image_id)
        .filter(|id| known_images.contains(id))
        .collect::<BTreeSet<_>>()
        .len();

    let mut counts = AnnotationCounts {
        total: annotations.len(),
        ..Default::default()
    };
    for record in annotations {
        if record.is_valid() {
            counts.valid += 1;
        } else {
            counts.invalid += 1;
        }
        if !record.validation().warnings.is_empty() {
            counts.with_warnings += 1;
        }
        if record.is_simplified() {
            counts.simplified += 1;
        }
        if record.is_exported() {
            counts.exported += 1;
        }
        if record.is_export_ready() {
            counts.export_ready += 1;
        }
    }
    if !images.is_empty() {
        counts.avg_per_image = annotations.len() as f64 / images.len() as f64;
    }

    ProjectStats {
        images: image_counts,
        annotations: counts,
        geometry: geometry_summary(annotations),
        classes: class_counts(annotations, classes),
    }
}

fn geometry_summary(annotations: &[AnnotationRecord]) -> GeometrySummary {
    if annotations.is_empty() {
        return GeometrySummary::default();
    }

    let n = annotations.len() as f64;
    let total_points: usize = annotations.iter().map(|a| a.point_count()).sum();
    GeometrySummary {
        avg_points: total_points as f64 / n,
        max_points: annotations
            .iter()
            .map(|a| a.point_count())
            .max()
            .unwrap_or(0),
        avg_area: annotations.iter().map(|a| a.metrics().area).sum::<f64>() / n,
        avg_compactness: annotations
            .iter()
            .map(|a| a.metrics().compactness)
            .sum::<f64>()
            / n,
    }
}

fn class_counts(annotations: &[AnnotationRecord], classes: &ClassRegistry) -> Vec<ClassCount> {
    let mut counts: BTreeMap<ClassIndex, usize> =
        classes.iter().map(|c| (c.class_index, 0)).collect();
    for record in annotations {
        *counts.entry(record.class_index).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(class_index, count)| ClassCount {
            class_index,
            name: classes.get(class_index).map(|c| c.name.clone()),
            count,
        })
        .collect()
}
