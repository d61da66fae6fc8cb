#![allow(dead_code)]

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

use segset::annotation::{
    AnnotationRecord, ClassDefinition, ClassRegistry, ImageRecord, Partition,
};
use segset::geometry::{NormalizedPolygon, PixelPolygon, Polygon};
use segset::PipelineConfig;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Tolerance for pixel coordinates that went through normalization.
pub fn eps_pixels(width: u32, height: u32) -> f64 {
    width.max(height) as f64 * 1e-12
}

pub fn arb_normalized_polygon(min_points: usize, max_points: usize) -> BoxedStrategy<NormalizedPolygon> {
    prop::collection::vec((0.0..=1.0f64, 0.0..=1.0f64), min_points..=max_points)
        .prop_map(Polygon::from_pairs)
        .boxed()
}

pub fn arb_pixel_polygon(width: u32, height: u32, max_points: usize) -> BoxedStrategy<PixelPolygon> {
    prop::collection::vec((0.0..=width as f64, 0.0..=height as f64), 3..=max_points)
        .prop_map(Polygon::from_pairs)
        .boxed()
}

pub fn arb_partition() -> BoxedStrategy<Partition> {
    prop_oneof![
        Just(Partition::Train),
        Just(Partition::Val),
        Just(Partition::Test)
    ]
    .boxed()
}

pub fn arb_images(max_images: usize) -> BoxedStrategy<Vec<ImageRecord>> {
    prop::collection::vec((16u32..2048, 16u32..2048, arb_partition()), 1..=max_images)
        .prop_map(|dims| {
            dims.into_iter()
                .enumerate()
                .map(|(i, (w, h, partition))| {
                    ImageRecord::new(i as u64 + 1, format!("img{:03}.png", i), w, h)
                        .with_partition(partition)
                })
                .collect()
        })
        .boxed()
}

pub fn classes() -> ClassRegistry {
    ClassRegistry::from_classes([
        ClassDefinition::new(0u32, "cell", "#FF0000"),
        ClassDefinition::new(1u32, "nucleus", "#00FF00"),
        ClassDefinition::new(2u32, "membrane", "#0000FF"),
    ])
    .expect("valid registry")
}

/// A small project: images plus records built from random in-image polygons.
///
/// Some polygons self-intersect, so the batch mixes valid and invalid records.
pub fn arb_batch(
    max_images: usize,
    max_annotations: usize,
    max_points: usize,
) -> BoxedStrategy<(Vec<ImageRecord>, Vec<AnnotationRecord>)> {
    arb_images(max_images)
        .prop_flat_map(move |images| {
            let n = images.len();
            let specs = prop::collection::vec(
                (0..n, 0u32..3, prop::collection::vec((0.0..=1.0f64, 0.0..=1.0f64), 3..=max_points)),
                0..=max_annotations,
            );
            (Just(images), specs)
        })
        .prop_map(|(images, specs)| {
            let config = PipelineConfig::default();
            let records = specs
                .into_iter()
                .enumerate()
                .map(|(i, (image_idx, class, unit))| {
                    let image = &images[image_idx];
                    let pixel = Polygon::from_pairs(unit.into_iter().map(|(u, v)| {
                        (u * image.width as f64, v * image.height as f64)
                    }));
                    AnnotationRecord::from_pixel_polygon(i as u64 + 1, image, class, pixel, &config)
                        .expect("record from in-image polygon")
                })
                .collect();
            (images, records)
        })
        .boxed()
}
