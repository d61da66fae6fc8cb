//! Fuzz target for the polygon pipeline.
//!
//! Interprets the input as little-endian f64 pairs and runs them through
//! simplification, validation and metrics. Non-finite values are allowed.

#![no_main]

use libfuzzer_sys::fuzz_target;
use segset::geometry::{compute_metrics, simplify, NormalizedPolygon};
use segset::validation::validate_polygon;
use segset::PipelineConfig;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }

    let coords: Vec<f64> = data
        .chunks_exact(8)
        .map(|chunk| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            f64::from_le_bytes(bytes)
        })
        .collect();
    let Some(polygon) = NormalizedPolygon::from_flat(&coords[..coords.len() / 2 * 2]) else {
        return;
    };

    let config = PipelineConfig::default();
    let _ = validate_polygon(&polygon, &config);
    let _ = compute_metrics(&polygon);
    if let Ok(simplified) = simplify(&polygon, config.simplification_tolerance) {
        assert!(simplified.len() <= polygon.len());
    }
});
