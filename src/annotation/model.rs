//! Annotation records and the image/class data they reference.
//!
//! An [`AnnotationRecord`] is built once from a raw pixel polygon and then
//! updated in place: simplification replaces its coordinates, validation
//! and metrics are recomputed after every change, and export marks it with
//! the format it was last packaged in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::ids::{AnnotationId, ClassIndex, ImageId};
use crate::config::PipelineConfig;
use crate::error::SegsetError;
use crate::geometry::{
    check_tolerance, compute_metrics, normalize, simplify_indices, NormalizedPolygon,
    PixelPolygon, PolygonMetrics, SimplifyOutcome,
};
use crate::validation::{validate_polygon, IssueContext, ValidationReport, ValidationResult};

/// Dataset partition an image belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    #[default]
    Train,
    Val,
    Test,
}

impl Partition {
    /// All partitions in archive order.
    pub const ALL: [Partition; 3] = [Partition::Train, Partition::Val, Partition::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Val => "val",
            Partition::Test => "test",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format of an export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Yolo,
    Coco,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Yolo => "yolo",
            ExportFormat::Coco => "coco",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = SegsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yolo" => Ok(ExportFormat::Yolo),
            "coco" => Ok(ExportFormat::Coco),
            other => Err(SegsetError::UnsupportedFormat(format!(
                "'{}' (supported: yolo, coco)",
                other
            ))),
        }
    }
}

/// An image the annotations are drawn on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: ImageId,

    /// File name inside the project, also used for the archive paths.
    pub file_name: String,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,

    #[serde(default)]
    pub partition: Partition,
}

impl ImageRecord {
    pub fn new(id: impl Into<ImageId>, file_name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            width,
            height,
            partition: Partition::default(),
        }
    }

    pub fn with_partition(mut self, partition: Partition) -> Self {
        self.partition = partition;
        self
    }

    /// File name without directories or extension, used for label files.
    pub fn stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }

    /// Base file name without directories, used for image entries.
    pub fn base_name(&self) -> &str {
        Path::new(&self.file_name)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }
}

/// A class (label) an annotation can be assigned to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub class_index: ClassIndex,
    pub name: String,

    /// Display color as `#RRGGBB`.
    pub color: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl ClassDefinition {
    pub fn new(class_index: impl Into<ClassIndex>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            class_index: class_index.into(),
            name: name.into(),
            color: color.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// The display name, falling back to the class name.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// A stored polygon annotation.
///
/// `point_count` always equals the length of the normalized polygon; it is
/// recomputed whenever the polygon changes and when a record is loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredRecord")]
pub struct AnnotationRecord {
    pub id: AnnotationId,
    pub image_id: ImageId,
    pub class_index: ClassIndex,
    normalized: NormalizedPolygon,
    #[serde(skip_serializing_if = "Option::is_none")]
    original: Option<PixelPolygon>,
    point_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    simplification: Option<f64>,
    metrics: PolygonMetrics,
    validation: ValidationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    export: Option<ExportFormat>,
}

#[derive(Deserialize)]
struct StoredRecord {
    id: AnnotationId,
    image_id: ImageId,
    class_index: ClassIndex,
    normalized: NormalizedPolygon,
    #[serde(default)]
    original: Option<PixelPolygon>,
    #[serde(default)]
    simplification: Option<f64>,
    #[serde(default)]
    metrics: PolygonMetrics,
    #[serde(default = "unvalidated")]
    validation: ValidationResult,
    #[serde(default)]
    export: Option<ExportFormat>,
}

fn unvalidated() -> ValidationResult {
    ValidationResult {
        is_valid: false,
        errors: vec!["not validated".to_string()],
        warnings: Vec::new(),
    }
}

impl From<StoredRecord> for AnnotationRecord {
    fn from(stored: StoredRecord) -> Self {
        Self {
            id: stored.id,
            image_id: stored.image_id,
            class_index: stored.class_index,
            point_count: stored.normalized.len(),
            normalized: stored.normalized,
            original: stored.original,
            simplification: stored.simplification,
            metrics: stored.metrics,
            validation: stored.validation,
            export: stored.export,
        }
    }
}

impl AnnotationRecord {
    /// Builds a record from a raw pixel polygon drawn on `image`.
    ///
    /// The polygon is normalized by the image dimensions, simplified when
    /// `config.auto_simplify` is set, then validated and measured. Invalid
    /// geometry does not fail the call; it is recorded in
    /// [`validation`](Self::validation).
    ///
    /// # Errors
    /// Returns [`SegsetError::DimensionError`] if the image has a zero
    /// dimension, or [`SegsetError::InvalidGeometry`] if the configured
    /// tolerance is invalid.
    pub fn from_pixel_polygon(
        id: impl Into<AnnotationId>,
        image: &ImageRecord,
        class_index: impl Into<ClassIndex>,
        pixel: PixelPolygon,
        config: &PipelineConfig,
    ) -> Result<Self, SegsetError> {
        let normalized = normalize(&pixel, f64::from(image.width), f64::from(image.height))?;
        let mut record = Self {
            id: id.into(),
            image_id: image.id,
            class_index: class_index.into(),
            point_count: normalized.len(),
            normalized,
            original: Some(pixel),
            simplification: None,
            metrics: PolygonMetrics::default(),
            validation: unvalidated(),
            export: None,
        };

        if config.auto_simplify {
            record.simplify(config.simplification_tolerance, config)?;
        } else {
            record.revalidate(config);
        }

        log::debug!(
            "built annotation {} on image {}: {} points, valid={}",
            record.id,
            record.image_id,
            record.point_count,
            record.validation.is_valid
        );
        Ok(record)
    }

    /// Simplifies the polygon in place with Douglas-Peucker.
    ///
    /// The kept vertex indices are applied to the retained pixel polygon
    /// too, so both stay aligned. Metrics and validation are recomputed.
    pub fn simplify(
        &mut self,
        tolerance: f64,
        config: &PipelineConfig,
    ) -> Result<SimplifyOutcome, SegsetError> {
        check_tolerance(tolerance)?;

        let original_count = self.normalized.len();
        let keep = simplify_indices(self.normalized.points(), tolerance);
        self.normalized = self.normalized.retain_indices(&keep);
        if let Some(pixel) = &self.original {
            // A stored pixel polygon of a different length cannot be aligned.
            self.original = (pixel.len() == original_count).then(|| pixel.retain_indices(&keep));
        }
        self.simplification = Some(tolerance);
        self.revalidate(config);

        let outcome = SimplifyOutcome {
            original_count,
            simplified_count: self.point_count,
            tolerance,
        };
        log::debug!(
            "simplified annotation {}: {} -> {} points ({:.1}% reduction)",
            self.id,
            outcome.original_count,
            outcome.simplified_count,
            outcome.reduction_percentage() * 100.0
        );
        Ok(outcome)
    }

    /// Recomputes metrics and validation from the current polygon.
    ///
    /// Returns the full report with issues attributed to this annotation.
    pub fn revalidate(&mut self, config: &PipelineConfig) -> ValidationReport {
        self.point_count = self.normalized.len();
        self.metrics = compute_metrics(&self.normalized);

        let mut report = ValidationReport::new();
        report.extend_with_context(
            validate_polygon(&self.normalized, config),
            IssueContext::Annotation {
                id: self.id.as_u64(),
            },
        );
        self.validation = report.to_result();
        report
    }

    /// Records that this annotation was included in an export.
    pub fn mark_exported(&mut self, format: ExportFormat) {
        self.export = Some(format);
    }

    pub fn normalized(&self) -> &NormalizedPolygon {
        &self.normalized
    }

    /// The pixel polygon the record was built from, if retained.
    pub fn original(&self) -> Option<&PixelPolygon> {
        self.original.as_ref()
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// The tolerance of the last simplification, if any.
    pub fn simplification_tolerance(&self) -> Option<f64> {
        self.simplification
    }

    pub fn is_simplified(&self) -> bool {
        self.simplification.is_some()
    }

    pub fn metrics(&self) -> &PolygonMetrics {
        &self.metrics
    }

    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    pub fn is_valid(&self) -> bool {
        self.validation.is_valid
    }

    /// The format of the last export that included this record.
    pub fn export_format(&self) -> Option<ExportFormat> {
        self.export
    }

    pub fn is_exported(&self) -> bool {
        self.export.is_some()
    }

    /// Valid and never exported.
    pub fn is_export_ready(&self) -> bool {
        self.is_valid() && !self.is_exported()
    }
}
