use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationReport;

/// The main error type for segset operations.
#[derive(Debug, Error)]
pub enum SegsetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid geometry: {message}")]
    InvalidGeometry { message: String },

    #[error("Invalid image dimensions {width}x{height} (must be positive and finite)")]
    DimensionError { width: f64, height: f64 },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Annotation {annotation_id} references class index {class_index}, which is not in the class registry")]
    MissingClassReference {
        annotation_id: u64,
        class_index: u32,
    },

    #[error("Annotation {annotation_id} references image {image_id}, which was not supplied")]
    MissingImageReference { annotation_id: u64, image_id: u64 },

    #[error("Archive path '{path}' is produced by more than one image")]
    ArchivePathConflict { path: String },

    #[error("Invalid pipeline config: {message}")]
    InvalidConfig { message: String },

    #[error("Duplicate {what} id {id} in export request")]
    DuplicateId { what: &'static str, id: u64 },

    #[error("Invalid class registry: {message}")]
    InvalidClassRegistry { message: String },

    #[error("Class index {class_index} is still referenced by {references} annotation(s)")]
    ClassInUse {
        class_index: u32,
        references: usize,
    },

    #[error("Invalid partition split: {message}")]
    InvalidSplit { message: String },

    #[error("Failed to parse project JSON from {path}: {source}")]
    ProjectJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write project JSON to {path}: {source}")]
    ProjectJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse config from {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize {what}: {source}")]
    ManifestSerialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write archive {path}: {source}")]
    ArchiveWrite {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },
}
