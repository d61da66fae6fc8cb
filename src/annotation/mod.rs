//! Annotation records, images and classes.
//!
//! These are the stored entities the geometry pipeline produces and the
//! export packager consumes. Records reference images and classes by ID;
//! nothing here owns or loads image data.

mod ids;
mod model;
mod registry;

pub use ids::{AnnotationId, ClassIndex, ImageId};
pub use model::{AnnotationRecord, ClassDefinition, ExportFormat, ImageRecord, Partition};
pub use registry::{is_class_referenced, is_hex_color, ClassRegistry};
