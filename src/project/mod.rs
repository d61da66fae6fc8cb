//! On-disk project documents used by the CLI.
//!
//! A [`RawProject`] holds pixel polygons as drawn; [`Project`] holds the
//! processed [`AnnotationRecord`]s. Both are plain JSON documents.

pub mod io_json;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::annotation::{
    AnnotationId, AnnotationRecord, ClassIndex, ClassRegistry, ImageId, ImageRecord,
};
use crate::config::PipelineConfig;
use crate::error::SegsetError;
use crate::export::ExportRequest;
use crate::geometry::PixelPolygon;

/// A processed project: images, classes and annotation records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub classes: ClassRegistry,

    pub images: Vec<ImageRecord>,

    #[serde(default)]
    pub annotations: Vec<AnnotationRecord>,
}

impl Project {
    /// Borrows the project as an export request.
    pub fn export_request(&self) -> ExportRequest<'_> {
        ExportRequest {
            annotations: &self.annotations,
            images: &self.images,
            classes: &self.classes,
        }
    }
}

/// A project whose annotations are still raw pixel polygons.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub classes: ClassRegistry,

    pub images: Vec<ImageRecord>,

    #[serde(default)]
    pub annotations: Vec<RawAnnotation>,
}

/// A polygon as drawn, in pixel coordinates of its image.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawAnnotation {
    pub id: AnnotationId,
    pub image_id: ImageId,
    pub class_index: ClassIndex,
    pub points: PixelPolygon,
}

impl RawProject {
    /// Builds annotation records for every raw polygon.
    ///
    /// Invalid polygons become invalid records; only a reference to an
    /// unknown image fails the call.
    pub fn process(self, config: &PipelineConfig) -> Result<Project, SegsetError> {
        let images: BTreeMap<ImageId, &ImageRecord> =
            self.images.iter().map(|img| (img.id, img)).collect();

        let mut annotations = Vec::with_capacity(self.annotations.len());
        for raw in self.annotations {
            let image = images
                .get(&raw.image_id)
                .ok_or(SegsetError::MissingImageReference {
                    annotation_id: raw.id.as_u64(),
                    image_id: raw.image_id.as_u64(),
                })?;
            annotations.push(AnnotationRecord::from_pixel_polygon(
                raw.id,
                image,
                raw.class_index,
                raw.points,
                config,
            )?);
        }

        let invalid = annotations.iter().filter(|a| !a.is_valid()).count();
        log::info!(
            "processed {} annotation(s), {} invalid",
            annotations.len(),
            invalid
        );

        Ok(Project {
            name: self.name,
            classes: self.classes,
            images: self.images,
            annotations,
        })
    }
}
