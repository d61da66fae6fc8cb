//! COCO instance segmentation output.
//!
//! Segmentations, areas and boxes are written in pixel units, computed from
//! the normalized polygon and the image dimensions. Every list is sorted by
//! id so identical input always serializes to identical bytes.

use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationRecord, ClassRegistry, ImageRecord};
use crate::error::SegsetError;
use crate::geometry::{area, denormalize};

/// Top-level COCO document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CocoDataset {
    pub info: CocoInfo,
    pub images: Vec<CocoImage>,
    pub annotations: Vec<CocoAnnotation>,
    pub categories: Vec<CocoCategory>,
}

/// COCO info block. Carries no dates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CocoInfo {
    pub description: String,
    pub version: String,
}

impl Default for CocoInfo {
    fn default() -> Self {
        Self {
            description: "Exported by segset".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CocoImage {
    pub id: u64,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

impl From<&ImageRecord> for CocoImage {
    fn from(image: &ImageRecord) -> Self {
        Self {
            id: image.id.as_u64(),
            file_name: image.file_name.clone(),
            width: image.width,
            height: image.height,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CocoCategory {
    pub id: u32,
    pub name: String,
}

/// COCO annotation entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CocoAnnotation {
    pub id: u64,
    pub image_id: u64,
    pub category_id: u32,

    /// A single polygon as `[[x1, y1, x2, y2, ...]]` in pixels.
    pub segmentation: Vec<Vec<f64>>,

    /// Shoelace area in pixels².
    pub area: f64,

    /// `[x, y, width, height]` in pixels, (x, y) being the top-left corner.
    pub bbox: [f64; 4],

    pub iscrowd: u8,
}

impl CocoAnnotation {
    /// Builds the entry for `record`, which must be drawn on `image`.
    pub fn from_record(record: &AnnotationRecord, image: &ImageRecord) -> Result<Self, SegsetError> {
        let pixel = denormalize(
            record.normalized(),
            f64::from(image.width),
            f64::from(image.height),
        )?;
        // `+ 0.0` drops the sign of -0.0 so equal polygons serialize equally.
        let bbox = pixel
            .bounding_box()
            .map(|b| b.to_array().map(|v| v + 0.0))
            .unwrap_or([0.0; 4]);
        let flat = pixel.to_flat().into_iter().map(|v| v + 0.0).collect();

        Ok(Self {
            id: record.id.as_u64(),
            image_id: record.image_id.as_u64(),
            category_id: record.class_index.as_u32(),
            segmentation: vec![flat],
            area: area(&pixel),
            bbox,
            iscrowd: 0,
        })
    }
}

/// Assembles a document from already-built entries, sorting everything by id.
pub fn build_dataset<'a>(
    images: impl IntoIterator<Item = &'a ImageRecord>,
    mut annotations: Vec<CocoAnnotation>,
    classes: &ClassRegistry,
) -> CocoDataset {
    let mut images: Vec<CocoImage> = images.into_iter().map(CocoImage::from).collect();
    images.sort_by_key(|i| i.id);

    annotations.sort_by_key(|a| a.id);

    // The registry already iterates in index order.
    let categories = classes
        .iter()
        .map(|c| CocoCategory {
            id: c.class_index.as_u32(),
            name: c.name.clone(),
        })
        .collect();

    CocoDataset {
        info: CocoInfo::default(),
        images,
        annotations,
        categories,
    }
}

/// Serializes a document as pretty-printed JSON.
pub fn to_json_vec(dataset: &CocoDataset) -> Result<Vec<u8>, SegsetError> {
    serde_json::to_vec_pretty(dataset).map_err(|source| SegsetError::ManifestSerialize {
        what: "COCO annotations",
        source,
    })
}
