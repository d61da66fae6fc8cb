//! Dataset export: formatting annotation records and packaging them.
//!
//! [`export_dataset`] turns a batch of annotation records, the images they
//! are drawn on and the class registry into an [`ExportBundle`], a sorted
//! map of archive paths to bytes:
//!
//! ```text
//! labels/<partition>/<stem>.txt        YOLO, one file per image
//! labels/<partition>/instances.json    COCO, the partition's subset
//! classes.txt                          YOLO class names
//! annotations.json                     COCO, the whole dataset
//! images/<partition>/<file_name>       only with `include_images`
//! dataset_info.json                    the manifest
//! ```
//!
//! Partitions are written in train, val, test order and omitted when they
//! have no images. Invalid annotations are skipped and counted, never
//! repaired; simplification and validation happen before export.
//!
//! The bundle stays in memory; persisting it is up to the caller.

mod bundle;
pub mod coco;
pub mod yolo;

pub use bundle::{DatasetManifest, ExportBundle, ManifestClass, PartitionSummary};
pub use coco::{CocoAnnotation, CocoDataset};
pub use yolo::YoloLabelLine;

use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

use crate::annotation::{
    AnnotationRecord, ClassRegistry, ExportFormat, ImageId, ImageRecord, Partition,
};
use crate::error::SegsetError;
use bundle::FileSet;

/// Everything an export reads. Borrowed; the caller keeps ownership.
#[derive(Clone, Copy, Debug)]
pub struct ExportRequest<'a> {
    pub annotations: &'a [AnnotationRecord],
    pub images: &'a [ImageRecord],
    pub classes: &'a ClassRegistry,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Copy image bytes into `images/<partition>/`.
    pub include_images: bool,
    /// Skip annotations that were already exported.
    pub only_unexported: bool,
}

/// Supplies image bytes for `include_images` exports.
///
/// Returning `None` skips the image without failing the export.
pub trait ImageResolver {
    fn resolve(&self, image: &ImageRecord) -> Option<Vec<u8>>;
}

impl<F> ImageResolver for F
where
    F: Fn(&ImageRecord) -> Option<Vec<u8>>,
{
    fn resolve(&self, image: &ImageRecord) -> Option<Vec<u8>> {
        self(image)
    }
}

/// Resolver for exports without image bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoImages;

impl ImageResolver for NoImages {
    fn resolve(&self, _image: &ImageRecord) -> Option<Vec<u8>> {
        None
    }
}

/// Packages a batch of annotations into an export bundle.
///
/// Identical input always yields a byte-identical bundle.
///
/// # Errors
/// - [`SegsetError::MissingClassReference`] if an exported annotation's
///   class is not in the registry.
/// - [`SegsetError::MissingImageReference`] if an exported annotation's
///   image is not in `request.images`.
/// - [`SegsetError::ArchivePathConflict`] if two images map to the same
///   archive path.
/// - [`SegsetError::DuplicateId`] if two images or two annotations in the
///   request share an id.
pub fn export_dataset(
    request: &ExportRequest<'_>,
    format: ExportFormat,
    options: &ExportOptions,
    resolver: &dyn ImageResolver,
) -> Result<ExportBundle, SegsetError> {
    let mut image_lookup: BTreeMap<ImageId, &ImageRecord> = BTreeMap::new();
    for image in request.images {
        if image_lookup.insert(image.id, image).is_some() {
            return Err(SegsetError::DuplicateId {
                what: "image",
                id: image.id.as_u64(),
            });
        }
    }

    let mut manifest = DatasetManifest::new(format, options.include_images);
    manifest.classes = request
        .classes
        .iter()
        .map(|c| ManifestClass {
            index: c.class_index,
            name: c.name.clone(),
        })
        .collect();

    let selected = select_annotations(request, options, &image_lookup, &mut manifest)?;

    let content = match format {
        ExportFormat::Yolo => {
            let lines: Vec<YoloLabelLine> = selected
                .par_iter()
                .map(|record| YoloLabelLine::from_record(record))
                .collect();

            let mut by_image: BTreeMap<ImageId, Vec<YoloLabelLine>> = BTreeMap::new();
            for (record, line) in selected.iter().zip(lines) {
                by_image.entry(record.image_id).or_default().push(line);
            }
            Content::Yolo(by_image)
        }
        ExportFormat::Coco => {
            let entries = selected
                .par_iter()
                .map(|record| {
                    let image = image_lookup.get(&record.image_id).ok_or_else(|| {
                        SegsetError::MissingImageReference {
                            annotation_id: record.id.as_u64(),
                            image_id: record.image_id.as_u64(),
                        }
                    })?;
                    CocoAnnotation::from_record(record, image)
                })
                .collect::<Result<Vec<_>, _>>()?;
            Content::Coco(entries)
        }
    };

    let mut partitions: BTreeMap<Partition, Vec<&ImageRecord>> = BTreeMap::new();
    for image in request.images {
        partitions.entry(image.partition).or_default().push(image);
    }

    let mut files = FileSet::default();
    for (partition, mut images) in partitions {
        images.sort_by(|a, b| a.file_name.cmp(&b.file_name).then(a.id.cmp(&b.id)));
        let summary = package_partition(
            partition,
            &images,
            &content,
            request.classes,
            options,
            resolver,
            &mut files,
            &mut manifest,
        )?;
        manifest.total_images += summary.image_count;
        manifest.partitions.push(summary);
    }
    manifest.total_annotations = selected.len();

    match &content {
        Content::Yolo(_) => {
            files.insert(
                "classes.txt".to_string(),
                yolo::classes_txt(request.classes).into_bytes(),
            )?;
        }
        Content::Coco(entries) => {
            let dataset = coco::build_dataset(request.images, entries.clone(), request.classes);
            files.insert("annotations.json".to_string(), coco::to_json_vec(&dataset)?)?;
        }
    }
    files.insert("dataset_info.json".to_string(), manifest.to_json_vec()?)?;

    if manifest.skipped_annotations() > 0 {
        log::warn!(
            "skipped {} invalid and {} already-exported annotation(s)",
            manifest.skipped_invalid_annotations,
            manifest.skipped_exported_annotations
        );
    }

    let exported = selected.iter().map(|r| r.id).collect();
    let bundle = ExportBundle::new(files.into_inner(), manifest, exported);
    log::info!(
        "packaged {} annotation(s) from {} image(s) as {}: {} file(s), {} bytes",
        bundle.manifest().total_annotations,
        bundle.manifest().total_images,
        format,
        bundle.len(),
        bundle.total_bytes()
    );
    Ok(bundle)
}

/// Marks every record included in `bundle` as exported in its format.
///
/// Returns the number of records marked.
pub fn mark_exported(records: &mut [AnnotationRecord], bundle: &ExportBundle) -> usize {
    let ids = bundle.exported_annotation_ids();
    let mut marked = 0;
    for record in records.iter_mut() {
        if ids.binary_search(&record.id).is_ok() {
            record.mark_exported(bundle.format());
            marked += 1;
        }
    }
    marked
}

/// Formatted annotations, grouped for packaging.
enum Content {
    Yolo(BTreeMap<ImageId, Vec<YoloLabelLine>>),
    Coco(Vec<CocoAnnotation>),
}

/// Filters the batch down to exportable records in ascending id order and
/// checks their references.
fn select_annotations<'a>(
    request: &ExportRequest<'a>,
    options: &ExportOptions,
    image_lookup: &BTreeMap<ImageId, &ImageRecord>,
    manifest: &mut DatasetManifest,
) -> Result<Vec<&'a AnnotationRecord>, SegsetError> {
    let mut sorted: Vec<&AnnotationRecord> = request.annotations.iter().collect();
    sorted.sort_by_key(|r| r.id);
    if let Some(pair) = sorted.windows(2).find(|pair| pair[0].id == pair[1].id) {
        return Err(SegsetError::DuplicateId {
            what: "annotation",
            id: pair[0].id.as_u64(),
        });
    }

    let mut selected = Vec::with_capacity(sorted.len());
    for record in sorted {
        if !record.is_valid() {
            log::debug!("skipping invalid annotation {}", record.id);
            manifest.skipped_invalid_annotations += 1;
            continue;
        }
        if options.only_unexported && record.is_exported() {
            manifest.skipped_exported_annotations += 1;
            continue;
        }
        if !request.classes.contains(record.class_index) {
            return Err(SegsetError::MissingClassReference {
                annotation_id: record.id.as_u64(),
                class_index: record.class_index.as_u32(),
            });
        }
        if !image_lookup.contains_key(&record.image_id) {
            return Err(SegsetError::MissingImageReference {
                annotation_id: record.id.as_u64(),
                image_id: record.image_id.as_u64(),
            });
        }
        selected.push(record);
    }
    Ok(selected)
}

#[allow(clippy::too_many_arguments)]
fn package_partition(
    partition: Partition,
    images: &[&ImageRecord],
    content: &Content,
    classes: &ClassRegistry,
    options: &ExportOptions,
    resolver: &dyn ImageResolver,
    files: &mut FileSet,
    manifest: &mut DatasetManifest,
) -> Result<PartitionSummary, SegsetError> {
    let mut summary = PartitionSummary {
        partition,
        image_count: images.len(),
        annotation_count: 0,
        files: Vec::new(),
    };

    match content {
        Content::Yolo(by_image) => {
            for image in images {
                let lines = by_image.get(&image.id).map(Vec::as_slice).unwrap_or(&[]);
                summary.annotation_count += lines.len();

                let path = format!("labels/{}/{}.txt", partition, image.stem());
                files.insert(path.clone(), yolo::label_file(lines).into_bytes())?;
                summary.files.push(path);
            }
        }
        Content::Coco(entries) => {
            let ids: BTreeSet<u64> = images.iter().map(|img| img.id.as_u64()).collect();
            let subset: Vec<CocoAnnotation> = entries
                .iter()
                .filter(|ann| ids.contains(&ann.image_id))
                .cloned()
                .collect();
            summary.annotation_count = subset.len();

            let dataset = coco::build_dataset(images.iter().copied(), subset, classes);
            let path = format!("labels/{}/instances.json", partition);
            files.insert(path.clone(), coco::to_json_vec(&dataset)?)?;
            summary.files.push(path);
        }
    }

    if options.include_images {
        for image in images {
            let Some(bytes) = resolver.resolve(image) else {
                log::warn!("image {} ({}) not found, skipping", image.id, image.file_name);
                manifest.skipped_images += 1;
                continue;
            };
            let path = format!("images/{}/{}", partition, image.base_name());
            files.insert(path.clone(), bytes)?;
            summary.files.push(path);
        }
    }

    Ok(summary)
}
