//! The in-memory export archive and its manifest.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::annotation::{AnnotationId, ClassIndex, ExportFormat, Partition};
use crate::error::SegsetError;

/// Relative archive paths mapped to file contents.
///
/// Paths are unique and iterate in sorted order, so writing the bundle out
/// entry by entry is deterministic.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportBundle {
    files: BTreeMap<String, Vec<u8>>,
    manifest: DatasetManifest,
    exported: Vec<AnnotationId>,
}

impl ExportBundle {
    pub(super) fn new(
        files: BTreeMap<String, Vec<u8>>,
        manifest: DatasetManifest,
        mut exported: Vec<AnnotationId>,
    ) -> Self {
        exported.sort();
        Self {
            files,
            manifest,
            exported,
        }
    }

    pub fn files(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.files
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of all file sizes in bytes.
    pub fn total_bytes(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn manifest(&self) -> &DatasetManifest {
        &self.manifest
    }

    pub fn format(&self) -> ExportFormat {
        self.manifest.format
    }

    /// IDs of the annotations written into this bundle, ascending.
    pub fn exported_annotation_ids(&self) -> &[AnnotationId] {
        &self.exported
    }

    pub fn into_files(self) -> BTreeMap<String, Vec<u8>> {
        self.files
    }
}

/// Contents of `dataset_info.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub tool: String,
    pub version: String,
    pub format: ExportFormat,
    pub include_images: bool,
    pub classes: Vec<ManifestClass>,
    /// Non-empty partitions in train, val, test order.
    pub partitions: Vec<PartitionSummary>,
    pub total_images: usize,
    pub total_annotations: usize,
    /// Annotations left out because they failed validation.
    pub skipped_invalid_annotations: usize,
    /// Annotations left out because they were already exported.
    pub skipped_exported_annotations: usize,
    /// Images whose bytes the resolver could not provide.
    pub skipped_images: usize,
}

impl DatasetManifest {
    pub(super) fn new(format: ExportFormat, include_images: bool) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            format,
            include_images,
            classes: Vec::new(),
            partitions: Vec::new(),
            total_images: 0,
            total_annotations: 0,
            skipped_invalid_annotations: 0,
            skipped_exported_annotations: 0,
            skipped_images: 0,
        }
    }

    /// All annotations left out of the export.
    pub fn skipped_annotations(&self) -> usize {
        self.skipped_invalid_annotations + self.skipped_exported_annotations
    }

    pub fn partition(&self, partition: Partition) -> Option<&PartitionSummary> {
        self.partitions.iter().find(|p| p.partition == partition)
    }

    pub(super) fn to_json_vec(&self) -> Result<Vec<u8>, SegsetError> {
        serde_json::to_vec_pretty(self).map_err(|source| SegsetError::ManifestSerialize {
            what: "dataset manifest",
            source,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManifestClass {
    pub index: ClassIndex,
    pub name: String,
}

/// Per-partition counts and archive paths.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartitionSummary {
    pub partition: Partition,
    pub image_count: usize,
    pub annotation_count: usize,
    pub files: Vec<String>,
}

/// Collects files, refusing to overwrite a path.
#[derive(Debug, Default)]
pub(super) struct FileSet {
    files: BTreeMap<String, Vec<u8>>,
}

impl FileSet {
    pub(super) fn insert(&mut self, path: String, bytes: Vec<u8>) -> Result<(), SegsetError> {
        match self.files.entry(path) {
            Entry::Occupied(entry) => Err(SegsetError::ArchivePathConflict {
                path: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(bytes);
                Ok(())
            }
        }
    }

    pub(super) fn into_inner(self) -> BTreeMap<String, Vec<u8>> {
        self.files
    }
}
