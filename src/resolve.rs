//! Resolving image bytes from a directory on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::annotation::ImageRecord;
use crate::error::SegsetError;
use crate::export::ImageResolver;

/// Finds images under a root directory by relative path or by base name.
///
/// A base name only resolves when it is unique under the root.
#[derive(Clone, Debug)]
pub struct DirectoryResolver {
    root: PathBuf,
    by_relative: BTreeMap<String, PathBuf>,
    by_name: BTreeMap<String, Vec<PathBuf>>,
}

impl DirectoryResolver {
    /// Indexes every file below `root`.
    pub fn scan(root: &Path) -> Result<Self, SegsetError> {
        let mut by_relative = BTreeMap::new();
        let mut by_name: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|source| SegsetError::Io(io::Error::from(source)))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path().to_path_buf();
            if let Some(rel) = rel_string(root, &path) {
                by_relative.insert(rel, path.clone());
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                by_name.entry(name.to_string()).or_default().push(path);
            }
        }

        log::debug!("indexed {} file(s) under {}", by_relative.len(), root.display());
        Ok(Self {
            root: root.to_path_buf(),
            by_relative,
            by_name,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file an image record maps to, if any.
    pub fn locate(&self, image: &ImageRecord) -> Option<&Path> {
        let rel = image.file_name.replace('\\', "/");
        if let Some(path) = self.by_relative.get(rel.trim_start_matches("./")) {
            return Some(path.as_path());
        }
        match self.by_name.get(image.base_name()).map(Vec::as_slice) {
            Some([only]) => Some(only.as_path()),
            _ => None,
        }
    }
}

impl ImageResolver for DirectoryResolver {
    fn resolve(&self, image: &ImageRecord) -> Option<Vec<u8>> {
        let path = self.locate(image)?;
        match fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                log::warn!("failed to read {}: {}", path.display(), err);
                None
            }
        }
    }
}

fn rel_string(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}
