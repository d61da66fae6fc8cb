//! Writing export bundles to ZIP archives.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::SegsetError;
use crate::export::ExportBundle;

/// Writes every bundle entry into a deflated ZIP at `path`.
///
/// Entries are written in path order with a fixed timestamp, so identical
/// bundles produce identical archives.
pub fn write_zip(path: &Path, bundle: &ExportBundle) -> Result<(), SegsetError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(SegsetError::Io)?;
    }

    let file = File::create(path).map_err(SegsetError::Io)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let archive_err = |source| SegsetError::ArchiveWrite {
        path: path.to_path_buf(),
        source,
    };

    for (name, bytes) in bundle.files() {
        zip.start_file(name.as_str(), options).map_err(archive_err)?;
        zip.write_all(bytes).map_err(SegsetError::Io)?;
    }

    let mut writer = zip.finish().map_err(archive_err)?;
    writer.flush().map_err(SegsetError::Io)?;

    log::info!(
        "wrote {} ({} entries, {} bytes uncompressed)",
        path.display(),
        bundle.len(),
        bundle.total_bytes()
    );
    Ok(())
}
