//! JSON reading and writing for project documents.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::{Project, RawProject};
use crate::error::SegsetError;

/// Reads a processed project.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_project(path: &Path) -> Result<Project, SegsetError> {
    read_json(path)
}

/// Reads a project of raw pixel polygons.
pub fn read_raw_project(path: &Path) -> Result<RawProject, SegsetError> {
    read_json(path)
}

/// Writes a processed project as pretty-printed JSON.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_project(path: &Path, project: &Project) -> Result<(), SegsetError> {
    write_json(path, project)
}

/// Parses a processed project from a string.
pub fn from_json_str(json: &str) -> Result<Project, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serializes a processed project to a pretty-printed string.
pub fn to_json_string(project: &Project) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(project)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SegsetError> {
    let file = File::open(path).map_err(SegsetError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| SegsetError::ProjectJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SegsetError> {
    let file = File::create(path).map_err(SegsetError::Io)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| {
        SegsetError::ProjectJsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.write_all(b"\n").map_err(SegsetError::Io)?;
    writer.flush().map_err(SegsetError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotationRecord, ClassDefinition, ClassRegistry, ImageRecord};
    use crate::config::PipelineConfig;
    use crate::geometry::Polygon;

    fn sample_project() -> Project {
        let image = ImageRecord::new(1u64, "image001.jpg", 640, 480);
        let record = AnnotationRecord::from_pixel_polygon(
            1u64,
            &image,
            0u32,
            Polygon::from_pairs([(10.0, 20.0), (100.0, 20.0), (100.0, 200.0)]),
            &PipelineConfig::default(),
        )
        .expect("build record");

        Project {
            name: Some("Test Project".into()),
            classes: ClassRegistry::from_classes([ClassDefinition::new(0u32, "person", "#FFAA00")
                .with_display_name("Person")])
            .expect("registry"),
            images: vec![image],
            annotations: vec![record],
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let original = sample_project();
        let json = to_json_string(&original).expect("serialization failed");
        let restored = from_json_str(&json).expect("deserialization failed");

        assert_eq!(restored.name, original.name);
        assert_eq!(restored.classes, original.classes);
        assert_eq!(restored.images, original.images);
        let (a, b) = (&original.annotations[0], &restored.annotations[0]);
        assert_eq!(a.id, b.id);
        assert_eq!(a.point_count(), b.point_count());
        assert_eq!(a.validation(), b.validation());
        assert!(json.contains("\"display_name\": \"Person\""));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("project.json");

        write_project(&path, &sample_project()).expect("write");
        let restored = read_project(&path).expect("read");
        assert_eq!(restored.annotations[0].point_count(), 3);
        assert_eq!(restored.classes.get(0u32.into()).map(|c| c.label()), Some("Person"));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write");

        let err = read_project(&path).unwrap_err();
        assert!(matches!(err, SegsetError::ProjectJsonParse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_overflowing_polygon_survives_file_roundtrip() {
        let image = ImageRecord::new(2u64, "tiny.png", 1, 1);
        let record = AnnotationRecord::from_pixel_polygon(
            2u64,
            &image,
            0u32,
            Polygon::from_pairs([(1e308, 1e308), (-1e308, 1e308), (0.0, -1e308)]),
            &PipelineConfig::default(),
        )
        .expect("build record");
        assert!(!record.is_valid());
        assert!(record.metrics().is_finite());

        let mut project = sample_project();
        project.images.push(image);
        project.annotations.push(record);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("huge.json");
        write_project(&path, &project).expect("write");
        let restored = read_project(&path).expect("read back");
        assert_eq!(restored.annotations.len(), 2);
        assert!(!restored.annotations[1].is_valid());
    }
}
