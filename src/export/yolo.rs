//! YOLO segmentation label lines.
//!
//! One line per polygon: `<class_index> x1 y1 x2 y2 ... xn yn`, with
//! normalized coordinates printed to six decimal places.

use std::fmt;

use crate::annotation::{AnnotationRecord, ClassIndex, ClassRegistry};

/// A single YOLO segmentation label line.
#[derive(Clone, Debug, PartialEq)]
pub struct YoloLabelLine {
    pub class_index: ClassIndex,
    pub coords: Vec<(f64, f64)>,
}

impl YoloLabelLine {
    /// Builds the line for a record's normalized polygon.
    pub fn from_record(record: &AnnotationRecord) -> Self {
        Self {
            class_index: record.class_index,
            coords: record
                .normalized()
                .points()
                .iter()
                .map(|p| (p.x, p.y))
                .collect(),
        }
    }
}

impl fmt::Display for YoloLabelLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_index)?;
        // Adding 0.0 turns -0.0 into 0.0 so it never prints with a sign.
        for (x, y) in &self.coords {
            write!(f, " {:.6} {:.6}", x + 0.0, y + 0.0)?;
        }
        Ok(())
    }
}

/// Renders a label file: one newline-terminated line per polygon.
///
/// An image without polygons gets an empty file.
pub fn label_file(lines: &[YoloLabelLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}

/// Renders `classes.txt`: class names in ascending index order, joined by
/// newlines without a trailing newline.
pub fn classes_txt(classes: &ClassRegistry) -> String {
    classes
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
