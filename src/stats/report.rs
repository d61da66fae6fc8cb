//! Stats report types and terminal formatting.
//!
//! A [`ProjectStats`] renders as a boxed text report (Display) or
//! serializes as JSON for scripting.

use serde::Serialize;
use std::fmt;

use crate::annotation::ClassIndex;

const BAR_WIDTH: usize = 20;

/// Statistics for one annotation project.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProjectStats {
    pub images: ImageCounts,
    pub annotations: AnnotationCounts,
    pub geometry: GeometrySummary,
    /// One entry per registered class, in index order, plus unregistered
    /// indices that annotations still use.
    pub classes: Vec<ClassCount>,
}

/// Image totals by partition.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ImageCounts {
    pub total: usize,
    pub train: usize,
    pub val: usize,
    pub test: usize,
    /// Images with at least one annotation.
    pub annotated: usize,
}

impl ImageCounts {
    /// Share of images with annotations, in percent.
    pub fn completion_percentage(&self) -> f64 {
        percent(self.annotated, self.total)
    }
}

/// Annotation totals by lifecycle state.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AnnotationCounts {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub with_warnings: usize,
    pub simplified: usize,
    pub exported: usize,
    /// Valid and not yet exported.
    pub export_ready: usize,
    pub avg_per_image: f64,
}

/// Averages over annotation geometry, in normalized units.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GeometrySummary {
    pub avg_points: f64,
    pub max_points: usize,
    pub avg_area: f64,
    pub avg_compactness: f64,
}

/// Annotation count for one class.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassCount {
    pub class_index: ClassIndex,
    /// `None` when the index is missing from the registry.
    pub name: Option<String>,
    pub count: usize,
}

impl fmt::Display for ProjectStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = &self.images;
        let a = &self.annotations;
        let g = &self.geometry;

        writeln!(f, "┌─ Images ──────────────────────────────────────────┐")?;
        writeln!(f, "   Total:          {:>8}", format_number(i.total))?;
        writeln!(
            f,
            "   Train/Val/Test: {:>8} / {} / {}",
            format_number(i.train),
            format_number(i.val),
            format_number(i.test)
        )?;
        writeln!(
            f,
            "   Annotated:      {:>8} ({:.1}%)",
            format_number(i.annotated),
            i.completion_percentage()
        )?;
        writeln!(f)?;

        writeln!(f, "┌─ Annotations ─────────────────────────────────────┐")?;
        writeln!(f, "   Total:          {:>8}", format_number(a.total))?;
        writeln!(f, "   Valid:          {:>8}", format_number(a.valid))?;
        writeln!(f, "   Invalid:        {:>8}", format_number(a.invalid))?;
        writeln!(f, "   With warnings:  {:>8}", format_number(a.with_warnings))?;
        writeln!(f, "   Simplified:     {:>8}", format_number(a.simplified))?;
        writeln!(f, "   Exported:       {:>8}", format_number(a.exported))?;
        writeln!(f, "   Export ready:   {:>8}", format_number(a.export_ready))?;
        writeln!(f, "   Per image:      {:>8.2}", a.avg_per_image)?;
        writeln!(f)?;

        writeln!(f, "┌─ Geometry ────────────────────────────────────────┐")?;
        writeln!(f, "   Avg points:     {:>8.1}", g.avg_points)?;
        writeln!(f, "   Max points:     {:>8}", format_number(g.max_points))?;
        writeln!(f, "   Avg area:       {:>8.4}", g.avg_area)?;
        writeln!(f, "   Avg compactness:{:>8.3}", g.avg_compactness)?;
        writeln!(f)?;

        writeln!(f, "┌─ Classes ({}) ", self.classes.len())?;
        if self.classes.is_empty() {
            writeln!(f, "   No classes defined.")?;
        }
        let max_count = self.classes.iter().map(|c| c.count).max().unwrap_or(0);
        for class in &self.classes {
            let name = class.name.as_deref().unwrap_or("(unregistered)");
            writeln!(
                f,
                "   {:>3} {:<16} {:>7}  {}",
                class.class_index,
                truncate_label(name, 16),
                format_number(class.count),
                render_bar(class.count, max_count, BAR_WIDTH)
            )?;
        }

        Ok(())
    }
}

pub(super) fn percent(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }
    let filled = ((count * width) / max_count).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() <= max_len {
        label.to_string()
    } else {
        let kept: String = label.chars().take(max_len - 1).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(5, 10, 10), "█████░░░░░");
        assert_eq!(render_bar(0, 0, 10), "");
    }

    #[test]
    fn test_truncate_label_counts_chars() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("zellkörperchen", 6), "zellk…");
    }

    #[test]
    fn test_percent_of_zero() {
        assert_eq!(percent(3, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }
}
