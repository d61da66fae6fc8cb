//! Validation report types for structured error reporting.
//!
//! A [`ValidationReport`] keeps every issue with a stable [`IssueCode`];
//! [`ValidationResult`] is the flattened `{is_valid, errors, warnings}` form
//! stored on annotation records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The result of validating one or more polygons.
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    /// All issues found during validation.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Moves every issue of `other` into this report under `context`.
    pub fn extend_with_context(&mut self, other: ValidationReport, context: IssueContext) {
        self.issues.extend(other.issues.into_iter().map(|mut issue| {
            issue.context = context;
            issue
        }));
    }

    /// Returns the number of errors in the report.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Returns the number of warnings in the report.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns true if there are no issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if any issue carries `code`.
    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    /// Flattens the report into the stored `{is_valid, errors, warnings}` form.
    pub fn to_result(&self) -> ValidationResult {
        let messages = |severity: Severity| {
            self.issues
                .iter()
                .filter(|i| i.severity == severity)
                .map(|i| i.message.clone())
                .collect()
        };
        ValidationResult {
            is_valid: self.is_ok(),
            errors: messages(Severity::Error),
            warnings: messages(Severity::Warning),
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "Validation passed: no issues found");
        }

        writeln!(
            f,
            "Validation completed with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// Flattened validation outcome stored on an annotation record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// A single validation issue (error or warning).
#[derive(Clone, Debug)]
pub struct ValidationIssue {
    /// The severity of the issue.
    pub severity: Severity,

    /// A stable code for the issue type.
    pub code: IssueCode,

    /// Human-readable text, starting with [`IssueCode::phrase`].
    pub message: String,

    /// Where the issue occurred.
    pub context: IssueContext,
}

impl ValidationIssue {
    /// Creates an issue whose message is the code's phrase plus `detail`.
    pub fn new(severity: Severity, code: IssueCode, detail: impl fmt::Display) -> Self {
        Self {
            severity,
            code,
            message: format!("{}: {}", code.phrase(), detail),
            context: IssueContext::Polygon,
        }
    }

    /// Creates a new error.
    pub fn error(code: IssueCode, detail: impl fmt::Display) -> Self {
        Self::new(Severity::Error, code, detail)
    }

    /// Creates a new warning.
    pub fn warning(code: IssueCode, detail: impl fmt::Display) -> Self {
        Self::new(Severity::Warning, code, detail)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

/// The severity of a validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Informational; the polygon can still be exported.
    Warning,
    /// The polygon is unusable and is skipped on export.
    Error,
}

/// A stable code identifying the type of validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IssueCode {
    /// Fewer points than the configured minimum.
    InsufficientPoints,
    /// A coordinate is non-finite, or outside [0, 1] for normalized polygons.
    CoordinateOutOfRange,
    /// The enclosed area is at or below the configured threshold.
    DegeneratePolygon,
    /// Two non-adjacent edges intersect.
    SelfIntersecting,
    /// More points than the configured maximum.
    TooManyPoints,
    /// Point count is close to the configured maximum.
    NearPointLimit,
    /// The same vertex appears twice in a row.
    DuplicatePoints,
}

impl IssueCode {
    /// The fixed phrase every message for this code starts with.
    pub fn phrase(&self) -> &'static str {
        match self {
            IssueCode::InsufficientPoints => "insufficient points",
            IssueCode::CoordinateOutOfRange => "coordinate out of range",
            IssueCode::DegeneratePolygon => "degenerate polygon",
            IssueCode::SelfIntersecting => "self-intersecting polygon",
            IssueCode::TooManyPoints => "too many points",
            IssueCode::NearPointLimit => "near point-count limit",
            IssueCode::DuplicatePoints => "duplicate consecutive points",
        }
    }
}

/// Where a validation issue occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueContext {
    /// A standalone polygon.
    Polygon,
    /// The polygon of a specific annotation record.
    Annotation { id: u64 },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Polygon => write!(f, "polygon"),
            IssueContext::Annotation { id } => write!(f, "annotation {}", id),
        }
    }
}
