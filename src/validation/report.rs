//! Issues found by the consistency checks and their report.

use serde::Serialize;
use std::fmt;

/// All issues from one check, in the order they were found.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Record `code` at `context`; severity follows from the code.
    pub fn push(&mut self, code: IssueCode, context: IssueContext, message: impl Into<String>) {
        self.add(ValidationIssue::new(code, context, message));
    }

    /// Downgrade every issue carrying one of `codes` to a warning.
    pub fn demote(&mut self, codes: &[IssueCode]) {
        for issue in self
            .issues
            .iter_mut()
            .filter(|issue| codes.contains(&issue.code))
        {
            issue.severity = Severity::Warning;
        }
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// No errors; warnings are allowed.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// No issues of any kind.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return writeln!(f, "Consistency check passed: no issues found");
        }

        writeln!(
            f,
            "Consistency check found {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;

        // Errors first, each group in discovery order.
        for severity in [Severity::Error, Severity::Warning] {
            for issue in self.issues.iter().filter(|issue| issue.severity == severity) {
                writeln!(f, "  {issue}")?;
            }
        }
        Ok(())
    }
}

/// One problem, located in the document or among the written files.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub context: IssueContext,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(code: IssueCode, context: IssueContext, message: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            code,
            context,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} ({}): {}",
            self.severity, self.code, self.context, self.message
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error:  "),
            Severity::Warning => write!(f, "warning:"),
        }
    }
}

/// Stable identifier of an issue kind. Shown in text output and JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    DuplicateImageId,
    DuplicateAnnotationId,
    DuplicateCategoryId,
    MissingImageRef,
    MissingCategoryRef,
    InvalidImageDimensions,
    EmptyFileName,
    EmptyCategoryName,
    DuplicateCategoryName,
    /// min > max on some axis.
    InvalidBBoxOrdering,
    /// Zero width or height after rescaling.
    DegenerateBBox,
    BBoxOutOfBounds,
    /// An image record whose file the resizer did not write.
    MissingResizedImage,
    /// A written image that no image record points at.
    ImageWithoutRecord,
    /// Record and written file disagree on width or height.
    DimensionMismatch,
}

impl IssueCode {
    /// Errors make a document unusable; warnings flag suspicious but valid output.
    pub fn severity(self) -> Severity {
        match self {
            IssueCode::EmptyFileName
            | IssueCode::EmptyCategoryName
            | IssueCode::DuplicateCategoryName
            | IssueCode::DegenerateBBox
            | IssueCode::MissingResizedImage
            | IssueCode::ImageWithoutRecord => Severity::Warning,
            IssueCode::DuplicateImageId
            | IssueCode::DuplicateAnnotationId
            | IssueCode::DuplicateCategoryId
            | IssueCode::MissingImageRef
            | IssueCode::MissingCategoryRef
            | IssueCode::InvalidImageDimensions
            | IssueCode::InvalidBBoxOrdering
            | IssueCode::BBoxOutOfBounds
            | IssueCode::DimensionMismatch => Severity::Error,
        }
    }
}

/// The record or file an issue is about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueContext {
    Image { id: u64 },
    Annotation { id: u64 },
    Category { id: u64 },
    File { name: String },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Image { id } => write!(f, "image {id}"),
            IssueContext::Annotation { id } => write!(f, "annotation {id}"),
            IssueContext::Category { id } => write!(f, "category {id}"),
            IssueContext::File { name } => write!(f, "file {name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_passes() {
        let report = ValidationReport::new();
        assert!(report.is_ok());
        assert!(report.is_clean());
        assert!(report.to_string().contains("passed"));
    }

    #[test]
    fn severity_follows_code() {
        let mut report = ValidationReport::new();
        report.push(
            IssueCode::DegenerateBBox,
            IssueContext::Annotation { id: 1 },
            "zero width",
        );
        report.push(
            IssueCode::MissingImageRef,
            IssueContext::Annotation { id: 0 },
            "image 3 does not exist",
        );

        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(!report.is_ok());
        assert!(report.has(IssueCode::DegenerateBBox));
    }

    #[test]
    fn demote_turns_selected_errors_into_warnings() {
        let mut report = ValidationReport::new();
        report.push(
            IssueCode::BBoxOutOfBounds,
            IssueContext::Annotation { id: 0 },
            "box leaves the image",
        );
        report.push(
            IssueCode::MissingImageRef,
            IssueContext::Annotation { id: 1 },
            "image 7 does not exist",
        );

        report.demote(&[IssueCode::BBoxOutOfBounds, IssueCode::InvalidBBoxOrdering]);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(report.has(IssueCode::BBoxOutOfBounds));
    }

    #[test]
    fn text_lists_errors_before_warnings() {
        let mut report = ValidationReport::new();
        report.push(
            IssueCode::ImageWithoutRecord,
            IssueContext::File { name: "b.jpg".into() },
            "no record",
        );
        report.push(
            IssueCode::DimensionMismatch,
            IssueContext::Image { id: 4 },
            "800x450 vs 800x449",
        );

        let text = report.to_string();
        let error_at = text.find("DimensionMismatch (image 4)").unwrap();
        let warning_at = text.find("ImageWithoutRecord (file b.jpg)").unwrap();
        assert!(error_at < warning_at);
    }

    #[test]
    fn serializes_context_with_kind_tag() {
        let issue = ValidationIssue::new(
            IssueCode::ImageWithoutRecord,
            IssueContext::File { name: "a.jpg".into() },
            "no record",
        );
        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains(r#""severity":"warning""#));
        assert!(json.contains(r#""context":{"kind":"file","name":"a.jpg"}"#));
    }
}
