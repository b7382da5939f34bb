use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::RunReport;
use crate::validation::ValidationReport;

/// The main error type for voc2coco operations.
#[derive(Debug, Error)]
pub enum Voc2CocoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error at {path}: {source}")]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse VOC XML from {path}: {message}")]
    XmlParse { path: PathBuf, message: String },

    #[error("Malformed annotation {path}: field '{field}' {message}")]
    MalformedAnnotation {
        path: PathBuf,
        field: String,
        message: String,
    },

    #[error("Annotation {path} contains {count} <object> elements; expected exactly one")]
    MultipleObjects { path: PathBuf, count: usize },

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image {path}: {source}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read dimensions of written image {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Failed to parse COCO JSON from {path}: {source}")]
    CocoJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write COCO JSON to {path}: {source}")]
    CocoJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to list {path}: {message}")]
    DirectoryWalk { path: PathBuf, message: String },

    #[error("Run finished with {skipped} skipped file(s)")]
    BatchIncomplete {
        skipped: usize,
        report: Box<RunReport>,
    },

    #[error("Check failed with {error_count} error(s) and {warning_count} warning(s)")]
    CheckFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },
}

impl Voc2CocoError {
    /// Build a [`Voc2CocoError::MalformedAnnotation`] for `path`.
    pub(crate) fn malformed(
        path: impl Into<PathBuf>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Voc2CocoError::MalformedAnnotation {
            path: path.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Path of the input file this error is about, if it names one.
    pub fn file_path(&self) -> Option<&std::path::Path> {
        match self {
            Voc2CocoError::IoAt { path, .. }
            | Voc2CocoError::XmlParse { path, .. }
            | Voc2CocoError::MalformedAnnotation { path, .. }
            | Voc2CocoError::MultipleObjects { path, .. }
            | Voc2CocoError::ImageDecode { path, .. }
            | Voc2CocoError::ImageEncode { path, .. }
            | Voc2CocoError::ImageDimensionRead { path, .. }
            | Voc2CocoError::CocoJsonParse { path, .. }
            | Voc2CocoError::CocoJsonWrite { path, .. }
            | Voc2CocoError::DirectoryWalk { path, .. } => Some(path),
            Voc2CocoError::Io(_)
            | Voc2CocoError::BatchIncomplete { .. }
            | Voc2CocoError::CheckFailed { .. } => None,
        }
    }
}
