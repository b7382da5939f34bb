//! Summary of one pipeline run.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::conversion::ConversionStats;
use crate::validation::ValidationReport;

/// Everything a run did, printed by the CLI as text or JSON.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunReport {
    /// Path of the written `data.json`.
    pub annotations_file: PathBuf,
    /// Directory the resized images were written to.
    pub image_dir: PathBuf,
    pub images: ImageCounts,
    pub annotations: ConversionStats,
    /// Files skipped under `--keep-going`.
    pub skipped: Vec<SkippedFile>,
    pub consistency: ValidationReport,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImageCounts {
    pub resized: usize,
    pub copied: usize,
}

/// A file left out of the output, and why.
#[derive(Clone, Debug, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub stage: Stage,
    pub reason: String,
}

/// Which pipeline a skipped file belonged to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Image,
    Annotation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Image => write!(f, "image"),
            Stage::Annotation => write!(f, "annotation"),
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Images: {} resized, {} copied -> {}",
            self.images.resized,
            self.images.copied,
            self.image_dir.display()
        )?;
        writeln!(
            f,
            "Annotations: {} images, {} categories, {} annotations -> {}",
            self.annotations.images,
            self.annotations.categories,
            self.annotations.annotations,
            self.annotations_file.display()
        )?;

        if self.annotations.dropped_objects > 0 {
            writeln!(
                f,
                "  {} extra <object> element(s) dropped (only the last object per file is kept)",
                self.annotations.dropped_objects
            )?;
        }
        if self.annotations.degenerate_boxes > 0 {
            writeln!(
                f,
                "  {} box(es) have zero width or height after rescaling",
                self.annotations.degenerate_boxes
            )?;
        }

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped ({}):", self.skipped.len())?;
            for skipped in &self.skipped {
                writeln!(
                    f,
                    "  - [{}] {}: {}",
                    skipped.stage,
                    skipped.path.display(),
                    skipped.reason
                )?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.consistency)
    }
}
