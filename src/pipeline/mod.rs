//! End-to-end run: resize images, convert annotations, write `data.json`,
//! then cross-check the two outputs.

mod report;

pub use report::{ImageCounts, RunReport, SkippedFile, Stage};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::conversion::{self, ConversionOptions, ObjectPolicy, ResizeLimits};
use crate::error::Voc2CocoError;
use crate::ir::io_coco_json::{write_coco_json, COCO_JSON_FILE_NAME};
use crate::resize::{self, ResizeOptions};
use crate::validation;

/// Settings for one run, independent of the CLI.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub image_dir: PathBuf,
    pub xml_dir: PathBuf,
    pub output_dir: PathBuf,
    pub limits: ResizeLimits,
    pub object_policy: ObjectPolicy,
    pub keep_going: bool,
    pub pretty: bool,
}

impl PipelineConfig {
    /// A config with default limits and policy.
    pub fn new(
        image_dir: impl Into<PathBuf>,
        xml_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            image_dir: image_dir.into(),
            xml_dir: xml_dir.into(),
            output_dir: output_dir.into(),
            limits: ResizeLimits::default(),
            object_policy: ObjectPolicy::default(),
            keep_going: false,
            pretty: false,
        }
    }
}

/// Run both pipelines and write `<output_dir>/data.json`.
///
/// Fails fast on the first bad file unless `keep_going` is set. With
/// `keep_going`, outputs are still written for the good files and the run
/// ends with [`Voc2CocoError::BatchIncomplete`] if anything was skipped.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunReport, Voc2CocoError> {
    let image_out = image_output_dir(&config.image_dir, &config.output_dir)?;
    create_dir(&config.output_dir)?;
    create_dir(&image_out)?;
    if same_dir(&config.image_dir, &image_out) {
        return Err(Voc2CocoError::DirectoryWalk {
            path: image_out,
            message: "resized images would overwrite the input images".to_string(),
        });
    }

    let resized = resize::resize_images(
        &config.image_dir,
        &image_out,
        ResizeOptions {
            limits: config.limits,
            keep_going: config.keep_going,
        },
    )?;

    let converted = conversion::convert_annotations(
        &config.xml_dir,
        ConversionOptions {
            limits: config.limits,
            object_policy: config.object_policy,
            keep_going: config.keep_going,
        },
    )?;

    let annotations_file = config.output_dir.join(COCO_JSON_FILE_NAME);
    write_coco_json(&annotations_file, &converted.dataset, config.pretty)?;
    info!(path = %annotations_file.display(), "wrote annotations");

    let mut consistency = validation::validate_dataset(&converted.dataset);
    consistency.demote(validation::INPUT_BOX_ISSUES);
    consistency.merge(validation::validate_outputs(
        &converted.dataset,
        &resized.images,
    ));

    let images = ImageCounts {
        resized: resized.resized_count(),
        copied: resized.copied_count(),
    };

    let skipped = resized
        .failures
        .into_iter()
        .map(|failure| (Stage::Image, failure))
        .chain(
            converted
                .failures
                .into_iter()
                .map(|failure| (Stage::Annotation, failure)),
        )
        .map(|(stage, (path, err))| SkippedFile {
            path,
            stage,
            reason: err.to_string(),
        })
        .collect();

    let report = RunReport {
        annotations_file,
        image_dir: image_out,
        images,
        annotations: converted.stats,
        skipped,
        consistency,
    };

    if !report.is_complete() {
        return Err(Voc2CocoError::BatchIncomplete {
            skipped: report.skipped.len(),
            report: Box::new(report),
        });
    }

    Ok(report)
}

/// `<output_dir>/<last component of image_dir>`.
pub fn image_output_dir(image_dir: &Path, output_dir: &Path) -> Result<PathBuf, Voc2CocoError> {
    let name = match image_dir.file_name() {
        Some(name) => name.to_os_string(),
        None => image_dir
            .canonicalize()
            .map_err(|source| Voc2CocoError::IoAt {
                path: image_dir.to_path_buf(),
                source,
            })?
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| Voc2CocoError::DirectoryWalk {
                path: image_dir.to_path_buf(),
                message: "cannot derive an output directory name".to_string(),
            })?,
    };
    Ok(output_dir.join(name))
}

// Pre-existing directories are fine.
fn create_dir(path: &Path) -> Result<(), Voc2CocoError> {
    fs::create_dir_all(path).map_err(|source| Voc2CocoError::IoAt {
        path: path.to_path_buf(),
        source,
    })
}

fn same_dir(left: &Path, right: &Path) -> bool {
    match (left.canonicalize(), right.canonicalize()) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}
