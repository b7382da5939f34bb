//! Image resizer.
//!
//! Every image directly inside the input directory is decoded and written to
//! the output directory under the same file name. Images larger than the
//! limits are shrunk with the four-way rule in [`plan_resize`]; smaller ones
//! are copied byte-for-byte. The resizer knows nothing about annotations.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat, ImageReader};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::conversion::ResizeLimits;
use crate::error::Voc2CocoError;
use crate::walk;

/// What to do with one image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizePlan {
    /// Write the image unchanged.
    Keep,
    /// Resize to exactly `width` x `height`.
    Resize { width: u32, height: u32 },
}

impl ResizePlan {
    /// Dimensions of the written image.
    pub fn output_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        match *self {
            ResizePlan::Keep => (width, height),
            ResizePlan::Resize { width, height } => (width, height),
        }
    }
}

/// Decide how an image of `width` x `height` is written.
///
/// Both limits exceeded resizes to exactly the limits; one limit exceeded
/// clamps that axis and keeps the other. Aspect ratio is not preserved.
pub fn plan_resize(width: u32, height: u32, limits: &ResizeLimits) -> ResizePlan {
    let (max_width, max_height) = (limits.max_width, limits.max_height);

    if height > max_height && width > max_width {
        ResizePlan::Resize {
            width: max_width,
            height: max_height,
        }
    } else if height > max_height {
        ResizePlan::Resize {
            width,
            height: max_height,
        }
    } else if width > max_width {
        ResizePlan::Resize {
            width: max_width,
            height,
        }
    } else {
        ResizePlan::Keep
    }
}

/// One image written by the resizer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResizedImage {
    pub file_name: String,
    pub source: PathBuf,
    pub output: PathBuf,
    /// Dimensions of the decoded input.
    pub original: (u32, u32),
    /// Dimensions read back from the written file.
    pub written: (u32, u32),
    pub resized: bool,
}

/// Settings for [`resize_images`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ResizeOptions {
    pub limits: ResizeLimits,
    /// Skip files that fail instead of aborting the run.
    pub keep_going: bool,
}

/// Result of [`resize_images`].
#[derive(Debug, Default)]
pub struct ResizeOutcome {
    pub images: Vec<ResizedImage>,
    pub failures: Vec<(PathBuf, Voc2CocoError)>,
}

impl ResizeOutcome {
    pub fn resized_count(&self) -> usize {
        self.images.iter().filter(|image| image.resized).count()
    }

    pub fn copied_count(&self) -> usize {
        self.images.len() - self.resized_count()
    }
}

/// Resize every image directly inside `image_dir` into `output_dir`.
///
/// `output_dir` must already exist. Without `keep_going`, the first failing
/// file (in file name order) aborts with its error.
pub fn resize_images(
    image_dir: &Path,
    output_dir: &Path,
    options: ResizeOptions,
) -> Result<ResizeOutcome, Voc2CocoError> {
    let files = walk::list_files(image_dir, |_| true)?;
    info!(
        dir = %image_dir.display(),
        output = %output_dir.display(),
        files = files.len(),
        "resizing images"
    );

    let results: Vec<Result<ResizedImage, Voc2CocoError>> = files
        .par_iter()
        .map(|path| resize_image(path, output_dir, &options.limits))
        .collect();

    let mut outcome = ResizeOutcome::default();
    for (path, result) in files.into_iter().zip(results) {
        match result {
            Ok(image) => outcome.images.push(image),
            Err(err) if options.keep_going => {
                warn!(file = %path.display(), error = %err, "skipping image");
                outcome.failures.push((path, err));
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        resized = outcome.resized_count(),
        copied = outcome.copied_count(),
        skipped = outcome.failures.len(),
        "image resizing finished"
    );
    Ok(outcome)
}

/// Decode `source`, apply [`plan_resize`], and write it into `output_dir`.
pub fn resize_image(
    source: &Path,
    output_dir: &Path,
    limits: &ResizeLimits,
) -> Result<ResizedImage, Voc2CocoError> {
    let file_name = walk::file_name_string(source);
    let output = output_dir.join(&file_name);

    let io_err = |err| Voc2CocoError::IoAt {
        path: source.to_path_buf(),
        source: err,
    };
    // The content decides the format; the extension is only a fallback.
    let reader = ImageReader::open(source)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(io_err)?;
    let format = reader.format();
    let decoded = reader.decode().map_err(|err| Voc2CocoError::ImageDecode {
        path: source.to_path_buf(),
        source: err,
    })?;
    let (width, height) = decoded.dimensions();
    let plan = plan_resize(width, height, limits);

    match plan {
        ResizePlan::Keep => {
            fs::copy(source, &output).map_err(|err| Voc2CocoError::IoAt {
                path: output.clone(),
                source: err,
            })?;
        }
        ResizePlan::Resize {
            width: new_width,
            height: new_height,
        } => {
            let format = match format {
                Some(format) => format,
                None => ImageFormat::from_path(source).map_err(|err| {
                    Voc2CocoError::ImageEncode {
                        path: output.clone(),
                        source: err,
                    }
                })?,
            };
            decoded
                .resize_exact(new_width, new_height, FilterType::Triangle)
                .save_with_format(&output, format)
                .map_err(|err| Voc2CocoError::ImageEncode {
                    path: output.clone(),
                    source: err,
                })?;
        }
    }

    let written = read_image_dimensions(&output)?;
    debug!(
        file = %file_name,
        from = ?(width, height),
        to = ?written,
        "wrote image"
    );

    Ok(ResizedImage {
        file_name,
        source: source.to_path_buf(),
        output,
        original: (width, height),
        written,
        resized: plan != ResizePlan::Keep,
    })
}

fn read_image_dimensions(path: &Path) -> Result<(u32, u32), Voc2CocoError> {
    let size = imagesize::size(path).map_err(|source| Voc2CocoError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let width = u32::try_from(size.width).unwrap_or(u32::MAX);
    let height = u32::try_from(size.height).unwrap_or(u32::MAX);
    Ok((width, height))
}
