//! VOC XML to COCO conversion.
//!
//! Files are parsed in parallel, then folded one by one, in file name
//! order, into a [`ConversionState`] that owns the category registry and the
//! id counters. Ids therefore do not depend on how the parsing was scheduled.

pub mod registry;
pub mod rescale;

pub use registry::CategoryRegistry;
pub use rescale::{ResizeLimits, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH};

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Voc2CocoError;
use crate::ir::io_voc_xml::{collect_xml_files, read_voc_xml, VocAnnotation, VocObject};
use crate::ir::{Annotation, AnnotationId, Dataset, IdSequence, Image, ImageId};

/// Which `<object>` elements of one XML file become annotations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ObjectPolicy {
    /// Keep only the last object of each file.
    #[default]
    Last,
    /// Reject files with more than one object.
    Single,
    /// Emit one annotation per object.
    All,
}

impl ObjectPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectPolicy::Last => "last",
            ObjectPolicy::Single => "single",
            ObjectPolicy::All => "all",
        }
    }

    /// Apply the policy to the objects of one file, in document order.
    pub fn select(
        &self,
        path: &Path,
        mut objects: Vec<VocObject>,
    ) -> Result<Vec<VocObject>, Voc2CocoError> {
        match self {
            ObjectPolicy::All => Ok(objects),
            ObjectPolicy::Single if objects.len() > 1 => Err(Voc2CocoError::MultipleObjects {
                path: path.to_path_buf(),
                count: objects.len(),
            }),
            ObjectPolicy::Single => Ok(objects),
            ObjectPolicy::Last => {
                let keep = objects.split_off(objects.len().saturating_sub(1));
                if !objects.is_empty() {
                    warn!(
                        file = %path.display(),
                        dropped = objects.len(),
                        "multiple <object> elements; keeping only the last"
                    );
                }
                Ok(keep)
            }
        }
    }
}

/// Settings for [`convert_annotations`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ConversionOptions {
    pub limits: ResizeLimits,
    pub object_policy: ObjectPolicy,
    /// Skip files that fail instead of aborting the run.
    pub keep_going: bool,
}

/// Counters describing one conversion run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub files: usize,
    pub images: usize,
    pub categories: usize,
    pub annotations: usize,
    /// Objects discarded by the `last` policy.
    pub dropped_objects: usize,
    /// Annotations whose rescaled box has zero width or height.
    pub degenerate_boxes: usize,
}

/// Per-run accumulator: the only mutable state of a conversion.
#[derive(Debug)]
pub struct ConversionState {
    options: ConversionOptions,
    registry: CategoryRegistry,
    image_ids: IdSequence<ImageId>,
    annotation_ids: IdSequence<AnnotationId>,
    images: Vec<Image>,
    annotations: Vec<Annotation>,
    stats: ConversionStats,
}

impl ConversionState {
    pub fn new(options: ConversionOptions) -> Self {
        Self {
            options,
            registry: CategoryRegistry::new(),
            image_ids: IdSequence::new(),
            annotation_ids: IdSequence::new(),
            images: Vec::new(),
            annotations: Vec::new(),
            stats: ConversionStats::default(),
        }
    }

    /// Fold one parsed file into the dataset.
    ///
    /// On error nothing is recorded, so a skipped file leaves no partial
    /// image or annotation behind.
    pub fn add(&mut self, path: &Path, parsed: VocAnnotation) -> Result<ImageId, Voc2CocoError> {
        let total_objects = parsed.objects.len();
        let objects = self.options.object_policy.select(path, parsed.objects)?;

        let limits = self.options.limits;
        let (width, height) = limits.fit(parsed.width, parsed.height);
        let image_id = self.image_ids.next_id();

        for object in objects.iter() {
            let category_id = self.registry.register(&object.name);
            let bbox = limits.rescale(parsed.width, parsed.height, object.bbox);
            if bbox.is_degenerate() {
                debug!(
                    file = %path.display(),
                    bbox = ?bbox,
                    "rescaled box has zero extent"
                );
                self.stats.degenerate_boxes += 1;
            }

            self.annotations.push(Annotation::new(
                self.annotation_ids.next_id(),
                image_id,
                category_id,
                bbox,
            ));
        }

        self.images
            .push(Image::new(image_id, parsed.filename, width, height));

        self.stats.files += 1;
        self.stats.dropped_objects += total_objects - objects.len();
        Ok(image_id)
    }

    /// Consume the state, returning the finished dataset.
    pub fn finish(self) -> (Dataset, ConversionStats) {
        let mut stats = self.stats;
        stats.images = self.images.len();
        stats.annotations = self.annotations.len();
        stats.categories = self.registry.len();

        let dataset = Dataset {
            categories: self.registry.into_categories(),
            images: self.images,
            annotations: self.annotations,
        };
        (dataset, stats)
    }
}

/// Result of [`convert_annotations`].
#[derive(Debug)]
pub struct ConversionOutcome {
    pub dataset: Dataset,
    pub stats: ConversionStats,
    /// Files skipped under `keep_going`, with the reason.
    pub failures: Vec<(PathBuf, Voc2CocoError)>,
}

/// Convert every `.xml` file directly inside `xml_dir`.
///
/// Without `keep_going`, the first failing file (in file name order) aborts
/// the conversion with its error.
pub fn convert_annotations(
    xml_dir: &Path,
    options: ConversionOptions,
) -> Result<ConversionOutcome, Voc2CocoError> {
    let files = collect_xml_files(xml_dir)?;
    info!(
        dir = %xml_dir.display(),
        files = files.len(),
        objects = options.object_policy.name(),
        "converting annotations"
    );

    let parsed: Vec<Result<VocAnnotation, Voc2CocoError>> =
        files.par_iter().map(|path| read_voc_xml(path)).collect();

    let mut state = ConversionState::new(options);
    let mut failures = Vec::new();

    for (path, result) in files.into_iter().zip(parsed) {
        match result.and_then(|annotation| state.add(&path, annotation)) {
            Ok(image_id) => debug!(file = %path.display(), %image_id, "converted"),
            Err(err) if options.keep_going => {
                warn!(file = %path.display(), error = %err, "skipping annotation file");
                failures.push((path, err));
            }
            Err(err) => return Err(err),
        }
    }

    let (dataset, stats) = state.finish();
    info!(
        images = stats.images,
        categories = stats.categories,
        annotations = stats.annotations,
        "annotation conversion finished"
    );

    Ok(ConversionOutcome {
        dataset,
        stats,
        failures,
    })
}
