//! Consistency checks for the output document and the written images.
//!
//! [`validate_dataset`] looks at the document alone: unique ids, resolvable
//! references, boxes inside their image. [`validate_outputs`] compares the
//! document with what the resizer actually wrote. The two pipelines never
//! talk to each other, so this is where they can be seen to disagree.

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::ir::{Annotation, Dataset, ImageId};
use crate::resize::ResizedImage;

/// Check one document on its own.
pub fn validate_dataset(dataset: &Dataset) -> ValidationReport {
    let mut report = ValidationReport::new();

    check_unique(
        dataset.images.iter().map(|image| image.id),
        IssueCode::DuplicateImageId,
        |id| IssueContext::Image { id: id.as_u64() },
        &mut report,
    );
    check_unique(
        dataset.categories.iter().map(|category| category.id),
        IssueCode::DuplicateCategoryId,
        |id| IssueContext::Category { id: id.as_u64() },
        &mut report,
    );
    check_unique(
        dataset.annotations.iter().map(|annotation| annotation.id),
        IssueCode::DuplicateAnnotationId,
        |id| IssueContext::Annotation { id: id.as_u64() },
        &mut report,
    );

    for image in &dataset.images {
        let context = IssueContext::Image {
            id: image.id.as_u64(),
        };
        if image.width == 0 || image.height == 0 {
            report.push(
                IssueCode::InvalidImageDimensions,
                context.clone(),
                format!("size {}x{} has a zero side", image.width, image.height),
            );
        }
        if image.file_name.is_empty() {
            report.push(IssueCode::EmptyFileName, context, "file_name is empty");
        }
    }

    let mut names = HashMap::new();
    for category in &dataset.categories {
        let context = IssueContext::Category {
            id: category.id.as_u64(),
        };
        if category.name.is_empty() {
            report.push(IssueCode::EmptyCategoryName, context, "name is empty");
        } else if let Some(first) = names.insert(category.name.as_str(), category.id) {
            report.push(
                IssueCode::DuplicateCategoryName,
                context,
                format!("name '{}' is also used by category {first}", category.name),
            );
        }
    }

    let image_sizes: HashMap<ImageId, (u32, u32)> = dataset
        .images
        .iter()
        .map(|image| (image.id, (image.width, image.height)))
        .collect();
    let category_ids: HashSet<_> = dataset.categories.iter().map(|c| c.id).collect();

    for annotation in &dataset.annotations {
        let context = IssueContext::Annotation {
            id: annotation.id.as_u64(),
        };
        if !category_ids.contains(&annotation.category_id) {
            report.push(
                IssueCode::MissingCategoryRef,
                context.clone(),
                format!("category {} does not exist", annotation.category_id),
            );
        }
        match image_sizes.get(&annotation.image_id) {
            None => report.push(
                IssueCode::MissingImageRef,
                context.clone(),
                format!("image {} does not exist", annotation.image_id),
            ),
            Some(&size) => check_bounds(annotation, size, &context, &mut report),
        }
        check_shape(annotation, context, &mut report);
    }

    report
}

/// Issues about boxes as the input files drew them. The converter writes
/// those boxes unchanged; after a conversion these codes are warnings.
pub const INPUT_BOX_ISSUES: &[IssueCode] =
    &[IssueCode::BBoxOutOfBounds, IssueCode::InvalidBBoxOrdering];

/// Compare image records with the files the resizer wrote, by file name.
pub fn validate_outputs(dataset: &Dataset, written: &[ResizedImage]) -> ValidationReport {
    let mut report = ValidationReport::new();

    let written_by_name: HashMap<&str, &ResizedImage> = written
        .iter()
        .map(|file| (file.file_name.as_str(), file))
        .collect();

    for image in &dataset.images {
        let context = IssueContext::Image {
            id: image.id.as_u64(),
        };
        let Some(file) = written_by_name.get(image.file_name.as_str()) else {
            report.push(
                IssueCode::MissingResizedImage,
                context,
                format!("no resized image was written for '{}'", image.file_name),
            );
            continue;
        };
        if file.written != (image.width, image.height) {
            report.push(
                IssueCode::DimensionMismatch,
                context,
                format!(
                    "record says {}x{} but '{}' was written as {}x{} (source {}x{})",
                    image.width,
                    image.height,
                    image.file_name,
                    file.written.0,
                    file.written.1,
                    file.original.0,
                    file.original.1
                ),
            );
        }
    }

    let recorded: HashSet<&str> = dataset
        .images
        .iter()
        .map(|image| image.file_name.as_str())
        .collect();
    for file in written
        .iter()
        .filter(|file| !recorded.contains(file.file_name.as_str()))
    {
        report.push(
            IssueCode::ImageWithoutRecord,
            IssueContext::File {
                name: file.file_name.clone(),
            },
            "no image record refers to this file",
        );
    }

    report
}

/// Report every repeat of an id after its first occurrence.
fn check_unique<Id, F>(
    ids: impl Iterator<Item = Id>,
    code: IssueCode,
    context: F,
    report: &mut ValidationReport,
) where
    Id: Copy + Eq + Hash + std::fmt::Display,
    F: Fn(Id) -> IssueContext,
{
    let mut first_index: HashMap<Id, usize> = HashMap::new();
    for (index, id) in ids.enumerate() {
        if let Some(first) = first_index.get(&id) {
            report.push(
                code,
                context(id),
                format!("id {id} at index {index} repeats index {first}"),
            );
        } else {
            first_index.insert(id, index);
        }
    }
}

fn check_shape(annotation: &Annotation, context: IssueContext, report: &mut ValidationReport) {
    let bbox = &annotation.bbox;
    if !bbox.is_ordered() {
        report.push(
            IssueCode::InvalidBBoxOrdering,
            context,
            format!(
                "corners ({}, {}) and ({}, {}) are reversed",
                bbox.xmin(),
                bbox.ymin(),
                bbox.xmax(),
                bbox.ymax()
            ),
        );
    } else if bbox.is_degenerate() {
        report.push(
            IssueCode::DegenerateBBox,
            context,
            format!("box {bbox:?} has zero area"),
        );
    }
}

fn check_bounds(
    annotation: &Annotation,
    (width, height): (u32, u32),
    context: &IssueContext,
    report: &mut ValidationReport,
) {
    let bbox = &annotation.bbox;
    let inside = bbox.xmin() >= 0
        && bbox.ymin() >= 0
        && bbox.xmax() <= i64::from(width)
        && bbox.ymax() <= i64::from(height);
    if !inside {
        report.push(
            IssueCode::BBoxOutOfBounds,
            context.clone(),
            format!("box {bbox:?} leaves the {width}x{height} image"),
        );
    }
}
