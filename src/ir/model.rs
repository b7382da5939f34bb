//! The in-memory output document: categories, images and annotations.
//!
//! A [`Dataset`] is built once per run by the converter and handed to the
//! COCO writer in one piece. Every bounding box in it is already in the
//! [`Resized`] space.

use super::bbox::BBoxXYXY;
use super::ids::{AnnotationId, CategoryId, ImageId};
use super::space::Resized;

/// Supercategory written for every category.
pub const DEFAULT_SUPERCATEGORY: &str = "none";

/// The complete conversion result.
///
/// Field order matches the key order of the written document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    /// Categories in first-seen order.
    pub categories: Vec<Category>,

    /// One image record per converted annotation file, in traversal order.
    pub images: Vec<Image>,

    /// Annotations in traversal order.
    pub annotations: Vec<Annotation>,
}

/// An image record. `width` and `height` are the resized dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
    pub file_name: String,
}

impl Image {
    /// Creates a new image record.
    pub fn new(
        id: impl Into<ImageId>,
        file_name: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            file_name: file_name.into(),
        }
    }
}

/// A category (class label), identified by its name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub supercategory: String,
}

impl Category {
    /// Creates a category with the default `"none"` supercategory.
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            supercategory: DEFAULT_SUPERCATEGORY.to_string(),
        }
    }
}

/// A single labelled bounding box on one image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub id: AnnotationId,
    pub image_id: ImageId,
    pub category_id: CategoryId,

    /// Bounding box on the resized image.
    pub bbox: BBoxXYXY<Resized>,
}

impl Annotation {
    /// Creates a new annotation.
    pub fn new(
        id: impl Into<AnnotationId>,
        image_id: impl Into<ImageId>,
        category_id: impl Into<CategoryId>,
        bbox: BBoxXYXY<Resized>,
    ) -> Self {
        Self {
            id: id.into(),
            image_id: image_id.into(),
            category_id: category_id.into(),
            bbox,
        }
    }
}
