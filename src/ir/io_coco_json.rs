//! COCO-like JSON writer and reader for the output document.
//!
//! The written document has exactly three top-level arrays, in this order:
//!
//! ```json
//! {"categories": [{"id": 0, "name": "car", "supercategory": "none"}],
//!  "images": [{"id": 0, "width": 800, "height": 450, "file_name": "a.jpg"}],
//!  "annotations": [{"id": 0, "image_id": 0, "category_id": 0, "bbox": [0, 0, 800, 450]}]}
//! ```
//!
//! `bbox` is `[x, y, width, height]` with `(x, y)` the top-left corner. All
//! numbers are integers; reading a document with fractional values fails
//! rather than silently truncating.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::model::{Annotation, Category, Dataset, Image};
use super::{BBoxXYXY, CategoryId, Resized};
use crate::error::Voc2CocoError;

/// File name of the consolidated annotation document.
pub const COCO_JSON_FILE_NAME: &str = "data.json";

// ============================================================================
// COCO Schema Types (internal to this module)
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct CocoDataset {
    categories: Vec<CocoCategory>,
    images: Vec<CocoImage>,
    annotations: Vec<CocoAnnotation>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CocoCategory {
    id: u64,
    name: String,
    supercategory: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CocoImage {
    id: u64,
    width: u32,
    height: u32,
    file_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CocoAnnotation {
    id: u64,
    image_id: u64,
    category_id: u64,

    /// `[x, y, width, height]` with (x, y) as the top-left corner
    bbox: [i64; 4],
}

// ============================================================================
// Public API
// ============================================================================

/// Reads a dataset from a COCO JSON file.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use voc2coco::ir::io_coco_json::read_coco_json;
///
/// let dataset = read_coco_json(Path::new("out/data.json"))?;
/// # Ok::<(), voc2coco::Voc2CocoError>(())
/// ```
pub fn read_coco_json(path: &Path) -> Result<Dataset, Voc2CocoError> {
    let file = File::open(path).map_err(|source| Voc2CocoError::IoAt {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let parse_err = |source| Voc2CocoError::CocoJsonParse {
        path: path.to_path_buf(),
        source,
    };
    let coco: CocoDataset = serde_json::from_reader(reader).map_err(parse_err)?;

    Dataset::try_from(coco)
        .map_err(|message| parse_err(<serde_json::Error as serde::de::Error>::custom(message)))
}

/// Writes `dataset` to `path`, replacing any existing file.
///
/// The document is written to a temporary file next to `path` and renamed
/// into place, so a failed run never leaves a truncated `data.json` behind.
pub fn write_coco_json(path: &Path, dataset: &Dataset, pretty: bool) -> Result<(), Voc2CocoError> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let io_err = |source: std::io::Error| Voc2CocoError::IoAt {
        path: path.to_path_buf(),
        source,
    };

    let coco = CocoDataset::try_from(dataset).map_err(|message| Voc2CocoError::CocoJsonWrite {
        path: path.to_path_buf(),
        source: <serde_json::Error as serde::ser::Error>::custom(message),
    })?;
    let mut temp = NamedTempFile::new_in(parent).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        let written = if pretty {
            serde_json::to_writer_pretty(&mut writer, &coco)
        } else {
            serde_json::to_writer(&mut writer, &coco)
        };
        written.map_err(|source| Voc2CocoError::CocoJsonWrite {
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(io_err)?;
    }

    temp.persist(path).map_err(|err| io_err(err.error))?;
    Ok(())
}

/// Reads a dataset from a COCO JSON string.
pub fn from_coco_str(json: &str) -> Result<Dataset, serde_json::Error> {
    let coco: CocoDataset = serde_json::from_str(json)?;
    Dataset::try_from(coco).map_err(<serde_json::Error as serde::de::Error>::custom)
}

/// Writes a dataset to a compact COCO JSON string.
pub fn to_coco_string(dataset: &Dataset) -> Result<String, serde_json::Error> {
    let coco =
        CocoDataset::try_from(dataset).map_err(<serde_json::Error as serde::ser::Error>::custom)?;
    serde_json::to_string(&coco)
}

// Each record maps one-to-one; order is kept as built, since ids were
// assigned in traversal order. Only boxes can fail: their corner and extent
// forms must both fit in an i64.

impl From<&Category> for CocoCategory {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.as_u64(),
            name: category.name.clone(),
            supercategory: category.supercategory.clone(),
        }
    }
}

impl From<CocoCategory> for Category {
    fn from(raw: CocoCategory) -> Self {
        Self {
            id: CategoryId(raw.id),
            name: raw.name,
            supercategory: raw.supercategory,
        }
    }
}

impl From<&Image> for CocoImage {
    fn from(image: &Image) -> Self {
        Self {
            id: image.id.as_u64(),
            width: image.width,
            height: image.height,
            file_name: image.file_name.clone(),
        }
    }
}

impl From<CocoImage> for Image {
    fn from(raw: CocoImage) -> Self {
        Image::new(raw.id, raw.file_name, raw.width, raw.height)
    }
}

impl TryFrom<&Annotation> for CocoAnnotation {
    type Error = String;

    fn try_from(annotation: &Annotation) -> Result<Self, Self::Error> {
        let bbox = annotation.bbox.to_xywh().ok_or_else(|| {
            format!(
                "annotation {}: extent of {:?} overflows",
                annotation.id, annotation.bbox
            )
        })?;
        Ok(Self {
            id: annotation.id.as_u64(),
            image_id: annotation.image_id.as_u64(),
            category_id: annotation.category_id.as_u64(),
            bbox,
        })
    }
}

impl TryFrom<CocoAnnotation> for Annotation {
    type Error = String;

    fn try_from(raw: CocoAnnotation) -> Result<Self, Self::Error> {
        let bbox = BBoxXYXY::<Resized>::from_xywh(raw.bbox).ok_or_else(|| {
            format!("annotation {}: bbox {:?} overflows", raw.id, raw.bbox)
        })?;
        Ok(Annotation::new(raw.id, raw.image_id, raw.category_id, bbox))
    }
}

impl TryFrom<&Dataset> for CocoDataset {
    type Error = String;

    fn try_from(dataset: &Dataset) -> Result<Self, Self::Error> {
        Ok(Self {
            categories: dataset.categories.iter().map(Into::into).collect(),
            images: dataset.images.iter().map(Into::into).collect(),
            annotations: dataset
                .annotations
                .iter()
                .map(CocoAnnotation::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl TryFrom<CocoDataset> for Dataset {
    type Error = String;

    fn try_from(raw: CocoDataset) -> Result<Self, Self::Error> {
        Ok(Self {
            categories: raw.categories.into_iter().map(Into::into).collect(),
            images: raw.images.into_iter().map(Into::into).collect(),
            annotations: raw
                .annotations
                .into_iter()
                .map(Annotation::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}
