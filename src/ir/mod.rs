//! Data model shared by the parser, the converter and the writer.
//!
//! VOC XML is read into [`io_voc_xml::VocAnnotation`] values whose boxes live
//! in the [`Source`] space. The converter rescales them into the [`Resized`]
//! space and collects them into a [`Dataset`], which [`io_coco_json`] writes
//! as the COCO-like `data.json` document.
//!
//! # Example
//!
//! ```
//! use voc2coco::ir::{Annotation, BBoxXYXY, Category, Dataset, Image, Resized};
//!
//! let dataset = Dataset {
//!     categories: vec![Category::new(0u64, "car")],
//!     images: vec![Image::new(0u64, "a.jpg", 800, 450)],
//!     annotations: vec![Annotation::new(
//!         0u64, 0u64, 0u64,
//!         BBoxXYXY::<Resized>::from_xyxy(0, 0, 800, 450),
//!     )],
//! };
//! assert_eq!(dataset.annotations[0].bbox.to_xywh(), Some([0, 0, 800, 450]));
//! ```

mod bbox;
mod coord;
mod ids;
pub mod io_coco_json;
pub mod io_voc_xml;
mod model;
mod space;

pub use bbox::BBoxXYXY;
pub use coord::Coord;
pub use ids::{AnnotationId, CategoryId, IdSequence, ImageId};
pub use model::{Annotation, Category, Dataset, Image, DEFAULT_SUPERCATEGORY};
pub use space::{Resized, Source};
