//! Pascal VOC XML reader.
//!
//! Each annotation file describes one image:
//!
//! ```xml
//! <annotation>
//!   <filename>a.jpg</filename>
//!   <size><width>1600</width><height>900</height></size>
//!   <object>
//!     <name>car</name>
//!     <bndbox><xmin>0</xmin><ymin>0</ymin><xmax>1600</xmax><ymax>900</ymax></bndbox>
//!   </object>
//! </annotation>
//! ```
//!
//! Only direct children of `<annotation>` are read. Every `<object>` is
//! returned in document order; deciding which of them become annotations is
//! left to the converter.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use super::{BBoxXYXY, Source};
use crate::error::Voc2CocoError;
use crate::walk;

pub const VOC_XML_EXTENSION: &str = "xml";

const MEMORY_PATH: &str = "<memory>";

/// The fields extracted from one VOC annotation file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocAnnotation {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub objects: Vec<VocObject>,
}

/// One `<object>` element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocObject {
    pub name: String,
    pub bbox: BBoxXYXY<Source>,
}

/// List the `.xml` files directly inside `dir`, sorted by file name.
pub fn collect_xml_files(dir: &Path) -> Result<Vec<PathBuf>, Voc2CocoError> {
    walk::list_files(dir, |path| walk::has_extension(path, VOC_XML_EXTENSION))
}

/// Read and parse one VOC annotation file.
pub fn read_voc_xml(path: &Path) -> Result<VocAnnotation, Voc2CocoError> {
    let xml = fs::read_to_string(path).map_err(|source| Voc2CocoError::IoAt {
        path: path.to_path_buf(),
        source,
    })?;
    parse_voc_xml_str(&xml, path)
}

/// Parse VOC XML from a UTF-8 string, attributing errors to `<memory>`.
///
/// This helper is primarily useful for tests and benches.
pub fn from_voc_xml_str(xml: &str) -> Result<VocAnnotation, Voc2CocoError> {
    parse_voc_xml_str(xml, Path::new(MEMORY_PATH))
}

/// Parse VOC XML from a UTF-8 string, attributing errors to `path`.
pub fn parse_voc_xml_str(xml: &str, path: &Path) -> Result<VocAnnotation, Voc2CocoError> {
    let document = roxmltree::Document::parse(xml).map_err(|source| Voc2CocoError::XmlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;

    let annotation = document.root_element();
    if annotation.tag_name().name() != "annotation" {
        return Err(Voc2CocoError::XmlParse {
            path: path.to_path_buf(),
            message: format!(
                "root element is <{}>, expected <annotation>",
                annotation.tag_name().name()
            ),
        });
    }

    let filename = required_child_text(annotation, "filename", path, "filename")?;

    let size = required_child_element(annotation, "size", path, "size")?;
    let width = parse_required::<u32>(size, "width", path, "size/width")?;
    let height = parse_required::<u32>(size, "height", path, "size/height")?;

    let mut objects = Vec::new();
    for object in annotation
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
    {
        let name = required_child_text(object, "name", path, "object/name")?;
        let bndbox = required_child_element(object, "bndbox", path, "object/bndbox")?;

        // Corners are read as i32 so that widths and rescaled values never
        // overflow the i64 arithmetic downstream.
        let xmin = parse_required::<i32>(bndbox, "xmin", path, "object/bndbox/xmin")?;
        let ymin = parse_required::<i32>(bndbox, "ymin", path, "object/bndbox/ymin")?;
        let xmax = parse_required::<i32>(bndbox, "xmax", path, "object/bndbox/xmax")?;
        let ymax = parse_required::<i32>(bndbox, "ymax", path, "object/bndbox/ymax")?;

        objects.push(VocObject {
            name,
            bbox: BBoxXYXY::from_xyxy(xmin.into(), ymin.into(), xmax.into(), ymax.into()),
        });
    }

    if objects.is_empty() {
        return Err(Voc2CocoError::malformed(
            path,
            "object",
            "is missing; at least one <object> is required",
        ));
    }

    Ok(VocAnnotation {
        filename,
        width,
        height,
        objects,
    })
}

fn required_child_element<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    path: &Path,
    field: &str,
) -> Result<Node<'a, 'input>, Voc2CocoError> {
    child_element(node, tag).ok_or_else(|| Voc2CocoError::malformed(path, field, "is missing"))
}

fn required_child_text(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    field: &str,
) -> Result<String, Voc2CocoError> {
    optional_child_text(node, tag)
        .ok_or_else(|| Voc2CocoError::malformed(path, field, "is missing or empty"))
}

fn parse_required<T: std::str::FromStr>(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    field: &str,
) -> Result<T, Voc2CocoError> {
    let raw = required_child_text(node, tag, path, field)?;
    raw.parse::<T>().map_err(|_| {
        Voc2CocoError::malformed(
            path,
            field,
            format!("has value '{raw}'; expected {}", std::any::type_name::<T>()),
        )
    })
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<annotation>
  <folder>images</folder>
  <filename>img1.jpg</filename>
  <size>
    <width>1600</width>
    <height>900</height>
    <depth>3</depth>
  </size>
  <object>
    <name>cat</name>
    <pose>Unspecified</pose>
    <bndbox>
      <xmin>10</xmin>
      <ymin>20</ymin>
      <xmax>30</xmax>
      <ymax>40</ymax>
    </bndbox>
  </object>
</annotation>"#;

    fn field_of(err: Voc2CocoError) -> String {
        match err {
            Voc2CocoError::MalformedAnnotation { field, .. } => field,
            other => panic!("expected MalformedAnnotation, got {other:?}"),
        }
    }

    #[test]
    fn parse_extracts_size_and_bbox() {
        let parsed = parse_voc_xml_str(SINGLE, Path::new("sample.xml")).expect("parse xml");
        assert_eq!(parsed.filename, "img1.jpg");
        assert_eq!(parsed.width, 1600);
        assert_eq!(parsed.height, 900);
        assert_eq!(parsed.objects.len(), 1);
        assert_eq!(parsed.objects[0].name, "cat");
        assert_eq!(parsed.objects[0].bbox, BBoxXYXY::from_xyxy(10, 20, 30, 40));
    }

    #[test]
    fn parse_keeps_every_object_in_document_order() {
        let xml = r#"<annotation>
  <filename>two.jpg</filename>
  <size><width>100</width><height>50</height></size>
  <object><name>cat</name><bndbox><xmin>1</xmin><ymin>2</ymin><xmax>3</xmax><ymax>4</ymax></bndbox></object>
  <object><name>dog</name><bndbox><xmin>5</xmin><ymin>6</ymin><xmax>7</xmax><ymax>8</ymax></bndbox></object>
</annotation>"#;
        let parsed = from_voc_xml_str(xml).expect("parse xml");
        let names: Vec<&str> = parsed.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["cat", "dog"]);
    }

    #[test]
    fn missing_width_names_the_field_and_file() {
        let xml = SINGLE.replace("<width>1600</width>", "");
        let err = parse_voc_xml_str(&xml, Path::new("broken.xml")).unwrap_err();
        assert_eq!(err.file_path(), Some(Path::new("broken.xml")));
        assert_eq!(field_of(err), "size/width");
    }

    #[test]
    fn missing_bndbox_coordinate_is_malformed() {
        let xml = SINGLE.replace("<ymax>40</ymax>", "");
        let err = from_voc_xml_str(&xml).unwrap_err();
        assert_eq!(field_of(err), "object/bndbox/ymax");
    }

    #[test]
    fn non_integer_coordinate_is_malformed() {
        let xml = SINGLE.replace("<xmin>10</xmin>", "<xmin>10.5</xmin>");
        let err = from_voc_xml_str(&xml).unwrap_err();
        assert_eq!(field_of(err), "object/bndbox/xmin");
    }

    #[test]
    fn out_of_range_coordinate_is_malformed() {
        let xml = SINGLE.replace("<xmin>10</xmin>", "<xmin>-9223372036854775808</xmin>");
        let err = from_voc_xml_str(&xml).unwrap_err();
        assert_eq!(field_of(err), "object/bndbox/xmin");

        let xml = SINGLE.replace("<ymax>40</ymax>", "<ymax>2147483648</ymax>");
        let err = from_voc_xml_str(&xml).unwrap_err();
        assert_eq!(field_of(err), "object/bndbox/ymax");
    }

    #[test]
    fn largest_i32_coordinate_is_accepted() {
        let xml = SINGLE.replace("<xmax>30</xmax>", "<xmax>2147483647</xmax>");
        let parsed = from_voc_xml_str(&xml).expect("parse xml");
        assert_eq!(parsed.objects[0].bbox.xmax(), i64::from(i32::MAX));
    }

    #[test]
    fn empty_filename_is_malformed() {
        let xml = SINGLE.replace("<filename>img1.jpg</filename>", "<filename>  </filename>");
        let err = from_voc_xml_str(&xml).unwrap_err();
        assert_eq!(field_of(err), "filename");
    }

    #[test]
    fn document_without_object_is_malformed() {
        let xml = r#"<annotation>
  <filename>empty.jpg</filename>
  <size><width>64</width><height>64</height></size>
</annotation>"#;
        let err = from_voc_xml_str(xml).unwrap_err();
        assert_eq!(field_of(err), "object");
    }

    #[test]
    fn wrong_root_element_is_a_parse_error() {
        let err = from_voc_xml_str("<dataset/>").unwrap_err();
        assert!(matches!(err, Voc2CocoError::XmlParse { .. }));
    }

    #[test]
    fn invalid_xml_is_a_parse_error() {
        let err = from_voc_xml_str("<annotation><filename>").unwrap_err();
        assert!(matches!(err, Voc2CocoError::XmlParse { .. }));
    }
}
