#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Uncompressed 24-bit BMP with all pixels black.
pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

/// Encode a flat grey image; the format follows the file extension.
pub fn write_image(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    image::RgbImage::from_pixel(width, height, image::Rgb([128, 128, 128]))
        .save(path)
        .expect("write image file");
}

/// A VOC annotation document with one `<object>` per entry.
pub fn voc_xml(filename: &str, width: u32, height: u32, objects: &[(&str, [i64; 4])]) -> String {
    let mut xml = format!(
        "<annotation>\n  <folder>images</folder>\n  <filename>{filename}</filename>\n  \
         <size>\n    <width>{width}</width>\n    <height>{height}</height>\n    \
         <depth>3</depth>\n  </size>\n"
    );
    for (name, [xmin, ymin, xmax, ymax]) in objects {
        xml.push_str(&format!(
            "  <object>\n    <name>{name}</name>\n    <bndbox>\n      \
             <xmin>{xmin}</xmin>\n      <ymin>{ymin}</ymin>\n      \
             <xmax>{xmax}</xmax>\n      <ymax>{ymax}</ymax>\n    </bndbox>\n  </object>\n"
        ));
    }
    xml.push_str("</annotation>\n");
    xml
}

/// Input and output directories for one end-to-end run.
pub struct Workspace {
    pub root: TempDir,
    pub images: PathBuf,
    pub xml: PathBuf,
    pub output: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let images = root.path().join("images");
        let xml = root.path().join("xml");
        let output = root.path().join("out");
        fs::create_dir_all(&images).expect("create image dir");
        fs::create_dir_all(&xml).expect("create xml dir");
        Self {
            root,
            images,
            xml,
            output,
        }
    }

    /// Write an image and its annotation file, both named after `stem`.
    pub fn add_sample(
        &self,
        stem: &str,
        extension: &str,
        (width, height): (u32, u32),
        objects: &[(&str, [i64; 4])],
    ) {
        let file_name = format!("{stem}.{extension}");
        let image = self.images.join(&file_name);
        if extension == "bmp" {
            write_bmp(&image, width, height);
        } else {
            write_image(&image, width, height);
        }
        self.add_xml(
            &format!("{stem}.xml"),
            &voc_xml(&file_name, width, height, objects),
        );
    }

    pub fn add_xml(&self, name: &str, xml: &str) {
        fs::write(self.xml.join(name), xml).expect("write xml file");
    }

    pub fn data_json(&self) -> PathBuf {
        self.output.join("data.json")
    }

    pub fn resized_images(&self) -> PathBuf {
        self.output.join("images")
    }

    pub fn read_data_json(&self) -> serde_json::Value {
        let text = fs::read_to_string(self.data_json()).expect("read data.json");
        serde_json::from_str(&text).expect("parse data.json")
    }
}
