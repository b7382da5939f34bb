#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use voc2coco::conversion::ResizeLimits;
use voc2coco::ir::io_voc_xml::{VocAnnotation, VocObject};
use voc2coco::ir::{BBoxXYXY, Source};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Limits small enough that both branches of the per-axis clamp get hit.
pub fn arb_limits() -> impl Strategy<Value = ResizeLimits> {
    (1u32..=1200, 1u32..=900).prop_map(|(w, h)| ResizeLimits::new(w, h))
}

pub fn arb_dimensions() -> impl Strategy<Value = (u32, u32)> {
    (1u32..=4000, 1u32..=4000)
}

/// An image size together with a box that lies inside it.
pub fn arb_image_with_box() -> impl Strategy<Value = ((u32, u32), BBoxXYXY<Source>)> {
    arb_dimensions().prop_flat_map(|(w, h)| {
        let (w64, h64) = (i64::from(w), i64::from(h));
        (0..=w64, 0..=w64, 0..=h64, 0..=h64).prop_map(move |(x1, x2, y1, y2)| {
            (
                (w, h),
                BBoxXYXY::from_xyxy(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2)),
            )
        })
    })
}

pub fn arb_category() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["car", "bus", "person", "dog", "cat", "bicycle"])
        .prop_map(str::to_string)
}

/// A parsed annotation file with 1..=max_objects objects.
pub fn arb_voc_annotation(max_objects: usize) -> impl Strategy<Value = VocAnnotation> {
    arb_image_with_box().prop_flat_map(move |((width, height), _)| {
        let (w64, h64) = (i64::from(width), i64::from(height));
        let object = (arb_category(), 0..=w64, 0..=w64, 0..=h64, 0..=h64).prop_map(
            |(name, x1, x2, y1, y2)| VocObject {
                name,
                bbox: BBoxXYXY::from_xyxy(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2)),
            },
        );
        prop::collection::vec(object, 1..=max_objects).prop_map(move |objects| VocAnnotation {
            filename: String::from("img.jpg"),
            width,
            height,
            objects,
        })
    })
}
