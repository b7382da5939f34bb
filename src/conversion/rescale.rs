//! Bounding-box rescaling onto the resized image grid.
//!
//! Each axis is handled on its own: an axis longer than its limit is scaled
//! down to exactly the limit, any other axis is left untouched. Aspect ratio
//! is not preserved when both axes are scaled by different factors.

use crate::ir::{BBoxXYXY, Resized, Source};

pub const DEFAULT_MAX_WIDTH: u32 = 800;
pub const DEFAULT_MAX_HEIGHT: u32 = 450;

/// Largest width and height an output image may have.
///
/// The image resizer and the annotation rescaler must use the same limits,
/// otherwise boxes stop lining up with the written images.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeLimits {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ResizeLimits {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

impl ResizeLimits {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    /// Output dimensions for an image of `width` x `height`.
    pub fn fit(&self, width: u32, height: u32) -> (u32, u32) {
        (width.min(self.max_width), height.min(self.max_height))
    }

    /// Rescale a box drawn on a `width` x `height` image onto the resized image.
    ///
    /// The resized image has the dimensions given by [`ResizeLimits::fit`].
    pub fn rescale(&self, width: u32, height: u32, bbox: BBoxXYXY<Source>) -> BBoxXYXY<Resized> {
        let (mut xmin, mut xmax) = (bbox.xmin(), bbox.xmax());
        let (mut ymin, mut ymax) = (bbox.ymin(), bbox.ymax());

        if width > self.max_width {
            xmin = scale_axis(xmin, self.max_width, width);
            xmax = scale_axis(xmax, self.max_width, width);
        }

        if height > self.max_height {
            ymin = scale_axis(ymin, self.max_height, height);
            ymax = scale_axis(ymax, self.max_height, height);
        }

        BBoxXYXY::from_xyxy(xmin, ymin, xmax, ymax)
    }
}

/// `round(value * limit / extent)`, ties to even.
///
/// `extent` is always greater than `limit` here, so it is never zero.
fn scale_axis(value: i64, limit: u32, extent: u32) -> i64 {
    ((value as f64 * f64::from(limit)) / f64::from(extent)).round_ties_even() as i64
}
