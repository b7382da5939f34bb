//! Bounding boxes in VOC corner (XYXY) form.

use super::coord::Coord;

/// An axis-aligned bounding box in XYXY format (xmin, ymin, xmax, ymax).
///
/// The box does not enforce `min <= max`: reversed or zero-area boxes are
/// carried through and reported by validation instead of rejected here.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BBoxXYXY<TSpace> {
    pub min: Coord<TSpace>,
    pub max: Coord<TSpace>,
}

impl<TSpace> BBoxXYXY<TSpace> {
    /// Creates a new bounding box from min and max coordinates.
    #[inline]
    pub fn new(min: Coord<TSpace>, max: Coord<TSpace>) -> Self {
        Self { min, max }
    }

    /// Creates a new bounding box from explicit corners.
    #[inline]
    pub fn from_xyxy(xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> Self {
        Self {
            min: Coord::new(xmin, ymin),
            max: Coord::new(xmax, ymax),
        }
    }

    /// Creates a box from COCO `[x, y, width, height]`.
    ///
    /// Returns `None` if a far corner does not fit in an `i64`.
    #[inline]
    pub fn from_xywh([x, y, w, h]: [i64; 4]) -> Option<Self> {
        Some(Self::from_xyxy(x, y, x.checked_add(w)?, y.checked_add(h)?))
    }

    #[inline]
    pub fn xmin(&self) -> i64 {
        self.min.x
    }

    #[inline]
    pub fn ymin(&self) -> i64 {
        self.min.y
    }

    #[inline]
    pub fn xmax(&self) -> i64 {
        self.max.x
    }

    #[inline]
    pub fn ymax(&self) -> i64 {
        self.max.y
    }

    /// Width of the box; negative if the box is reversed. Saturates.
    #[inline]
    pub fn width(&self) -> i64 {
        self.max.x.saturating_sub(self.min.x)
    }

    /// Height of the box; negative if the box is reversed. Saturates.
    #[inline]
    pub fn height(&self) -> i64 {
        self.max.y.saturating_sub(self.min.y)
    }

    #[inline]
    pub fn area(&self) -> i64 {
        self.width().saturating_mul(self.height())
    }

    /// Returns true if min <= max on both axes.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Returns true if the box has zero extent on at least one axis.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Converts to COCO `[x, y, width, height]`.
    ///
    /// Returns `None` if the extent on either axis does not fit in an `i64`.
    #[inline]
    pub fn to_xywh(&self) -> Option<[i64; 4]> {
        Some([
            self.min.x,
            self.min.y,
            self.max.x.checked_sub(self.min.x)?,
            self.max.y.checked_sub(self.min.y)?,
        ])
    }
}

impl<TSpace> std::fmt::Debug for BBoxXYXY<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxXYXY")
            .field("xmin", &self.min.x)
            .field("ymin", &self.min.y)
            .field("xmax", &self.max.x)
            .field("ymax", &self.max.y)
            .finish()
    }
}

impl<TSpace> Default for BBoxXYXY<TSpace> {
    fn default() -> Self {
        Self::from_xyxy(0, 0, 0, 0)
    }
}
