//! Coordinate space marker types.
//!
//! These are zero-sized types (ZSTs) used as type parameters to tell the
//! pixel grid of the original image apart from the pixel grid of the resized
//! image at compile time.

use std::fmt;

/// Marker for pixel coordinates on the original, un-resized image.
///
/// This is the space VOC XML annotations are written in.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {}

/// Marker for pixel coordinates on the resized output image.
///
/// Only boxes in this space are written to the output document.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resized {}

impl fmt::Debug for Source {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Resized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
