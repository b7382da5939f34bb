//! Integer pixel coordinates tagged with their coordinate space.

use std::marker::PhantomData;

/// A 2D pixel coordinate with a type-level marker for the coordinate space.
///
/// The `TSpace` parameter should be either [`Source`](super::Source) or
/// [`Resized`](super::Resized), so a point read from XML cannot be written
/// out without going through the rescaler.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Coord<TSpace> {
    pub x: i64,
    pub y: i64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Coord<TSpace> {
    /// Creates a new coordinate with the given x and y values.
    #[inline]
    pub fn new(x: i64, y: i64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }
}

impl<TSpace> std::fmt::Debug for Coord<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coord")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<TSpace> Default for Coord<TSpace> {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
