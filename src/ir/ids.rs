//! Newtype IDs for the three kinds of records in the output document.
//!
//! Using newtypes prevents accidentally mixing up different kinds of IDs
//! (e.g., writing an annotation counter into an `image_id` field).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Creates a new id.
            #[inline]
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the underlying u64 value.
            #[inline]
            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(
    /// Identifier of an image record; assigned in traversal order from 0.
    ImageId
);

id_newtype!(
    /// Identifier of an annotation record; assigned in traversal order from 0.
    AnnotationId
);

id_newtype!(
    /// Identifier of a category; assigned on first sighting of its name, from 0.
    CategoryId
);

/// A monotonically increasing 0-based id source for one kind of id.
///
/// Each run owns its own sequences, so ids never leak between runs.
#[derive(Debug)]
pub struct IdSequence<T> {
    next: u64,
    _kind: PhantomData<T>,
}

impl<T: From<u64>> IdSequence<T> {
    /// Creates a sequence whose first id is 0.
    pub fn new() -> Self {
        Self {
            next: 0,
            _kind: PhantomData,
        }
    }

    /// Returns the next id and advances the sequence.
    pub fn next_id(&mut self) -> T {
        let id = T::from(self.next);
        self.next += 1;
        id
    }
}

impl<T: From<u64>> Default for IdSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}
