//! Compass directions and multi-view direction tables.
//!
//! Multi-view generators render an orbit of N views starting at the front of
//! the subject. A [`DirectionTable`] names which of those N frames stands in
//! for each of the eight compass directions of a rotation sheet. There is one
//! table per supported view count; which one applies depends only on the
//! generator that produced the frames.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the eight compass directions of a rotation sheet.
///
/// `S` is the front view (camera facing the subject), `N` the back view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompassDirection {
    S,
    SW,
    W,
    NW,
    N,
    NE,
    E,
    SE,
}

impl CompassDirection {
    /// All directions in orbit order, starting at the front view.
    pub const ALL: [CompassDirection; 8] = [
        CompassDirection::S,
        CompassDirection::SW,
        CompassDirection::W,
        CompassDirection::NW,
        CompassDirection::N,
        CompassDirection::NE,
        CompassDirection::E,
        CompassDirection::SE,
    ];

    /// Upper-case label ("S", "SW", ...).
    pub fn label(&self) -> &'static str {
        match self {
            CompassDirection::S => "S",
            CompassDirection::SW => "SW",
            CompassDirection::W => "W",
            CompassDirection::NW => "NW",
            CompassDirection::N => "N",
            CompassDirection::NE => "NE",
            CompassDirection::E => "E",
            CompassDirection::SE => "SE",
        }
    }

    /// Lower-case label, used in upload paths and result keys.
    pub fn slug(&self) -> &'static str {
        match self {
            CompassDirection::S => "s",
            CompassDirection::SW => "sw",
            CompassDirection::W => "w",
            CompassDirection::NW => "nw",
            CompassDirection::N => "n",
            CompassDirection::NE => "ne",
            CompassDirection::E => "e",
            CompassDirection::SE => "se",
        }
    }

    /// Position of this direction in [`CompassDirection::ALL`].
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    /// Parses an upper- or lower-case label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors from building a direction table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectionTableError {
    #[error("view count must be positive")]
    EmptyOrbit,

    #[error("{direction} maps to frame {index}, but the orbit only has {view_count} frames")]
    IndexOutOfRange {
        direction: CompassDirection,
        index: usize,
        view_count: usize,
    },
}

/// Frame index for each compass direction of an N-view orbit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionTable {
    view_count: usize,
    indices: [usize; 8],
}

/// Orbit of 16 evenly spaced views (22.5° apart).
pub const TABLE_16: DirectionTable = DirectionTable {
    view_count: 16,
    indices: [0, 2, 4, 6, 8, 10, 12, 14],
};

/// Orbit of 21 views (~17.1° apart), as rendered by SV3D.
pub const TABLE_21: DirectionTable = DirectionTable {
    view_count: 21,
    indices: [0, 3, 5, 8, 10, 13, 15, 18],
};

/// Orbit of 25 views (14.4° apart).
pub const TABLE_25: DirectionTable = DirectionTable {
    view_count: 25,
    indices: [0, 3, 6, 9, 12, 16, 19, 22],
};

static BUILTIN_TABLES: [DirectionTable; 3] = [TABLE_16, TABLE_21, TABLE_25];

impl DirectionTable {
    /// Builds a table, checking every index lies inside the orbit.
    ///
    /// `indices` is given in [`CompassDirection::ALL`] order.
    pub fn new(view_count: usize, indices: [usize; 8]) -> Result<Self, DirectionTableError> {
        if view_count == 0 {
            return Err(DirectionTableError::EmptyOrbit);
        }
        for (direction, &index) in CompassDirection::ALL.iter().zip(indices.iter()) {
            if index >= view_count {
                return Err(DirectionTableError::IndexOutOfRange {
                    direction: *direction,
                    index,
                    view_count,
                });
            }
        }
        Ok(Self {
            view_count,
            indices,
        })
    }

    /// Returns the built-in table for a supported view count (16, 21 or 25).
    pub fn for_view_count(view_count: usize) -> Option<&'static DirectionTable> {
        BUILTIN_TABLES.iter().find(|t| t.view_count == view_count)
    }

    /// View counts with a built-in table.
    pub fn supported_view_counts() -> impl Iterator<Item = usize> {
        BUILTIN_TABLES.iter().map(|t| t.view_count)
    }

    /// Number of frames in the orbit this table indexes.
    pub fn view_count(&self) -> usize {
        self.view_count
    }

    /// Frame index for a direction.
    pub fn frame_index(&self, direction: CompassDirection) -> usize {
        self.indices[direction.ordinal()]
    }

    /// `(direction, frame index)` pairs in orbit order.
    pub fn iter(&self) -> impl Iterator<Item = (CompassDirection, usize)> + '_ {
        CompassDirection::ALL
            .into_iter()
            .map(move |d| (d, self.frame_index(d)))
    }
}

/// One value per compass direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionSet<T> {
    items: [T; 8],
}

impl<T> DirectionSet<T> {
    /// Builds a set by calling `f` for each direction in orbit order.
    pub fn from_fn(mut f: impl FnMut(CompassDirection) -> T) -> Self {
        Self {
            items: CompassDirection::ALL.map(&mut f),
        }
    }

    /// Builds a set by calling a fallible `f` for each direction in orbit order.
    pub fn try_from_fn<E>(
        mut f: impl FnMut(CompassDirection) -> Result<T, E>,
    ) -> Result<Self, E> {
        let mut items = Vec::with_capacity(8);
        for direction in CompassDirection::ALL {
            items.push(f(direction)?);
        }
        match items.try_into() {
            Ok(items) => Ok(Self { items }),
            Err(_) => unreachable!("exactly eight directions"),
        }
    }

    /// Value for a direction.
    pub fn get(&self, direction: CompassDirection) -> &T {
        &self.items[direction.ordinal()]
    }

    /// `(direction, value)` pairs in orbit order.
    pub fn iter(&self) -> impl Iterator<Item = (CompassDirection, &T)> {
        CompassDirection::ALL.into_iter().zip(self.items.iter())
    }
}

impl<T> Index<CompassDirection> for DirectionSet<T> {
    type Output = T;

    fn index(&self, direction: CompassDirection) -> &T {
        self.get(direction)
    }
}
