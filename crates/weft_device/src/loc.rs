//! Grid coordinates for tiles in the device fabric.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tile position in the device grid.
///
/// Positions count from `(0, 0)`; negative coordinates only ever appear as
/// the [`Loc::INVALID`] sentinel inside invalid resource keys.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Loc {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl Loc {
    /// The invalid location sentinel.
    pub const INVALID: Self = Self { x: -1, y: -1 };

    /// Creates a location from column and row indices.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns `true` if both coordinates are non-negative.
    pub fn is_valid(self) -> bool {
        self.x >= 0 && self.y >= 0
    }
}

impl Default for Loc {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X{}/Y{}", self.x, self.y)
    }
}
