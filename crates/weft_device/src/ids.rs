//! Addressing keys for entities in the device routing graph.
//!
//! Blueprint entries (tile types, bel types) use dense `u32` ids into the
//! [`DeviceDb`](crate::db::DeviceDb) tables. Physical resources (bels,
//! wires, pips) use composite keys pairing a grid [`Loc`] with an index into
//! the tile type instantiated there, so the same index names a different
//! physical object at every location. A negative index is the "no such
//! resource" sentinel: lookups report absence by returning it rather than
//! wrapping every key in an `Option`.

use crate::loc::Loc;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Dense index of a tile type blueprint in the device database.
    TileTypeId
);

define_id!(
    /// Dense index of a bel type in the device database.
    BelTypeId
);

/// A physical bel: a grid location plus an index into the local tile type's
/// bel list.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct BelId {
    /// The tile holding this bel.
    pub loc: Loc,
    /// Index into the tile type's bel list, `-1` when invalid.
    pub index: i32,
}

impl BelId {
    /// The invalid bel sentinel returned by failed lookups.
    pub const INVALID: Self = Self {
        loc: Loc::INVALID,
        index: -1,
    };

    /// Creates a bel key from its location and local index.
    pub fn new(loc: Loc, index: i32) -> Self {
        Self { loc, index }
    }

    /// Returns `true` unless this is the invalid sentinel.
    pub fn is_valid(self) -> bool {
        self.index >= 0
    }
}

impl Default for BelId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// A physical wire: a grid location plus an index into the local tile
/// type's wire list.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct WireId {
    /// The tile holding this wire.
    pub loc: Loc,
    /// Index into the tile type's wire list, `-1` when invalid.
    pub index: i32,
}

impl WireId {
    /// The invalid wire sentinel returned by failed lookups.
    pub const INVALID: Self = Self {
        loc: Loc::INVALID,
        index: -1,
    };

    /// Creates a wire key from its location and local index.
    pub fn new(loc: Loc, index: i32) -> Self {
        Self { loc, index }
    }

    /// Returns `true` unless this is the invalid sentinel.
    pub fn is_valid(self) -> bool {
        self.index >= 0
    }
}

impl Default for WireId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Discriminates the two kinds of pip in the fabric.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum PipKind {
    /// An intra-tile switch from the tile type's pip list.
    Pip,
    /// A cross-tile hop through a stitched port.
    Port,
}

/// A physical pip: either an intra-tile switch or a cross-tile hop.
///
/// For [`PipKind::Pip`], `index` addresses the tile type's pip list and
/// `subindex` is always 0. For [`PipKind::Port`], `index` selects the local
/// port and `subindex` selects which of the port's wire attachments the hop
/// uses; a port pip lives at the tile whose local wire feeds the hop, with
/// its destination on the stitched neighbor.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct PipId {
    /// The tile this pip is addressed through.
    pub loc: Loc,
    /// Which namespace `index` addresses.
    pub kind: PipKind,
    /// Index into the tile type's pip or port list, `-1` when invalid.
    pub index: i32,
    /// Attachment index for port pips, 0 for intra-tile pips.
    pub subindex: i32,
}

impl PipId {
    /// The invalid pip sentinel.
    pub const INVALID: Self = Self {
        loc: Loc::INVALID,
        kind: PipKind::Pip,
        index: -1,
        subindex: 0,
    };

    /// Creates an intra-tile pip key.
    pub fn new_pip(loc: Loc, index: i32) -> Self {
        Self {
            loc,
            kind: PipKind::Pip,
            index,
            subindex: 0,
        }
    }

    /// Creates a cross-tile port pip key.
    pub fn new_port(loc: Loc, index: i32, subindex: i32) -> Self {
        Self {
            loc,
            kind: PipKind::Port,
            index,
            subindex,
        }
    }

    /// Returns `true` unless this is the invalid sentinel.
    pub fn is_valid(self) -> bool {
        self.index >= 0
    }
}

impl Default for PipId {
    fn default() -> Self {
        Self::INVALID
    }
}
