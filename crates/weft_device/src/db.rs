//! Static device description: bel types, tile type blueprints, and the grid.
//!
//! Everything here is immutable once the device is built. A tile type is a
//! blueprint shared by every grid position that instantiates it. The
//! cross-reference tables on each wire are maintained as pips and ports are
//! added, so traversal indexes straight into them instead of scanning the
//! pip list.

use crate::ids::{BelTypeId, TileTypeId};
use crate::loc::Loc;
use serde::{Deserialize, Serialize};
use weft_common::Ident;

/// Direction of a bel pin as seen from outside the bel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PinDir {
    /// The pin consumes a signal.
    Input,
    /// The pin drives a signal.
    Output,
    /// The pin may do either, or its direction is not recorded.
    Inout,
}

/// One pin of a bel type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BelTypePin {
    /// Pin name, unique within the bel type.
    pub name: Ident,
    /// Set when the pin consumes a signal.
    pub input: bool,
    /// Set when the pin drives a signal.
    pub output: bool,
}

impl BelTypePin {
    /// Returns the pin's direction.
    ///
    /// Pins flagged both ways report [`PinDir::Inout`], as do pins flagged
    /// neither way (some databases leave the flags unset for bidirectional
    /// pads).
    pub fn dir(&self) -> PinDir {
        match (self.input, self.output) {
            (true, false) => PinDir::Input,
            (false, true) => PinDir::Output,
            _ => PinDir::Inout,
        }
    }
}

/// A bel type: the pin interface shared by every bel of that type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BelTypeData {
    /// Type name (e.g. "SLICE", "IOB").
    pub name: Ident,
    /// Pin definitions, in declaration order.
    pub pins: Vec<BelTypePin>,
}

/// A bel instance within a tile type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BelData {
    /// Instance name, unique within the tile type.
    pub name: Ident,
    /// The bel type defining this bel's pins.
    pub bel_type: BelTypeId,
    /// Local wire index wired to each pin of the bel type, `-1` for pins
    /// left unwired in this tile type.
    pub pin_wires: Vec<i32>,
}

/// Marks a wire as attachment `subindex` of port `port`. Derived by
/// [`TileTypeData::add_port`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortXref {
    /// Local port index.
    pub port: u32,
    /// Which of the port's attachments this wire is.
    pub subindex: u32,
}

/// A wire within a tile type, with its derived cross-reference tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireData {
    /// Wire name, unique within the tile type.
    pub name: Ident,
    /// Pips (by local index) this wire drives.
    pub pip_src_xrefs: Vec<u32>,
    /// Pips (by local index) driving this wire.
    pub pip_dst_xrefs: Vec<u32>,
    /// Port attachments terminating at this wire.
    pub port_xrefs: Vec<PortXref>,
}

/// An intra-tile switch connecting two local wires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PipData {
    /// Local index of the driving wire.
    pub src_wire: u32,
    /// Local index of the driven wire.
    pub dst_wire: u32,
}

/// A port: a named attachment point stitched to a neighboring tile's port
/// when the device is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortData {
    /// Port name, unique within the tile type.
    pub name: Ident,
    /// Local wires attached to this port. The port on the far side of a
    /// stitched link has the same number of attachments, so one subindex
    /// names the same physical connection from either side.
    pub wires: Vec<u32>,
}

/// A tile type blueprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileTypeData {
    /// Type name (e.g. "CLB", "INT").
    pub name: Ident,
    /// Bels in this tile type.
    pub bels: Vec<BelData>,
    /// Wires in this tile type.
    pub wires: Vec<WireData>,
    /// Intra-tile pips.
    pub pips: Vec<PipData>,
    /// Ports toward neighboring tiles.
    pub ports: Vec<PortData>,
}

impl TileTypeData {
    /// Creates an empty tile type with the given name.
    pub fn new(name: Ident) -> Self {
        Self {
            name,
            bels: Vec::new(),
            wires: Vec::new(),
            pips: Vec::new(),
            ports: Vec::new(),
        }
    }

    /// Adds a wire and returns its local index.
    pub fn add_wire(&mut self, name: Ident) -> u32 {
        let index = self.wires.len() as u32;
        self.wires.push(WireData {
            name,
            pip_src_xrefs: Vec::new(),
            pip_dst_xrefs: Vec::new(),
            port_xrefs: Vec::new(),
        });
        index
    }

    /// Adds a bel and returns its local index.
    ///
    /// `pin_wires` holds one local wire index per pin of `bel_type`, `-1`
    /// for pins left unwired.
    pub fn add_bel(&mut self, name: Ident, bel_type: BelTypeId, pin_wires: Vec<i32>) -> u32 {
        let index = self.bels.len() as u32;
        self.bels.push(BelData {
            name,
            bel_type,
            pin_wires,
        });
        index
    }

    /// Adds an intra-tile pip and cross-references it on both wires.
    ///
    /// # Panics
    ///
    /// Panics if either wire index is out of range.
    pub fn add_pip(&mut self, src_wire: u32, dst_wire: u32) -> u32 {
        assert!((src_wire as usize) < self.wires.len(), "bad pip source wire");
        assert!(
            (dst_wire as usize) < self.wires.len(),
            "bad pip destination wire"
        );
        let index = self.pips.len() as u32;
        self.pips.push(PipData { src_wire, dst_wire });
        self.wires[src_wire as usize].pip_src_xrefs.push(index);
        self.wires[dst_wire as usize].pip_dst_xrefs.push(index);
        index
    }

    /// Adds a port and cross-references each attached wire.
    ///
    /// # Panics
    ///
    /// Panics if any attached wire index is out of range.
    pub fn add_port(&mut self, name: Ident, wires: Vec<u32>) -> u32 {
        let index = self.ports.len() as u32;
        for (subindex, &wire) in wires.iter().enumerate() {
            assert!((wire as usize) < self.wires.len(), "bad port wire");
            self.wires[wire as usize].port_xrefs.push(PortXref {
                port: index,
                subindex: subindex as u32,
            });
        }
        self.ports.push(PortData { name, wires });
        index
    }
}

/// The full static description of a device.
///
/// Built once, then owned read-only by [`Device`](crate::device::Device).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDb {
    /// Device name (e.g. "xc7k70t").
    pub name: String,
    /// Grid width in tiles.
    pub width: i32,
    /// Grid height in tiles.
    pub height: i32,
    /// Tile type of each grid position, row-major from `(0, 0)`.
    pub grid: Vec<TileTypeId>,
    /// Bel type table.
    pub bel_types: Vec<BelTypeData>,
    /// Tile type table.
    pub tile_types: Vec<TileTypeData>,
}

impl DeviceDb {
    /// Creates a description with a `width` by `height` grid. Every position
    /// starts as tile type 0; use [`DeviceDb::set_tile_type_at`] to override.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive.
    pub fn new(name: impl Into<String>, width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "device grid must be non-empty");
        Self {
            name: name.into(),
            width,
            height,
            grid: vec![TileTypeId::from_raw(0); (width * height) as usize],
            bel_types: Vec::new(),
            tile_types: Vec::new(),
        }
    }

    /// Adds a bel type and returns its id.
    pub fn add_bel_type(&mut self, data: BelTypeData) -> BelTypeId {
        let id = BelTypeId::from_raw(self.bel_types.len() as u32);
        self.bel_types.push(data);
        id
    }

    /// Adds a tile type and returns its id.
    pub fn add_tile_type(&mut self, data: TileTypeData) -> TileTypeId {
        let id = TileTypeId::from_raw(self.tile_types.len() as u32);
        self.tile_types.push(data);
        id
    }

    /// Returns the bel type with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id is out of bounds.
    pub fn bel_type(&self, id: BelTypeId) -> &BelTypeData {
        &self.bel_types[id.as_raw() as usize]
    }

    /// Returns the tile type with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id is out of bounds.
    pub fn tile_type(&self, id: TileTypeId) -> &TileTypeData {
        &self.tile_types[id.as_raw() as usize]
    }

    /// Sets the tile type instantiated at `loc`.
    ///
    /// # Panics
    ///
    /// Panics if `loc` lies outside the grid.
    pub fn set_tile_type_at(&mut self, loc: Loc, ty: TileTypeId) {
        let index = self.grid_index(loc);
        self.grid[index] = ty;
    }

    /// Returns the tile type id at `loc`.
    ///
    /// # Panics
    ///
    /// Panics if `loc` lies outside the grid. Keys carrying such a location
    /// were corrupted somewhere; there is no miss to report.
    pub fn tile_type_at(&self, loc: Loc) -> TileTypeId {
        self.grid[self.grid_index(loc)]
    }

    /// Returns `true` if `loc` lies inside the grid.
    pub fn in_grid(&self, loc: Loc) -> bool {
        loc.is_valid() && loc.x < self.width && loc.y < self.height
    }

    pub(crate) fn grid_index(&self, loc: Loc) -> usize {
        assert!(
            self.in_grid(loc),
            "location {loc} outside the {}x{} grid",
            self.width,
            self.height
        );
        (loc.y * self.width + loc.x) as usize
    }
}
