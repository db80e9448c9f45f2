//! Runtime device state: stitched tiles, name caches, and bel occupancy.

use crate::db::{DeviceDb, PinDir, TileTypeData};
use crate::ids::{BelId, PipId, PipKind, WireId};
use crate::loc::Loc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use weft_common::{Ident, Interner};

/// One side of a stitched cross-tile link: the neighboring tile and the
/// neighbor's local port index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortConn {
    /// The neighboring tile.
    pub loc: Loc,
    /// The neighbor's local port index.
    pub port: u32,
}

/// Runtime state of one grid position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    /// Stitched far side of each local port, `None` while unstitched. On a
    /// given device variant some ports never get stitched at all (edges of
    /// the grid, absent fabric); those stay `None` forever.
    pub conns: Vec<Option<PortConn>>,
}

/// A device: the static description plus runtime stitching, lazily built
/// name caches, and bel occupancy.
///
/// The description and stitching are fixed once initialization ends, so
/// queries after that point are read-only and safe from many threads. The
/// name caches sit behind mutexes so that a read-only query can still
/// memoize what it resolved.
pub struct Device {
    pub(crate) db: DeviceDb,
    pub(crate) interner: Interner,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) bel_cache: Mutex<HashMap<Ident, BelId>>,
    pub(crate) wire_cache: Mutex<HashMap<Ident, WireId>>,
    pub(crate) pip_cache: Mutex<HashMap<Ident, PipId>>,
    pub(crate) bound: HashMap<BelId, Ident>,
}

impl Device {
    /// Wraps a built description, creating one unstitched tile per grid
    /// position.
    pub fn new(db: DeviceDb, interner: Interner) -> Self {
        let mut tiles = Vec::with_capacity(db.grid.len());
        for &ty in &db.grid {
            let ports = db.tile_type(ty).ports.len();
            tiles.push(Tile {
                conns: vec![None; ports],
            });
        }
        Self {
            db,
            interner,
            tiles,
            bel_cache: Mutex::new(HashMap::new()),
            wire_cache: Mutex::new(HashMap::new()),
            pip_cache: Mutex::new(HashMap::new()),
            bound: HashMap::new(),
        }
    }

    /// Returns the static device description.
    pub fn db(&self) -> &DeviceDb {
        &self.db
    }

    /// Returns the device's string interner.
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Interns `name`, returning its handle.
    pub fn id(&self, name: &str) -> Ident {
        self.interner.get_or_intern(name)
    }

    /// Returns the tile type blueprint instantiated at `loc`.
    ///
    /// # Panics
    ///
    /// Panics if `loc` lies outside the grid.
    pub fn tile_type_at(&self, loc: Loc) -> &TileTypeData {
        self.db.tile_type(self.db.tile_type_at(loc))
    }

    /// Returns the runtime tile at `loc`.
    ///
    /// # Panics
    ///
    /// Panics if `loc` lies outside the grid.
    pub fn tile(&self, loc: Loc) -> &Tile {
        &self.tiles[self.db.grid_index(loc)]
    }

    /// Returns the stitched far side of port `port` at `loc`, or `None`
    /// while the port is unstitched.
    ///
    /// # Panics
    ///
    /// Panics if `loc` lies outside the grid or `port` is out of range.
    pub fn port_conn(&self, loc: Loc, port: u32) -> Option<PortConn> {
        self.tile(loc).conns[port as usize]
    }

    /// Stitches port `a_port` of tile `a` to port `b_port` of tile `b`,
    /// recording both directions of the link.
    ///
    /// Part of device initialization; stitching is read-only once queries
    /// begin.
    ///
    /// # Panics
    ///
    /// Panics if either location lies outside the grid, either port index
    /// is out of range, or the two ports carry different numbers of wire
    /// attachments.
    pub fn connect_ports(&mut self, a: Loc, a_port: u32, b: Loc, b_port: u32) {
        let a_wires = self.tile_type_at(a).ports[a_port as usize].wires.len();
        let b_wires = self.tile_type_at(b).ports[b_port as usize].wires.len();
        assert_eq!(
            a_wires, b_wires,
            "cannot stitch {a} port {a_port} to {b} port {b_port}: attachment counts differ"
        );
        let ai = self.db.grid_index(a);
        let bi = self.db.grid_index(b);
        self.tiles[ai].conns[a_port as usize] = Some(PortConn { loc: b, port: b_port });
        self.tiles[bi].conns[b_port as usize] = Some(PortConn { loc: a, port: a_port });
    }

    /// Returns the wire driving `pip`.
    ///
    /// For a port pip this is the attachment on the pip's own tile.
    ///
    /// # Panics
    ///
    /// Panics if `pip` is invalid or does not exist at its tile.
    pub fn pip_src_wire(&self, pip: PipId) -> WireId {
        assert!(pip.is_valid(), "invalid pip has no source wire");
        let tt = self.tile_type_at(pip.loc);
        match pip.kind {
            PipKind::Pip => WireId::new(pip.loc, tt.pips[pip.index as usize].src_wire as i32),
            PipKind::Port => {
                let wire = tt.ports[pip.index as usize].wires[pip.subindex as usize];
                WireId::new(pip.loc, wire as i32)
            }
        }
    }

    /// Returns the wire driven by `pip`.
    ///
    /// For a port pip this is the matching attachment on the stitched
    /// neighbor.
    ///
    /// # Panics
    ///
    /// Panics if `pip` is invalid, does not exist at its tile, or is a port
    /// pip through an unstitched port. Traversal never yields such a pip,
    /// so one turning up here is a corrupted key.
    pub fn pip_dst_wire(&self, pip: PipId) -> WireId {
        assert!(pip.is_valid(), "invalid pip has no destination wire");
        let tt = self.tile_type_at(pip.loc);
        match pip.kind {
            PipKind::Pip => WireId::new(pip.loc, tt.pips[pip.index as usize].dst_wire as i32),
            PipKind::Port => {
                let Some(conn) = self.port_conn(pip.loc, pip.index as u32) else {
                    panic!("port pip at {} goes through unstitched port {}", pip.loc, pip.index);
                };
                let far = self.tile_type_at(conn.loc);
                let wire = far.ports[conn.port as usize].wires[pip.subindex as usize];
                WireId::new(conn.loc, wire as i32)
            }
        }
    }

    /// Returns the local name of `bel` within its tile.
    ///
    /// # Panics
    ///
    /// Panics if `bel` is invalid or does not exist at its tile.
    pub fn bel_basename(&self, bel: BelId) -> Ident {
        assert!(bel.is_valid(), "invalid bel has no name");
        self.tile_type_at(bel.loc).bels[bel.index as usize].name
    }

    /// Returns the local name of `wire` within its tile.
    ///
    /// # Panics
    ///
    /// Panics if `wire` is invalid or does not exist at its tile.
    pub fn wire_basename(&self, wire: WireId) -> Ident {
        assert!(wire.is_valid(), "invalid wire has no name");
        self.tile_type_at(wire.loc).wires[wire.index as usize].name
    }

    /// Returns the name of `bel`'s type.
    ///
    /// # Panics
    ///
    /// Panics if `bel` is invalid or does not exist at its tile.
    pub fn bel_type_name(&self, bel: BelId) -> Ident {
        assert!(bel.is_valid(), "invalid bel has no type");
        let data = &self.tile_type_at(bel.loc).bels[bel.index as usize];
        self.db.bel_type(data.bel_type).name
    }

    /// Returns the pin names of `bel`'s type, in declaration order.
    ///
    /// # Panics
    ///
    /// Panics if `bel` is invalid or does not exist at its tile.
    pub fn bel_pins(&self, bel: BelId) -> Vec<Ident> {
        assert!(bel.is_valid(), "invalid bel has no pins");
        let data = &self.tile_type_at(bel.loc).bels[bel.index as usize];
        self.db
            .bel_type(data.bel_type)
            .pins
            .iter()
            .map(|pin| pin.name)
            .collect()
    }

    /// Returns the wire wired to pin `pin` of `bel`, or [`WireId::INVALID`]
    /// when the bel's type has no such pin or leaves it unwired. Absence is
    /// a normal answer here, not an error.
    ///
    /// # Panics
    ///
    /// Panics if `bel` is invalid or does not exist at its tile.
    pub fn bel_pin_wire(&self, bel: BelId, pin: Ident) -> WireId {
        assert!(bel.is_valid(), "invalid bel has no pins");
        let data = &self.tile_type_at(bel.loc).bels[bel.index as usize];
        let pins = &self.db.bel_type(data.bel_type).pins;
        for (i, p) in pins.iter().enumerate() {
            if p.name == pin {
                let wire = data.pin_wires[i];
                if wire < 0 {
                    return WireId::INVALID;
                }
                return WireId::new(bel.loc, wire);
            }
        }
        WireId::INVALID
    }

    /// Returns the direction of pin `pin` on `bel`'s type.
    ///
    /// An unknown pin reports [`PinDir::Inout`]; callers that need an
    /// existence check use [`Device::bel_pin_wire`].
    ///
    /// # Panics
    ///
    /// Panics if `bel` is invalid or does not exist at its tile.
    pub fn bel_pin_dir(&self, bel: BelId, pin: Ident) -> PinDir {
        assert!(bel.is_valid(), "invalid bel has no pins");
        let data = &self.tile_type_at(bel.loc).bels[bel.index as usize];
        for p in &self.db.bel_type(data.bel_type).pins {
            if p.name == pin {
                return p.dir();
            }
        }
        PinDir::Inout
    }

    /// Iterates over every bel in the device, in grid order.
    pub fn bels(&self) -> impl Iterator<Item = BelId> + '_ {
        (0..self.db.height).flat_map(move |y| {
            (0..self.db.width).flat_map(move |x| {
                let loc = Loc::new(x, y);
                let count = self.tile_type_at(loc).bels.len() as i32;
                (0..count).map(move |index| BelId::new(loc, index))
            })
        })
    }

    /// Binds `bel` to the named cell.
    ///
    /// # Panics
    ///
    /// Panics if `bel` is invalid, does not exist at its tile, or is
    /// already bound.
    pub fn bind_bel(&mut self, bel: BelId, cell: Ident) {
        assert!(bel.is_valid(), "cannot bind the invalid bel");
        assert!(
            (bel.index as usize) < self.tile_type_at(bel.loc).bels.len(),
            "no bel {} at {}",
            bel.index,
            bel.loc
        );
        assert!(
            !self.bound.contains_key(&bel),
            "bel {} is already bound",
            self.bel_name(bel)
        );
        self.bound.insert(bel, cell);
    }

    /// Releases a previously bound bel.
    ///
    /// # Panics
    ///
    /// Panics if `bel` was not bound, whatever else may be wrong with it.
    pub fn unbind_bel(&mut self, bel: BelId) {
        let prev = self.bound.remove(&bel);
        assert!(
            prev.is_some(),
            "bel {} at {} was not bound",
            bel.index,
            bel.loc
        );
    }

    /// Returns `true` if no cell is bound to `bel`. The renderer keys its
    /// visual style for placement sites off this predicate.
    pub fn bel_available(&self, bel: BelId) -> bool {
        !self.bound.contains_key(&bel)
    }

    /// Returns the cell bound to `bel`, if any.
    pub fn bel_cell(&self, bel: BelId) -> Option<Ident> {
        self.bound.get(&bel).copied()
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.db.name)
            .field("width", &self.db.width)
            .field("height", &self.db.height)
            .finish_non_exhaustive()
    }
}
