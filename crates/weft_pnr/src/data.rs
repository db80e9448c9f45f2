//! Core netlist data structures.
//!
//! Defines the physical netlist that flows through placement and routing:
//! cells (with an optional bel assignment) and nets (driver pin, sink pins,
//! and an optional per-sink pip path). Pins are referred to by the owning
//! cell plus the pin name on the cell's bel type.

use crate::ids::{CellId, NetId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use weft_common::Ident;
use weft_device::{BelId, PipId};

/// The physical netlist for place and route.
///
/// Cells and nets live in flat vectors indexed by [`CellId`] and [`NetId`].
/// The by-name maps are rebuilt after deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Netlist {
    /// All cells in the netlist.
    pub cells: Vec<Cell>,
    /// All nets in the netlist.
    pub nets: Vec<Net>,
    /// Auxiliary index: cell name to ID (rebuilt on deserialization).
    #[serde(skip)]
    pub cell_by_name: HashMap<String, CellId>,
    /// Auxiliary index: net name to ID (rebuilt on deserialization).
    #[serde(skip)]
    pub net_by_name: HashMap<String, NetId>,
}

impl Netlist {
    /// Creates an empty netlist.
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            nets: Vec::new(),
            cell_by_name: HashMap::new(),
            net_by_name: HashMap::new(),
        }
    }

    /// Adds a cell and returns its ID.
    pub fn add_cell(&mut self, mut cell: Cell) -> CellId {
        let id = CellId::from_raw(self.cells.len() as u32);
        cell.id = id;
        self.cell_by_name.insert(cell.name.clone(), id);
        self.cells.push(cell);
        id
    }

    /// Adds a net and returns its ID.
    pub fn add_net(&mut self, mut net: Net) -> NetId {
        let id = NetId::from_raw(self.nets.len() as u32);
        net.id = id;
        self.net_by_name.insert(net.name.clone(), id);
        self.nets.push(net);
        id
    }

    /// Returns the cell with the given ID.
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the cell with the given ID.
    pub fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.as_raw() as usize]
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the net with the given ID.
    pub fn net_mut(&mut self, id: NetId) -> &mut Net {
        &mut self.nets[id.as_raw() as usize]
    }

    /// Returns the number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Rebuilds auxiliary indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.cell_by_name.clear();
        for (i, cell) in self.cells.iter().enumerate() {
            self.cell_by_name
                .insert(cell.name.clone(), CellId::from_raw(i as u32));
        }
        self.net_by_name.clear();
        for (i, net) in self.nets.iter().enumerate() {
            self.net_by_name
                .insert(net.name.clone(), NetId::from_raw(i as u32));
        }
    }

    /// Returns whether all cells have been placed.
    pub fn is_fully_placed(&self) -> bool {
        self.cells.iter().all(|c| c.placement.is_some())
    }

    /// Returns whether all nets have been routed.
    pub fn is_fully_routed(&self) -> bool {
        self.nets.iter().all(|n| n.routing.is_some())
    }

    /// Returns the number of placed cells.
    pub fn placed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.placement.is_some()).count()
    }

    /// Returns the number of routed nets.
    pub fn routed_count(&self) -> usize {
        self.nets.iter().filter(|n| n.routing.is_some()).count()
    }
}

impl Default for Netlist {
    fn default() -> Self {
        Self::new()
    }
}

/// A cell in the netlist.
///
/// Represents one instance that must be assigned to a bel whose type name
/// matches the cell's `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// The unique ID of this cell.
    pub id: CellId,
    /// Human-readable cell name (e.g., "lut_0", "ff_clk_d").
    pub name: String,
    /// The bel type this cell occupies (e.g., the interned "LUT4").
    pub kind: Ident,
    /// The bel this cell is placed on (`None` = unplaced).
    pub placement: Option<BelId>,
}

/// A net in the netlist.
///
/// Connects one driver pin to zero or more sink pins. Each pin is the owning
/// cell plus the pin name on its bel. After routing, `routing` holds one pip
/// path per sink, each in source-to-sink order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    /// The unique ID of this net.
    pub id: NetId,
    /// Human-readable net name (e.g., "clk", "data_bus[3]").
    pub name: String,
    /// The driver pin of this net.
    pub driver: (CellId, Ident),
    /// The sink pins of this net.
    pub sinks: Vec<(CellId, Ident)>,
    /// One pip path per sink (`None` = unrouted).
    pub routing: Option<Vec<Vec<PipId>>>,
}
