//! First-fit placement.
//!
//! Walks the netlist in order and assigns each unplaced cell to the first
//! free bel whose type name matches the cell's kind, scanning bels in grid
//! order. Every assignment is also bound on the device, so later cells (and
//! later placement runs) see the occupancy.

use crate::data::Netlist;
use crate::PnrError;
use serde::{Deserialize, Serialize};
use weft_common::Ident;
use weft_device::{BelId, Device};

/// Options controlling placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacerConfig {
    /// Keep placements already present in the netlist and bind them on the
    /// device before assigning the remaining cells. When false, existing
    /// placements are discarded and every cell is placed from scratch.
    pub keep_existing: bool,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            keep_existing: true,
        }
    }
}

/// Assigns every unplaced cell in `netlist` to a free bel of its kind.
///
/// Cells are taken in netlist order, bels in grid scan order, first fit.
/// Each placed cell is bound on `device` under its netlist name.
///
/// # Panics
///
/// Panics if a kept placement names a bel that does not exist on `device`
/// or is already bound.
pub fn place(
    netlist: &mut Netlist,
    device: &mut Device,
    config: &PlacerConfig,
) -> Result<(), PnrError> {
    if !config.keep_existing {
        for cell in &mut netlist.cells {
            cell.placement = None;
        }
    }

    // Bind kept placements first so they are off the market.
    for i in 0..netlist.cells.len() {
        let Some(bel) = netlist.cells[i].placement else {
            continue;
        };
        let name = device.id(&netlist.cells[i].name);
        device.bind_bel(bel, name);
    }

    for i in 0..netlist.cells.len() {
        if netlist.cells[i].placement.is_some() {
            continue;
        }
        let kind = netlist.cells[i].kind;
        let Some(bel) = free_bel_of_kind(device, kind) else {
            return Err(PnrError::NoBelFree {
                cell: netlist.cells[i].name.clone(),
                bel_type: device.interner().resolve(kind).to_string(),
            });
        };
        let name = device.id(&netlist.cells[i].name);
        device.bind_bel(bel, name);
        netlist.cells[i].placement = Some(bel);
    }
    Ok(())
}

fn free_bel_of_kind(device: &Device, kind: Ident) -> Option<BelId> {
    device
        .bels()
        .find(|&bel| device.bel_type_name(bel) == kind && device.bel_available(bel))
}
