//! Place and route over a woven device graph.
//!
//! This crate takes a flat [`Netlist`] of cells and nets and maps it onto a
//! [`Device`](weft_device::Device): placement assigns each cell to a bel of
//! its kind, routing connects each net through the device's pips.
//!
//! # Pipeline
//!
//! 1. **Place**: first-fit assignment of cells to free bels in grid scan order
//! 2. **Route**: per-sink breadth-first search uphill from the sink pin wire
//!
//! # Usage
//!
//! ```ignore
//! use weft_pnr::{place_and_route, PlacerConfig, RouterConfig};
//!
//! place_and_route(&mut netlist, &mut device, &PlacerConfig::default(), &RouterConfig::default())?;
//! assert!(netlist.is_fully_placed());
//! assert!(netlist.is_fully_routed());
//! ```

#![warn(missing_docs)]

pub mod data;
pub mod ids;
pub mod place;
pub mod route;

pub use data::{Cell, Net, Netlist};
pub use ids::{CellId, NetId};
pub use place::{place, PlacerConfig};
pub use route::{route, RouterConfig};

use weft_device::Device;

/// Errors produced by placement and routing.
///
/// These are resource failures on the given device, not bugs: the netlist
/// asked for more than the fabric has, or referenced a pin the fabric does
/// not wire up.
#[derive(Debug, thiserror::Error)]
pub enum PnrError {
    /// Placement ran out of free bels of a required type.
    #[error("no free {bel_type} bel for cell {cell}")]
    NoBelFree {
        /// Name of the cell that could not be placed.
        cell: String,
        /// The bel type the cell requires.
        bel_type: String,
    },
    /// Routing exhausted every uphill path to a sink.
    #[error("net {net} has no route to sink pin {pin} of cell {cell}")]
    Unroutable {
        /// Name of the net being routed.
        net: String,
        /// Name of the cell owning the unreachable sink pin.
        cell: String,
        /// Name of the unreachable sink pin.
        pin: String,
    },
    /// A net references a cell that has not been placed.
    #[error("cell {cell} is not placed")]
    MissingPlacement {
        /// Name of the unplaced cell.
        cell: String,
    },
    /// A net references a pin with no wire behind it.
    #[error("cell {cell} has no wire for pin {pin}")]
    NoPinWire {
        /// Name of the cell owning the pin.
        cell: String,
        /// The pin name that resolved to no wire.
        pin: String,
    },
}

/// Places and routes `netlist` on `device` in one call.
///
/// Runs [`place`] then [`route`] and stops at the first failure.
pub fn place_and_route(
    netlist: &mut Netlist,
    device: &mut Device,
    placer: &PlacerConfig,
    router: &RouterConfig,
) -> Result<(), PnrError> {
    place::place(netlist, device, placer)?;
    route::route(netlist, device, router)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_common::Interner;
    use weft_device::{BelTypeData, BelTypePin, DeviceDb, Loc, PipId, TileTypeData};

    fn small_device() -> Device {
        let interner = Interner::new();
        let mut db = DeviceDb::new("dev", 1, 1);
        let drv = db.add_bel_type(BelTypeData {
            name: interner.get_or_intern("DRV"),
            pins: vec![BelTypePin {
                name: interner.get_or_intern("O"),
                input: false,
                output: true,
            }],
        });
        let rcv = db.add_bel_type(BelTypeData {
            name: interner.get_or_intern("RCV"),
            pins: vec![BelTypePin {
                name: interner.get_or_intern("I"),
                input: true,
                output: false,
            }],
        });
        let mut tt = TileTypeData::new(interner.get_or_intern("CLB"));
        let o = tt.add_wire(interner.get_or_intern("DO"));
        let i = tt.add_wire(interner.get_or_intern("RI"));
        tt.add_pip(o, i);
        tt.add_bel(interner.get_or_intern("D0"), drv, vec![o as i32]);
        tt.add_bel(interner.get_or_intern("R0"), rcv, vec![i as i32]);
        db.add_tile_type(tt);
        Device::new(db, interner)
    }

    #[test]
    fn end_to_end_place_and_route() {
        let mut device = small_device();
        let mut netlist = Netlist::new();
        let d = netlist.add_cell(Cell {
            id: CellId::from_raw(0),
            name: "d".to_string(),
            kind: device.id("DRV"),
            placement: None,
        });
        let r = netlist.add_cell(Cell {
            id: CellId::from_raw(0),
            name: "r".to_string(),
            kind: device.id("RCV"),
            placement: None,
        });
        netlist.add_net(Net {
            id: NetId::from_raw(0),
            name: "n".to_string(),
            driver: (d, device.id("O")),
            sinks: vec![(r, device.id("I"))],
            routing: None,
        });

        place_and_route(
            &mut netlist,
            &mut device,
            &PlacerConfig::default(),
            &RouterConfig::default(),
        )
        .unwrap();

        assert!(netlist.is_fully_placed());
        assert!(netlist.is_fully_routed());
        let paths = netlist.nets[0].routing.as_ref().unwrap();
        assert_eq!(paths[0], vec![PipId::new_pip(Loc::new(0, 0), 0)]);
        assert_eq!(device.pip_name(paths[0][0]), "X0/Y0/DO.->.RI");
    }

    #[test]
    fn errors_carry_readable_messages() {
        let err = PnrError::NoBelFree {
            cell: "u_lut".to_string(),
            bel_type: "LUT4".to_string(),
        };
        assert_eq!(err.to_string(), "no free LUT4 bel for cell u_lut");
    }
}
