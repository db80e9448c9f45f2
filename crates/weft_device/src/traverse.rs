//! Uphill and downhill pip traversal.
//!
//! [`WirePips`] enumerates the pips one switch-hop away from a wire without
//! materializing them: first the intra-tile pips recorded in the wire's
//! cross-reference tables, then the cross-tile hops through the wire's port
//! attachments. Hops through unstitched ports are skipped outright; on this
//! device variant they lead nowhere, so they must never be yielded.
//!
//! The router calls this once per edge expansion, so each yield is an array
//! index plus at most one connection-table lookup.

use crate::db::WireData;
use crate::device::Device;
use crate::ids::{PipId, WireId};
use crate::loc::Loc;
use serde::{Deserialize, Serialize};

/// Traversal direction relative to a wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PipDir {
    /// Pips whose destination is the wire.
    Uphill,
    /// Pips whose source is the wire.
    Downhill,
}

enum Stage {
    Pips(usize),
    Ports(usize),
    Done,
}

/// Iterator over the pips on one side of a wire.
///
/// Created by [`Device::uphill_pips`] and [`Device::downhill_pips`]. The
/// sequence is finite and forward-only; call the constructor again for a
/// fresh pass.
pub struct WirePips<'a> {
    device: &'a Device,
    data: &'a WireData,
    loc: Loc,
    dir: PipDir,
    stage: Stage,
}

impl Device {
    /// Iterates over the pips driving `wire`.
    ///
    /// # Panics
    ///
    /// Panics if `wire` is invalid or does not exist at its tile.
    pub fn uphill_pips(&self, wire: WireId) -> WirePips<'_> {
        WirePips::new(self, wire, PipDir::Uphill)
    }

    /// Iterates over the pips driven by `wire`.
    ///
    /// # Panics
    ///
    /// Panics if `wire` is invalid or does not exist at its tile.
    pub fn downhill_pips(&self, wire: WireId) -> WirePips<'_> {
        WirePips::new(self, wire, PipDir::Downhill)
    }
}

impl<'a> WirePips<'a> {
    fn new(device: &'a Device, wire: WireId, dir: PipDir) -> Self {
        assert!(wire.is_valid(), "cannot traverse from the invalid wire");
        let tt = device.tile_type_at(wire.loc);
        assert!(
            (wire.index as usize) < tt.wires.len(),
            "no wire {} at {}",
            wire.index,
            wire.loc
        );
        Self {
            device,
            data: &tt.wires[wire.index as usize],
            loc: wire.loc,
            dir,
            stage: Stage::Pips(0),
        }
    }
}

impl Iterator for WirePips<'_> {
    type Item = PipId;

    fn next(&mut self) -> Option<PipId> {
        loop {
            match self.stage {
                Stage::Pips(i) => {
                    let xrefs = match self.dir {
                        PipDir::Uphill => &self.data.pip_dst_xrefs,
                        PipDir::Downhill => &self.data.pip_src_xrefs,
                    };
                    if i >= xrefs.len() {
                        self.stage = Stage::Ports(0);
                        continue;
                    }
                    self.stage = Stage::Pips(i + 1);
                    return Some(PipId::new_pip(self.loc, xrefs[i] as i32));
                }
                Stage::Ports(i) => {
                    if i >= self.data.port_xrefs.len() {
                        self.stage = Stage::Done;
                        continue;
                    }
                    self.stage = Stage::Ports(i + 1);
                    let xref = self.data.port_xrefs[i];
                    // Connectivity is a hard gate: an unstitched port is
                    // skipped, not yielded in some disabled form.
                    let Some(conn) = self.device.port_conn(self.loc, xref.port) else {
                        continue;
                    };
                    return Some(match self.dir {
                        PipDir::Downhill => {
                            PipId::new_port(self.loc, xref.port as i32, xref.subindex as i32)
                        }
                        // The hop into this wire belongs to the far tile,
                        // where its source attachment lives.
                        PipDir::Uphill => {
                            PipId::new_port(conn.loc, conn.port as i32, xref.subindex as i32)
                        }
                    });
                }
                Stage::Done => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DeviceDb, TileTypeData};
    use crate::ids::PipKind;
    use weft_common::Interner;

    // Single tile, wires A and B, one pip A -> B, no ports.
    fn simple_device() -> Device {
        let interner = Interner::new();
        let mut db = DeviceDb::new("dev", 1, 1);
        let mut tt = TileTypeData::new(interner.get_or_intern("CLB"));
        let a = tt.add_wire(interner.get_or_intern("A"));
        let b = tt.add_wire(interner.get_or_intern("B"));
        tt.add_pip(a, b);
        db.add_tile_type(tt);
        Device::new(db, interner)
    }

    // 2x1 grid of one tile type: wires A, B, E, W; pips A -> B and E -> A;
    // port P carries E, port Q carries W. Only P at (0,0) and Q at (1,0)
    // are stitched; the mirror ports on the other tiles stay open.
    fn linked_fabric() -> Device {
        let interner = Interner::new();
        let mut db = DeviceDb::new("dev", 2, 1);
        let mut tt = TileTypeData::new(interner.get_or_intern("INT"));
        let a = tt.add_wire(interner.get_or_intern("A"));
        let b = tt.add_wire(interner.get_or_intern("B"));
        let e = tt.add_wire(interner.get_or_intern("E"));
        let w = tt.add_wire(interner.get_or_intern("W"));
        tt.add_pip(a, b);
        tt.add_pip(e, a);
        tt.add_port(interner.get_or_intern("P"), vec![e]);
        tt.add_port(interner.get_or_intern("Q"), vec![w]);
        db.add_tile_type(tt);
        let mut device = Device::new(db, interner);
        device.connect_ports(Loc::new(0, 0), 0, Loc::new(1, 0), 1);
        device
    }

    // 2x1 grid, no intra-tile pips: port P carries [E0, E1], port Q
    // carries [W0, W1]; P at (0,0) is stitched to Q at (1,0).
    fn wide_link_fabric() -> Device {
        let interner = Interner::new();
        let mut db = DeviceDb::new("dev", 2, 1);
        let mut tt = TileTypeData::new(interner.get_or_intern("INT"));
        let e0 = tt.add_wire(interner.get_or_intern("E0"));
        let e1 = tt.add_wire(interner.get_or_intern("E1"));
        let w0 = tt.add_wire(interner.get_or_intern("W0"));
        let w1 = tt.add_wire(interner.get_or_intern("W1"));
        tt.add_port(interner.get_or_intern("P"), vec![e0, e1]);
        tt.add_port(interner.get_or_intern("Q"), vec![w0, w1]);
        db.add_tile_type(tt);
        let mut device = Device::new(db, interner);
        device.connect_ports(Loc::new(0, 0), 0, Loc::new(1, 0), 1);
        device
    }

    #[test]
    fn single_pip_seen_from_both_ends() {
        let device = simple_device();
        let origin = Loc::new(0, 0);
        let a = WireId::new(origin, 0);
        let b = WireId::new(origin, 1);

        let up: Vec<PipId> = device.uphill_pips(b).collect();
        assert_eq!(up, vec![PipId::new_pip(origin, 0)]);
        assert_eq!(device.pip_name(up[0]), "X0/Y0/A.->.B");

        let down: Vec<PipId> = device.downhill_pips(a).collect();
        assert_eq!(down, up);
    }

    #[test]
    fn nothing_uphill_of_a_source_or_downhill_of_a_sink() {
        let device = simple_device();
        let origin = Loc::new(0, 0);
        assert_eq!(device.uphill_pips(WireId::new(origin, 0)).count(), 0);
        assert_eq!(device.downhill_pips(WireId::new(origin, 1)).count(), 0);
    }

    #[test]
    fn intra_tile_pips_come_before_port_hops() {
        let device = linked_fabric();
        let e = WireId::new(Loc::new(0, 0), 2);
        let pips: Vec<PipId> = device.downhill_pips(e).collect();
        assert_eq!(pips.len(), 2);
        assert_eq!(pips[0].kind, PipKind::Pip);
        assert_eq!(pips[1].kind, PipKind::Port);
        assert_eq!(pips[1].loc, Loc::new(0, 0));
    }

    #[test]
    fn uphill_hop_is_attributed_to_the_far_tile() {
        let device = linked_fabric();
        let w = WireId::new(Loc::new(1, 0), 3);
        let pips: Vec<PipId> = device.uphill_pips(w).collect();
        assert_eq!(pips, vec![PipId::new_port(Loc::new(0, 0), 0, 0)]);
    }

    #[test]
    fn both_sides_of_a_link_agree_on_the_hop() {
        let device = linked_fabric();
        let e = WireId::new(Loc::new(0, 0), 2);
        let w = WireId::new(Loc::new(1, 0), 3);

        let down: Vec<PipId> = device
            .downhill_pips(e)
            .filter(|p| p.kind == PipKind::Port)
            .collect();
        let up: Vec<PipId> = device.uphill_pips(w).collect();
        assert_eq!(down, up);

        // And the shared id really spans the link.
        let hop = up[0];
        assert_eq!(device.pip_src_wire(hop), e);
        assert_eq!(device.pip_dst_wire(hop), w);
    }

    #[test]
    fn wide_port_attachments_hop_by_subindex() {
        let device = wide_link_fabric();
        let e1 = WireId::new(Loc::new(0, 0), 1);
        let w1 = WireId::new(Loc::new(1, 0), 3);

        // The second attachment is its own hop, agreed from both ends.
        let down: Vec<PipId> = device.downhill_pips(e1).collect();
        assert_eq!(down, vec![PipId::new_port(Loc::new(0, 0), 0, 1)]);
        let up: Vec<PipId> = device.uphill_pips(w1).collect();
        assert_eq!(up, down);

        let hop = down[0];
        assert_eq!(device.pip_src_wire(hop), e1);
        assert_eq!(device.pip_dst_wire(hop), w1);
        assert_eq!(device.pip_name(hop), "X0/Y0/P/1.->.W1");
        assert_eq!(device.pip_by_name("X0/Y0/P/1.->.W1"), hop);
    }

    #[test]
    fn sibling_attachments_stay_in_their_lanes() {
        let device = wide_link_fabric();
        let e0 = WireId::new(Loc::new(0, 0), 0);
        let w0 = WireId::new(Loc::new(1, 0), 2);

        let down: Vec<PipId> = device.downhill_pips(e0).collect();
        assert_eq!(down, vec![PipId::new_port(Loc::new(0, 0), 0, 0)]);
        assert_eq!(device.pip_name(down[0]), "X0/Y0/P/0.->.W0");
        // W0 is fed by the subindex-0 hop alone, never its sibling's.
        let up: Vec<PipId> = device.uphill_pips(w0).collect();
        assert_eq!(up, down);
    }

    #[test]
    fn unstitched_ports_are_gated_out() {
        let device = linked_fabric();
        // Q at (0,0) was never stitched, so nothing feeds W there.
        assert_eq!(device.uphill_pips(WireId::new(Loc::new(0, 0), 3)).count(), 0);
        // P at (1,0) was never stitched, so E there only reaches its
        // intra-tile pip.
        let pips: Vec<PipId> = device.downhill_pips(WireId::new(Loc::new(1, 0), 2)).collect();
        assert_eq!(pips, vec![PipId::new_pip(Loc::new(1, 0), 1)]);
    }

    #[test]
    fn every_reachable_pip_roundtrips_through_its_name() {
        let device = linked_fabric();
        for y in 0..1 {
            for x in 0..2 {
                let loc = Loc::new(x, y);
                for index in 0..device.tile_type_at(loc).wires.len() {
                    let wire = WireId::new(loc, index as i32);
                    for pip in device.uphill_pips(wire).chain(device.downhill_pips(wire)) {
                        assert_eq!(device.pip_by_name(&device.pip_name(pip)), pip);
                    }
                }
            }
        }
    }

    #[test]
    fn fresh_iterators_repeat_the_sequence() {
        let device = linked_fabric();
        let e = WireId::new(Loc::new(0, 0), 2);
        let first: Vec<PipId> = device.downhill_pips(e).collect();
        let second: Vec<PipId> = device.downhill_pips(e).collect();
        assert_eq!(first, second);
    }

    #[test]
    #[should_panic(expected = "invalid wire")]
    fn traversing_the_invalid_wire_is_fatal() {
        let device = simple_device();
        device.uphill_pips(WireId::INVALID).count();
    }

    #[test]
    #[should_panic(expected = "outside the")]
    fn traversing_outside_the_grid_is_fatal() {
        let device = simple_device();
        device.downhill_pips(WireId::new(Loc::new(9, 9), 0)).count();
    }

    #[test]
    #[should_panic(expected = "no wire")]
    fn traversing_a_missing_wire_index_is_fatal() {
        let device = simple_device();
        device.downhill_pips(WireId::new(Loc::new(0, 0), 99)).count();
    }
}
