//! Breadth-first routing.
//!
//! Routes each net one sink at a time. An arc search starts at the sink's
//! pin wire and expands uphill, one pip per step, until it reaches the
//! driver's pin wire; the visit trail then unwinds into a pip path in
//! source-to-sink order. Visits are recorded in a [`SparseVec`] so the trail
//! keeps stable indices however large the search grows, and the search is
//! bounded by [`RouterConfig::max_visits`].
//!
//! Wire capacity is not modeled: two nets may share a wire. Congestion
//! negotiation sits a layer above this and rips up losers by clearing
//! `routing` before calling [`route`] again.

use crate::data::Netlist;
use crate::ids::CellId;
use crate::PnrError;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use weft_common::{Ident, SparseVec};
use weft_device::{Device, PipId, WireId};

/// Options controlling routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Upper bound on wires visited per arc. An arc that exhausts the
    /// budget fails as if the sink were unreachable.
    pub max_visits: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_visits: 1_000_000,
        }
    }
}

/// One step of an arc search. `pip` leads from this wire to the wire of the
/// `parent` visit, so unwinding from the driver yields a forward path.
#[derive(Clone, Copy)]
struct Visit {
    wire: WireId,
    pip: PipId,
    parent: usize,
}

/// Routes every unrouted net in `netlist`, one pip path per sink.
///
/// Nets that already carry a routing are left untouched. On success each
/// routed net holds one source-to-sink pip path per sink; a sink whose pin
/// wire is the driver's pin wire gets an empty path.
pub fn route(
    netlist: &mut Netlist,
    device: &Device,
    config: &RouterConfig,
) -> Result<(), PnrError> {
    for i in 0..netlist.nets.len() {
        if netlist.nets[i].routing.is_some() {
            continue;
        }
        let driver = netlist.nets[i].driver;
        let sinks = netlist.nets[i].sinks.clone();

        let src = pin_wire(netlist, device, driver)?;
        let mut paths = Vec::with_capacity(sinks.len());
        for &sink in &sinks {
            let dst = pin_wire(netlist, device, sink)?;
            match route_arc(device, config, src, dst) {
                Some(path) => paths.push(path),
                None => {
                    return Err(PnrError::Unroutable {
                        net: netlist.nets[i].name.clone(),
                        cell: netlist.cell(sink.0).name.clone(),
                        pin: device.interner().resolve(sink.1).to_string(),
                    });
                }
            }
        }
        netlist.nets[i].routing = Some(paths);
    }
    Ok(())
}

/// Resolves a pin reference to the wire behind it on the placed bel.
fn pin_wire(
    netlist: &Netlist,
    device: &Device,
    (cell, pin): (CellId, Ident),
) -> Result<WireId, PnrError> {
    let cell = netlist.cell(cell);
    let Some(bel) = cell.placement else {
        return Err(PnrError::MissingPlacement {
            cell: cell.name.clone(),
        });
    };
    let wire = device.bel_pin_wire(bel, pin);
    if !wire.is_valid() {
        return Err(PnrError::NoPinWire {
            cell: cell.name.clone(),
            pin: device.interner().resolve(pin).to_string(),
        });
    }
    Ok(wire)
}

fn route_arc(
    device: &Device,
    config: &RouterConfig,
    driver: WireId,
    sink: WireId,
) -> Option<Vec<PipId>> {
    if config.max_visits == 0 {
        return None;
    }
    let mut log: SparseVec<Visit> = SparseVec::with_capacity(config.max_visits);
    let mut seen: HashSet<WireId> = HashSet::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    let root = log.push(Visit {
        wire: sink,
        pip: PipId::INVALID,
        parent: usize::MAX,
    });
    seen.insert(sink);
    queue.push_back(root);

    while let Some(index) = queue.pop_front() {
        let visit = log.get(index);
        if visit.wire == driver {
            return Some(unwind(&log, index));
        }
        for pip in device.uphill_pips(visit.wire) {
            let src = device.pip_src_wire(pip);
            if !seen.insert(src) {
                continue;
            }
            if log.len() >= config.max_visits {
                return None;
            }
            let next = log.push(Visit {
                wire: src,
                pip,
                parent: index,
            });
            queue.push_back(next);
        }
    }
    None
}

fn unwind(log: &SparseVec<Visit>, mut index: usize) -> Vec<PipId> {
    let mut path = Vec::new();
    loop {
        let visit = log.get(index);
        if visit.parent == usize::MAX {
            return path;
        }
        path.push(visit.pip);
        index = visit.parent;
    }
}
