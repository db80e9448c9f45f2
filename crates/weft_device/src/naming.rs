//! Canonical names for bels, wires, and pips.
//!
//! Every routing resource has exactly one canonical name of the form
//! `X<x>/Y<y>/<local>`. For bels and wires the local part is the blueprint
//! name. Pip locals encode the endpoints: an intra-tile pip is
//! `<src>.->.<dst>`, a port hop is `<port>/<subindex>.->.<dst>` with the
//! destination wire's name taken from the far side of the link.
//!
//! Lookups memoize into per-device caches keyed by the interned full name.
//! Bel and wire misses return the invalid key; the caller checks the
//! sentinel. Pip lookups work differently: port hop names depend on how the
//! device was stitched, so they cannot be derived from the blueprint alone.
//! A miss therefore materializes every pip of the target tile into the
//! cache in one pass and looks again; a name still missing after that does
//! not exist on this device, which is fatal.

use crate::device::Device;
use crate::ids::{BelId, PipId, PipKind, WireId};
use crate::loc::Loc;

/// Splits a canonical `X<x>/Y<y>/<local>` name into its parts.
///
/// Only the first two `/` separate; the local part may itself contain
/// slashes (port pip names do).
///
/// # Panics
///
/// Panics if either separator is missing or a coordinate does not parse.
/// Names reaching this point come from this system's own output or from
/// trusted configuration text, so a malformed one is corrupt input rather
/// than a lookup miss.
pub fn split_name(name: &str) -> (i32, i32, &str) {
    let Some((x_part, rest)) = name.split_once('/') else {
        panic!("malformed resource name {name:?}");
    };
    let Some((y_part, local)) = rest.split_once('/') else {
        panic!("malformed resource name {name:?}");
    };
    (coord(name, x_part), coord(name, y_part), local)
}

// The leading byte is the 'X' or 'Y' marker; the digits follow it.
fn coord(name: &str, part: &str) -> i32 {
    match part.get(1..).unwrap_or("").parse() {
        Ok(value) => value,
        Err(_) => panic!("malformed resource name {name:?}: bad coordinate {part:?}"),
    }
}

impl Device {
    /// Resolves a canonical bel name, returning [`BelId::INVALID`] when no
    /// bel of that name exists. Absence is a normal answer.
    ///
    /// The first hit for a name scans the tile type's bel list; hits are
    /// memoized, so later lookups are one hash access.
    ///
    /// # Panics
    ///
    /// Panics only for a name that violates the `X<x>/Y<y>/<local>` grammar.
    pub fn bel_by_name(&self, name: &str) -> BelId {
        let key = self.id(name);
        if let Some(&found) = self.bel_cache.lock().unwrap().get(&key) {
            return found;
        }
        let (x, y, local) = split_name(name);
        let loc = Loc::new(x, y);
        if !self.db.in_grid(loc) {
            return BelId::INVALID;
        }
        let basename = self.id(local);
        for (index, bel) in self.tile_type_at(loc).bels.iter().enumerate() {
            if bel.name == basename {
                let found = BelId::new(loc, index as i32);
                self.bel_cache.lock().unwrap().insert(key, found);
                return found;
            }
        }
        BelId::INVALID
    }

    /// Resolves a canonical wire name, returning [`WireId::INVALID`] when
    /// no wire of that name exists. Absence is a normal answer.
    ///
    /// # Panics
    ///
    /// Panics only for a name that violates the `X<x>/Y<y>/<local>` grammar.
    pub fn wire_by_name(&self, name: &str) -> WireId {
        let key = self.id(name);
        if let Some(&found) = self.wire_cache.lock().unwrap().get(&key) {
            return found;
        }
        let (x, y, local) = split_name(name);
        let loc = Loc::new(x, y);
        if !self.db.in_grid(loc) {
            return WireId::INVALID;
        }
        let basename = self.id(local);
        for (index, wire) in self.tile_type_at(loc).wires.iter().enumerate() {
            if wire.name == basename {
                let found = WireId::new(loc, index as i32);
                self.wire_cache.lock().unwrap().insert(key, found);
                return found;
            }
        }
        WireId::INVALID
    }

    /// Resolves a canonical pip name.
    ///
    /// On a cache miss, every pip of the named tile is materialized into
    /// the cache by walking the downhill side of each of the tile's wires
    /// (each intra-tile pip comes up once via its source wire, each
    /// stitched port hop once via its attachment wire), then the cache is
    /// checked again.
    ///
    /// # Panics
    ///
    /// Panics if the name is malformed, its location lies outside the
    /// grid, or no pip of that name exists at the tile even after
    /// materialization. Pip names only ever originate from this device's
    /// own output, so an unknown one means the description and its caller
    /// disagree, and there is no safe way to continue.
    pub fn pip_by_name(&self, name: &str) -> PipId {
        let key = self.id(name);
        if let Some(&found) = self.pip_cache.lock().unwrap().get(&key) {
            return found;
        }
        let (x, y, _) = split_name(name);
        let loc = Loc::new(x, y);
        {
            let mut cache = self.pip_cache.lock().unwrap();
            for index in 0..self.tile_type_at(loc).wires.len() {
                for pip in self.downhill_pips(WireId::new(loc, index as i32)) {
                    let pip_key = self.id(&self.pip_name(pip));
                    cache.insert(pip_key, pip);
                }
            }
        }
        match self.pip_cache.lock().unwrap().get(&key) {
            Some(&found) => found,
            None => panic!("no pip named {name:?}"),
        }
    }

    /// Returns the canonical name of `bel`.
    ///
    /// # Panics
    ///
    /// Panics if `bel` is invalid or does not exist at its tile.
    pub fn bel_name(&self, bel: BelId) -> String {
        format!(
            "{}/{}",
            bel.loc,
            self.interner.resolve(self.bel_basename(bel))
        )
    }

    /// Returns the canonical name of `wire`.
    ///
    /// # Panics
    ///
    /// Panics if `wire` is invalid or does not exist at its tile.
    pub fn wire_name(&self, wire: WireId) -> String {
        format!(
            "{}/{}",
            wire.loc,
            self.interner.resolve(self.wire_basename(wire))
        )
    }

    /// Returns the canonical name of `pip`. This is the exact form
    /// [`Device::pip_by_name`] resolves, so the two invert each other for
    /// every pip traversal can produce.
    ///
    /// # Panics
    ///
    /// Panics if `pip` is invalid, does not exist at its tile, or is a
    /// port pip through an unstitched port.
    pub fn pip_name(&self, pip: PipId) -> String {
        assert!(pip.is_valid(), "invalid pip has no name");
        let tt = self.tile_type_at(pip.loc);
        match pip.kind {
            PipKind::Pip => {
                let data = &tt.pips[pip.index as usize];
                let src = self.interner.resolve(tt.wires[data.src_wire as usize].name);
                let dst = self.interner.resolve(tt.wires[data.dst_wire as usize].name);
                format!("{}/{src}.->.{dst}", pip.loc)
            }
            PipKind::Port => {
                let port = self.interner.resolve(tt.ports[pip.index as usize].name);
                let dst = self.pip_dst_wire(pip);
                let dst = self.interner.resolve(self.wire_basename(dst));
                format!("{}/{port}/{}.->.{dst}", pip.loc, pip.subindex)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{BelTypeData, DeviceDb, TileTypeData};
    use weft_common::Interner;

    // Single tile with wires A and B, an A -> B pip, and one bel SLICE0.
    fn pip_device() -> Device {
        let interner = Interner::new();
        let mut db = DeviceDb::new("dev", 1, 1);
        let slice = db.add_bel_type(BelTypeData {
            name: interner.get_or_intern("SLICE"),
            pins: vec![],
        });
        let mut tt = TileTypeData::new(interner.get_or_intern("CLB"));
        let a = tt.add_wire(interner.get_or_intern("A"));
        let b = tt.add_wire(interner.get_or_intern("B"));
        tt.add_pip(a, b);
        tt.add_bel(interner.get_or_intern("SLICE0"), slice, vec![]);
        db.add_tile_type(tt);
        Device::new(db, interner)
    }

    // Two tiles; port P (wire E) at (0,0) stitched to port Q (wire W) at (1,0).
    fn linked_device(stitch: bool) -> Device {
        let interner = Interner::new();
        let mut db = DeviceDb::new("dev", 2, 1);
        let mut tt = TileTypeData::new(interner.get_or_intern("INT"));
        let e = tt.add_wire(interner.get_or_intern("E"));
        let w = tt.add_wire(interner.get_or_intern("W"));
        tt.add_port(interner.get_or_intern("P"), vec![e]);
        tt.add_port(interner.get_or_intern("Q"), vec![w]);
        db.add_tile_type(tt);
        let mut device = Device::new(db, interner);
        if stitch {
            device.connect_ports(Loc::new(0, 0), 0, Loc::new(1, 0), 1);
        }
        device
    }

    #[test]
    fn split_name_takes_first_two_separators() {
        assert_eq!(split_name("X3/Y14/ALPHA"), (3, 14, "ALPHA"));
        assert_eq!(split_name("X0/Y0/P/0.->.W"), (0, 0, "P/0.->.W"));
    }

    #[test]
    #[should_panic(expected = "malformed resource name")]
    fn split_name_without_second_separator_is_fatal() {
        split_name("X0/Y0");
    }

    #[test]
    #[should_panic(expected = "malformed resource name")]
    fn split_name_without_any_separator_is_fatal() {
        split_name("X0Y0SLICE");
    }

    #[test]
    #[should_panic(expected = "bad coordinate")]
    fn split_name_with_non_numeric_coordinate_is_fatal() {
        split_name("Xq/Y0/W");
    }

    #[test]
    fn bel_by_name_resolves_and_memoizes() {
        let device = pip_device();
        let bel = device.bel_by_name("X0/Y0/SLICE0");
        assert_eq!(bel, BelId::new(Loc::new(0, 0), 0));
        // Second lookup comes out of the cache with the same answer.
        assert_eq!(device.bel_by_name("X0/Y0/SLICE0"), bel);
    }

    #[test]
    fn bel_by_name_miss_returns_sentinel() {
        let device = pip_device();
        assert_eq!(device.bel_by_name("X0/Y0/NOPE"), BelId::INVALID);
        // Misses are not memoized as hits.
        assert_eq!(device.bel_by_name("X0/Y0/NOPE"), BelId::INVALID);
    }

    #[test]
    fn bel_by_name_outside_grid_returns_sentinel() {
        let device = pip_device();
        assert_eq!(device.bel_by_name("X9/Y9/SLICE0"), BelId::INVALID);
        assert_eq!(device.bel_by_name("X-1/Y-1/SLICE0"), BelId::INVALID);
    }

    #[test]
    fn wire_by_name_resolves() {
        let device = pip_device();
        assert_eq!(device.wire_by_name("X0/Y0/A"), WireId::new(Loc::new(0, 0), 0));
        assert_eq!(device.wire_by_name("X0/Y0/B"), WireId::new(Loc::new(0, 0), 1));
        assert_eq!(device.wire_by_name("X0/Y0/C"), WireId::INVALID);
        assert_eq!(device.wire_by_name("X5/Y0/A"), WireId::INVALID);
    }

    #[test]
    fn bel_and_wire_names_roundtrip() {
        let device = pip_device();
        let bel = BelId::new(Loc::new(0, 0), 0);
        assert_eq!(device.bel_name(bel), "X0/Y0/SLICE0");
        assert_eq!(device.bel_by_name(&device.bel_name(bel)), bel);

        let wire = WireId::new(Loc::new(0, 0), 1);
        assert_eq!(device.wire_name(wire), "X0/Y0/B");
        assert_eq!(device.wire_by_name(&device.wire_name(wire)), wire);
    }

    #[test]
    fn intra_tile_pip_name_roundtrip() {
        let device = pip_device();
        let pip = device.pip_by_name("X0/Y0/A.->.B");
        assert_eq!(pip, PipId::new_pip(Loc::new(0, 0), 0));
        assert_eq!(device.pip_name(pip), "X0/Y0/A.->.B");
    }

    #[test]
    #[should_panic(expected = "no pip named")]
    fn unknown_pip_name_is_fatal() {
        let device = pip_device();
        device.pip_by_name("X0/Y0/A.->.NOPE");
    }

    #[test]
    fn port_pip_names_resolve_on_both_sides() {
        let device = linked_device(true);
        // Hop out of (0,0) through P.
        let out = device.pip_by_name("X0/Y0/P/0.->.W");
        assert_eq!(out, PipId::new_port(Loc::new(0, 0), 0, 0));
        assert_eq!(device.pip_name(out), "X0/Y0/P/0.->.W");
        // Hop the other way, out of (1,0) through Q.
        let back = device.pip_by_name("X1/Y0/Q/0.->.E");
        assert_eq!(back, PipId::new_port(Loc::new(1, 0), 1, 0));
        assert_eq!(device.pip_name(back), "X1/Y0/Q/0.->.E");
    }

    #[test]
    #[should_panic(expected = "no pip named")]
    fn unstitched_port_pip_has_no_name_to_resolve() {
        let device = linked_device(false);
        device.pip_by_name("X0/Y0/P/0.->.W");
    }

    #[test]
    fn pip_kind_survives_resolution() {
        let device = linked_device(true);
        let hop = device.pip_by_name("X0/Y0/P/0.->.W");
        assert_eq!(hop.kind, PipKind::Port);
        let device = pip_device();
        let switch = device.pip_by_name("X0/Y0/A.->.B");
        assert_eq!(switch.kind, PipKind::Pip);
    }
}
