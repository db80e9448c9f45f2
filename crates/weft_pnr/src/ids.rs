//! Opaque ID newtypes for netlist entities.
//!
//! [`CellId`] and [`NetId`] are thin `u32` wrappers indexing into the flat
//! vectors of a [`Netlist`](crate::Netlist). They are `Copy`, `Hash`, and
//! `Serialize`/`Deserialize`.

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

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a cell in the netlist.
    CellId
);

define_id!(
    /// Opaque, copyable ID for a net in the netlist.
    NetId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn cell_id_roundtrip() {
        let id = CellId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
    }

    #[test]
    fn ids_are_hashable() {
        let mut set = HashSet::new();
        set.insert(NetId::from_raw(1));
        set.insert(NetId::from_raw(2));
        set.insert(NetId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_is_the_raw_index() {
        assert_eq!(format!("{}", CellId::from_raw(7)), "7");
        assert_eq!(format!("{}", NetId::from_raw(0)), "0");
    }
}
