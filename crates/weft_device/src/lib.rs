//! Device routing-graph model for the Weft place-and-route engine.
//!
//! A device is a rectangular grid of tiles. Each tile instantiates a tile
//! type: a shared blueprint listing the tile's bels (placement sites), wires,
//! intra-tile pips (switches), and ports (attachment points for cross-tile
//! wiring). Ports are stitched to neighboring tiles when the device is
//! built, turning the per-tile blueprints into one global routing graph
//! without materializing a per-tile copy of anything.
//!
//! [`Device`] is the query surface over that graph:
//!
//! - name resolution between canonical `X<x>/Y<y>/<local>` names and the
//!   [`BelId`]/[`WireId`]/[`PipId`] keys (see [`naming`]),
//! - uphill/downhill pip traversal for the router's edge expansion (see
//!   [`traverse`]),
//! - bel pin introspection and bel occupancy for the placer.

#![warn(missing_docs)]

pub mod db;
pub mod device;
pub mod ids;
pub mod loc;
pub mod naming;
pub mod traverse;

pub use db::{
    BelData, BelTypeData, BelTypePin, DeviceDb, PinDir, PipData, PortData, PortXref, TileTypeData,
    WireData,
};
pub use device::{Device, PortConn, Tile};
pub use ids::{BelId, BelTypeId, PipId, PipKind, TileTypeId, WireId};
pub use loc::Loc;
pub use naming::split_name;
pub use traverse::{PipDir, WirePips};
