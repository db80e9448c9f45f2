//! Shared foundational types for the Weft place-and-route engine.
//!
//! This crate provides the string interner used for all fabric and netlist
//! names, and the append-only sparse vector backing large routing-time
//! working sets.

#![warn(missing_docs)]

pub mod ident;
pub mod sparse;

pub use ident::{Ident, Interner};
pub use sparse::SparseVec;
