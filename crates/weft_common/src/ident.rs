//! Interned identifiers for cheap cloning and O(1) equality comparison.

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// A unique identifier for any named entity in the device fabric.
///
/// Identifiers are interned strings represented as a `u32` index into a
/// string interner. This provides O(1) equality comparison and O(1) cloning.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Ident(u32);

impl Ident {
    /// The empty identifier, used as the "no name" sentinel throughout the
    /// device model. [`Interner::new`] interns the empty string first, so
    /// this handle always resolves to `""`.
    pub const EMPTY: Self = Self(0);

    /// Creates an `Ident` from a raw `u32` index.
    ///
    /// This is primarily intended for deserialization and testing.
    /// In normal use, identifiers should be created through [`Interner::get_or_intern`].
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index of this identifier.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    /// Returns `true` if this is the empty sentinel identifier.
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

// SAFETY: `Ident` wraps a `u32` which is always a valid `usize` on 32-bit and
// 64-bit platforms. `try_from_usize` rejects values that don't fit in `u32`.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Ident)
    }
}

/// Thread-safe string interner backed by [`lasso::ThreadedRodeo`].
///
/// All bel, wire, pip, port, and cell names are interned to provide O(1)
/// equality, O(1) cloning, and string deduplication. Interning is
/// append-only; nothing is ever evicted.
pub struct Interner {
    rodeo: ThreadedRodeo<Ident>,
}

impl Interner {
    /// Creates a new interner.
    ///
    /// The empty string is interned immediately so that index 0, and with it
    /// [`Ident::EMPTY`], is always a valid handle.
    pub fn new() -> Self {
        let rodeo = ThreadedRodeo::new();
        let empty = rodeo.get_or_intern("");
        assert_eq!(empty, Ident::EMPTY);
        Self { rodeo }
    }

    /// Interns a string, returning its [`Ident`]. If the string was already
    /// interned, returns the existing identifier without allocating.
    pub fn get_or_intern(&self, s: &str) -> Ident {
        self.rodeo.get_or_intern(s)
    }

    /// Resolves an [`Ident`] back to its string value.
    ///
    /// # Panics
    ///
    /// Panics if the `Ident` was not created by this interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.rodeo.resolve(&ident)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
