//! Append-only storage over a reserved virtual address range.
//!
//! [`SparseVec`] serves working sets that append far more than they read and
//! that hold indices into the container across further growth. The backing
//! store is an anonymous demand-paged mapping: reserving a huge range up
//! front costs address space, not physical memory, and elements never move
//! once written.

use memmap2::{MmapMut, MmapOptions};
use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;

/// Default address-space reservation: 4 GiB.
const DEFAULT_RESERVATION: usize = 4 << 30;

/// An append-only vector over a fixed virtual-memory reservation.
///
/// Appends never reallocate, so an index handed out by [`SparseVec::push`]
/// addresses the same slot for the container's whole lifetime no matter how
/// many elements are appended afterwards. Reads return elements by value.
/// Appending past the reservation is a fatal error, not a silent
/// reallocation.
///
/// The container assumes a single writer; the `&mut` receiver on `push`
/// enforces that.
pub struct SparseVec<T: Copy> {
    map: MmapMut,
    len: usize,
    cap: usize,
    _marker: PhantomData<T>,
}

impl<T: Copy> SparseVec<T> {
    /// Creates a vector with the default 4 GiB reservation.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RESERVATION / size_of::<T>().max(1))
    }

    /// Creates a vector able to hold at most `cap` elements.
    ///
    /// The whole range is reserved immediately, but pages are committed only
    /// as elements are written.
    ///
    /// # Panics
    ///
    /// Panics if the reservation cannot be established.
    pub fn with_capacity(cap: usize) -> Self {
        let bytes = cap
            .checked_mul(size_of::<T>())
            .expect("sparse vec reservation overflows usize");
        let map = MmapOptions::new()
            .len(bytes.max(1))
            .map_anon()
            .expect("sparse vec failed to reserve address space");
        Self {
            map,
            len: 0,
            cap,
            _marker: PhantomData,
        }
    }

    /// Appends a value and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if the vector already holds `capacity()` elements. The
    /// reservation is fixed at construction and is never grown.
    pub fn push(&mut self, value: T) -> usize {
        assert!(
            self.len < self.cap,
            "sparse vec full: capacity is {} elements",
            self.cap
        );
        let index = self.len;
        // SAFETY: index < cap, so the slot lies within the mapping, and the
        // mapping is owned exclusively by this container.
        unsafe {
            let base = self.map.as_mut_ptr() as *mut T;
            std::ptr::write(base.add(index), value);
        }
        self.len = index + 1;
        index
    }

    /// Returns the element at `index` by value.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn get(&self, index: usize) -> T {
        assert!(
            index < self.len,
            "sparse vec index {index} out of bounds (len {})",
            self.len
        );
        // SAFETY: index < len, so the slot was initialized by `push` and is
        // never moved or rewritten afterwards.
        unsafe {
            let base = self.map.as_ptr() as *const T;
            std::ptr::read(base.add(index))
        }
    }

    /// Returns the number of elements appended so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the maximum number of elements the reservation can hold.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Iterates over the elements in append order.
    ///
    /// Each call starts a fresh pass from index 0.
    pub fn iter(&self) -> SparseVecIter<'_, T> {
        SparseVecIter {
            vec: self,
            cursor: 0,
        }
    }
}

impl<T: Copy> Default for SparseVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> fmt::Debug for SparseVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseVec")
            .field("len", &self.len)
            .field("cap", &self.cap)
            .finish()
    }
}

/// Iterator over a [`SparseVec`], yielding elements by value in append order.
pub struct SparseVecIter<'a, T: Copy> {
    vec: &'a SparseVec<T>,
    cursor: usize,
}

impl<T: Copy> Iterator for SparseVecIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.cursor >= self.vec.len {
            return None;
        }
        let value = self.vec.get(self.cursor);
        self.cursor += 1;
        Some(value)
    }
}
