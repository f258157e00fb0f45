//! The order index: a sequence of handles defining iteration order.
//!
//! [`OrderIndex`] stores no elements, only [`Handle`]s into a storage. Its
//! sequence is the colony's iteration and positional order, independent of
//! where the storage physically keeps each element.
//!
//! The backing structure is a ring buffer, so appends and prepends are
//! O(1) amortized and a positional insert or removal costs
//! O(min(k, n - k)) for position `k`.

use std::collections::vec_deque;
use std::collections::VecDeque;
use std::iter::Copied;

use colony_core::Handle;

/// Allocation block used for footprint accounting.
pub const BLOCK_BYTES: usize = 512;

/// Fixed overhead attributed to the block map of a segmented sequence.
pub const MAP_BYTES: usize = 64;

/// Iterator over the handles of an [`OrderIndex`], front to back.
pub type Iter<'a> = Copied<vec_deque::Iter<'a, Handle>>;

/// Ordered sequence of handles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderIndex {
    entries: VecDeque<Handle>,
}

impl OrderIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Create an empty index with room for `capacity` handles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a handle at the back.
    pub fn push_back(&mut self, handle: Handle) {
        self.entries.push_back(handle);
    }

    /// Prepend a handle at the front.
    pub fn push_front(&mut self, handle: Handle) {
        self.entries.push_front(handle);
    }

    /// Insert a handle so that it ends up at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position > len()`.
    pub fn insert(&mut self, position: usize, handle: Handle) {
        assert!(
            position <= self.entries.len(),
            "insert position {position} out of bounds (len {})",
            self.entries.len()
        );
        self.entries.insert(position, handle);
    }

    /// Remove and return the handle at `position`.
    ///
    /// Afterwards `position` names the entry that used to follow the
    /// removed one (or the end). Every later entry moves down by one.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()`.
    pub fn remove(&mut self, position: usize) -> Handle {
        let len = self.entries.len();
        match self.entries.remove(position) {
            Some(handle) => handle,
            None => panic!("remove position {position} out of bounds (len {len})"),
        }
    }

    /// Remove and return the first handle.
    pub fn pop_front(&mut self) -> Option<Handle> {
        self.entries.pop_front()
    }

    /// Remove and return the last handle.
    pub fn pop_back(&mut self) -> Option<Handle> {
        self.entries.pop_back()
    }

    /// The handle at `position`.
    pub fn get(&self, position: usize) -> Option<Handle> {
        self.entries.get(position).copied()
    }

    /// The first handle.
    pub fn front(&self) -> Option<Handle> {
        self.entries.front().copied()
    }

    /// The last handle.
    pub fn back(&self) -> Option<Handle> {
        self.entries.back().copied()
    }

    /// Position of `handle`, by linear search.
    pub fn position_of(&self, handle: Handle) -> Option<usize> {
        self.entries.iter().position(|&h| h == handle)
    }

    /// Handles front to back.
    pub fn iter(&self) -> Iter<'_> {
        self.entries.iter().copied()
    }

    /// Keep only the handles for which `keep` returns `true`.
    ///
    /// Single forward pass; retained handles keep their relative order and
    /// the index shrinks by exactly the number of dropped handles. Returns
    /// that number.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(Handle) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|&h| keep(h));
        before - self.entries.len()
    }

    /// Remove every handle. Keeps the allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no handles.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of handles that fit without reallocating.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Reserve room for at least `additional` more handles.
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    /// Approximate heap footprint in bytes, rounded up to whole blocks.
    pub fn memory_bytes(&self) -> usize {
        let bytes = self.entries.capacity() * std::mem::size_of::<Handle>();
        MAP_BYTES + (bytes / BLOCK_BYTES + 1) * BLOCK_BYTES
    }
}

impl<'a> IntoIterator for &'a OrderIndex {
    type Item = Handle;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl IntoIterator for OrderIndex {
    type Item = Handle;
    type IntoIter = vec_deque::IntoIter<Handle>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<Handle> for OrderIndex {
    fn from_iter<I: IntoIterator<Item = Handle>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
