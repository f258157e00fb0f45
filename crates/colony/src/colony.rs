//! The ordered colony combinator.
//!
//! [`PointerColony`] pairs a [`StableStorage`] with an [`OrderIndex`]. The
//! storage owns the elements and gives O(1) erase anywhere; the order
//! index fixes the iteration order, independent of where the storage
//! physically keeps each element.
//!
//! # Invariant
//!
//! Every order entry refers to a live element, and no element appears in
//! the order twice. Outside of [`remove_if`](PointerColony::remove_if)
//! every live element has exactly one entry. `remove_if` drops entries
//! without erasing their elements; those elements stay *detached* in the
//! storage until [`reclaim_detached`](PointerColony::reclaim_detached),
//! [`clear`](PointerColony::clear) or drop.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use colony_core::{ConfigError, Handle, Removable, StableStorage};
use colony_storage::BucketStorage;
use indexmap::IndexSet;

use crate::config::ColonyConfig;
use crate::cursor::CursorMut;
use crate::iter::{IntoIter, Iter};
use crate::order::{self, OrderIndex, BLOCK_BYTES};
use crate::reconstruct;

/// Ordered container with stable element handles.
///
/// Elements are stored in `S` (by default a [`BucketStorage`]) and visited
/// in the order of an auxiliary handle sequence. Positions are `usize`
/// offsets into that sequence; handles are `Copy` tokens that stay valid
/// until their element is erased.
///
/// # Example
///
/// ```
/// use colony::PointerColony;
///
/// let mut colony = PointerColony::new();
/// colony.push_back('a');
/// colony.push_back('c');
/// colony.insert(1, 'b');
///
/// let next = colony.erase(0);
/// assert_eq!(colony[next], 'b');
/// assert_eq!(colony.iter().collect::<String>(), "bc");
/// ```
pub struct PointerColony<T, S = BucketStorage<T>> {
    storage: S,
    order: OrderIndex,
    /// Live elements with no order entry (dropped by `remove_if`).
    detached: usize,
    _marker: PhantomData<T>,
}

impl<T> PointerColony<T> {
    /// Create an empty colony backed by a default [`BucketStorage`].
    pub fn new() -> Self {
        Self::from_storage(BucketStorage::new())
    }

    /// Create an empty colony with room for `capacity` elements.
    ///
    /// Reserves storage and order capacity; no elements are created.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut colony = Self::new();
        colony.reserve(capacity);
        colony
    }

    /// Create an empty colony from a configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configuration fails [`ColonyConfig::validate`].
    pub fn with_config(config: ColonyConfig) -> Self {
        match Self::try_with_config(config) {
            Ok(colony) => colony,
            Err(e) => panic!("invalid colony config: {e}"),
        }
    }

    /// Create an empty colony, rejecting an invalid configuration.
    pub fn try_with_config(config: ColonyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let storage = BucketStorage::try_with_config(config.storage)?;
        Ok(Self {
            storage,
            order: OrderIndex::with_capacity(config.order_capacity),
            detached: 0,
            _marker: PhantomData,
        })
    }
}

impl<T, S: StableStorage<T>> PointerColony<T, S> {
    /// Wrap an existing storage.
    ///
    /// Elements already in `storage` are adopted in its natural order.
    pub fn from_storage(storage: S) -> Self {
        let order = storage.handles().collect();
        Self {
            storage,
            order,
            detached: 0,
            _marker: PhantomData,
        }
    }

    /// Append `value` at the end.
    pub fn push_back(&mut self, value: T) -> Handle {
        let handle = self.storage.insert(value);
        self.order.push_back(handle);
        handle
    }

    /// Prepend `value` at the front.
    pub fn push_front(&mut self, value: T) -> Handle {
        let handle = self.storage.insert(value);
        self.order.push_front(handle);
        handle
    }

    /// Insert `value` so that it ends up at `position`.
    ///
    /// The storage insert is O(1); the order insert is O(min(k, n - k)).
    ///
    /// # Panics
    ///
    /// Panics if `position > len()`.
    pub fn insert(&mut self, position: usize, value: T) -> Handle {
        assert!(
            position <= self.order.len(),
            "insert position {position} out of bounds (len {})",
            self.order.len()
        );
        let handle = self.storage.insert(value);
        self.order.insert(position, handle);
        handle
    }

    /// Erase the element at `position`.
    ///
    /// Returns the position of the element that followed it, which is
    /// `position` itself; `len()` means there was none. Later positions
    /// shift down by one.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()`.
    pub fn erase(&mut self, position: usize) -> usize {
        self.remove(position);
        position
    }

    /// Erase the element at `position` and return it.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()`.
    pub fn remove(&mut self, position: usize) -> T {
        let handle = match self.order.get(position) {
            Some(handle) => handle,
            None => panic!(
                "erase position {position} out of bounds (len {})",
                self.order.len()
            ),
        };
        let value = self
            .storage
            .erase(handle)
            .expect("order entry refers to a live element");
        self.order.remove(position);
        self.debug_check();
        value
    }

    /// Erase the element behind `handle`, wherever it is.
    ///
    /// Also reclaims detached elements. O(n) for the order lookup. Returns
    /// `None` if the handle is stale or foreign.
    pub fn erase_handle(&mut self, handle: Handle) -> Option<T> {
        if !self.storage.contains(handle) {
            return None;
        }
        match self.order.position_of(handle) {
            Some(position) => Some(self.remove(position)),
            None => {
                let value = self.storage.erase(handle)?;
                self.detached -= 1;
                self.debug_check();
                Some(value)
            }
        }
    }

    /// Remove and return the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        let handle = self.order.pop_front()?;
        let value = self
            .storage
            .erase(handle)
            .expect("order entry refers to a live element");
        Some(value)
    }

    /// Remove and return the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        let handle = self.order.pop_back()?;
        let value = self
            .storage
            .erase(handle)
            .expect("order entry refers to a live element");
        Some(value)
    }

    /// The element at `position`.
    pub fn get(&self, position: usize) -> Option<&T> {
        let handle = self.order.get(position)?;
        self.storage.get(handle)
    }

    /// Mutable access to the element at `position`.
    pub fn get_mut(&mut self, position: usize) -> Option<&mut T> {
        let handle = self.order.get(position)?;
        self.storage.get_mut(handle)
    }

    /// The element behind `handle`, O(1).
    ///
    /// Detached elements are still reachable this way.
    pub fn get_by_handle(&self, handle: Handle) -> Option<&T> {
        self.storage.get(handle)
    }

    /// Mutable access to the element behind `handle`, O(1).
    pub fn get_by_handle_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.storage.get_mut(handle)
    }

    /// The handle at `position`.
    pub fn handle_at(&self, position: usize) -> Option<Handle> {
        self.order.get(position)
    }

    /// Position of `handle`, by linear search.
    pub fn position_of(&self, handle: Handle) -> Option<usize> {
        self.order.position_of(handle)
    }

    /// The first element.
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// The last element.
    pub fn back(&self) -> Option<&T> {
        self.order.back().and_then(|h| self.storage.get(h))
    }

    /// Elements in colony order.
    pub fn iter(&self) -> Iter<'_, T, S> {
        Iter {
            handles: self.order.iter(),
            storage: &self.storage,
            _marker: PhantomData,
        }
    }

    /// Handles in colony order.
    pub fn handles(&self) -> order::Iter<'_> {
        self.order.iter()
    }

    /// Call `f` on every element in colony order.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        for handle in self.order.iter() {
            if let Some(value) = self.storage.get_mut(handle) {
                f(value);
            }
        }
    }

    /// A cursor at the first element, able to erase while walking forward.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, S> {
        CursorMut::new(self, 0)
    }

    /// A cursor at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position > len()`.
    pub fn cursor_at_mut(&mut self, position: usize) -> CursorMut<'_, T, S> {
        assert!(
            position <= self.order.len(),
            "cursor position {position} out of bounds (len {})",
            self.order.len()
        );
        CursorMut::new(self, position)
    }

    /// Number of elements in colony order.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the colony has no elements in its order.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of elements held by the storage, detached ones included.
    pub fn storage_len(&self) -> usize {
        self.storage.len()
    }

    /// Number of live elements with no order entry.
    pub fn detached_len(&self) -> usize {
        self.detached
    }

    /// Approximate number of elements that fit before either member has
    /// to allocate.
    ///
    /// Informational only; the figure depends on the storage backend's
    /// bucket sizing and is not comparable across backends.
    pub fn capacity(&self) -> usize {
        let storage_room = self.storage.capacity() - self.storage.len();
        (self.order.len() + storage_room).min(self.order.capacity())
    }

    /// The element count rounded up to whole 512-byte blocks of `T`.
    ///
    /// Mirrors the block-based estimate of a segmented sequence; kept for
    /// comparisons against containers that report capacity that way.
    pub fn block_capacity(&self) -> usize {
        let element = std::mem::size_of::<T>().max(1);
        ((self.storage.len() * element) / BLOCK_BYTES + 1) * BLOCK_BYTES / element
    }

    /// Approximate memory footprint in bytes.
    ///
    /// Storage footprint, plus the order index rounded to whole blocks,
    /// plus this struct's own fields.
    pub fn memory_bytes(&self) -> usize {
        self.storage.memory_bytes()
            + self.order.memory_bytes()
            + (std::mem::size_of::<Self>() - std::mem::size_of::<S>())
    }

    /// Reserve room for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        self.storage.reserve(additional);
        self.order.reserve(additional);
    }

    /// Remove every element, detached ones included.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.order.clear();
        self.detached = 0;
    }

    /// Keep only the elements for which `keep` returns `true`.
    ///
    /// Unlike [`remove_if`](Self::remove_if), dropped elements are erased
    /// from the storage as well. Returns the number erased.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let storage = &self.storage;
        let mut doomed = Vec::new();
        self.order.retain(|handle| {
            let kept = storage.get(handle).is_some_and(&mut keep);
            if !kept {
                doomed.push(handle);
            }
            kept
        });
        for handle in &doomed {
            let erased = self.storage.erase(*handle);
            debug_assert!(erased.is_some(), "rejected entry {handle} was not live");
        }
        self.debug_check();
        doomed.len()
    }

    /// Erase every detached element from the storage.
    ///
    /// Returns the number erased. O(n) when anything is detached.
    pub fn reclaim_detached(&mut self) -> usize {
        if self.detached == 0 {
            return 0;
        }
        let ordered: IndexSet<Handle> = self.order.iter().collect();
        let orphans: Vec<Handle> = self
            .storage
            .handles()
            .filter(|h| !ordered.contains(h))
            .collect();
        for handle in &orphans {
            let erased = self.storage.erase(*handle);
            debug_assert!(erased.is_some(), "detached element {handle} was not live");
        }
        tracing::debug!(reclaimed = orphans.len(), "reclaimed detached elements");
        self.detached = 0;
        self.debug_check();
        orphans.len()
    }

    /// Borrow the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Borrow the order index.
    pub fn order(&self) -> &OrderIndex {
        &self.order
    }

    fn debug_check(&self) {
        debug_assert_eq!(
            self.order.len() + self.detached,
            self.storage.len(),
            "order entries plus detached elements must equal live elements"
        );
    }
}

impl<T: Removable, S: StableStorage<T>> PointerColony<T, S> {
    /// Drop every order entry whose element is marked removed.
    ///
    /// One forward pass over the order; unmarked entries keep their
    /// relative order and the order shrinks by exactly the marked count,
    /// which is returned. The storage is not touched: marked elements stay
    /// allocated (detached) until [`reclaim_detached`](Self::reclaim_detached),
    /// [`clear`](Self::clear) or drop. Use [`purge_removed`](Self::purge_removed)
    /// to release them immediately.
    pub fn remove_if(&mut self) -> usize {
        let storage = &self.storage;
        let scanned = self.order.len();
        let dropped = self
            .order
            .retain(|handle| storage.get(handle).is_some_and(|v| !v.is_removed()));
        self.detached += dropped;
        tracing::debug!(scanned, dropped, "compacted order index");
        self.debug_check();
        dropped
    }

    /// Like [`remove_if`](Self::remove_if), but also erases the marked
    /// elements from the storage. Returns the number erased.
    pub fn purge_removed(&mut self) -> usize {
        let erased = self.retain(|v| !v.is_removed());
        tracing::debug!(erased, "purged removed elements");
        erased
    }
}

impl<T, S: StableStorage<T> + Default> Default for PointerColony<T, S> {
    fn default() -> Self {
        Self::from_storage(S::default())
    }
}

impl<T, S> Clone for PointerColony<T, S>
where
    S: StableStorage<T> + Clone,
{
    /// Deep-copy the storage and rebuild the order against the copy.
    fn clone(&self) -> Self {
        let storage = self.storage.clone();
        let order = reconstruct::rebuild_order::<T, S>(&self.storage, &self.order, &storage);
        Self {
            storage,
            order,
            detached: self.detached,
            _marker: PhantomData,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.storage.clone_from(&source.storage);
        self.order = reconstruct::rebuild_order::<T, S>(&source.storage, &source.order, &self.storage);
        self.detached = source.detached;
    }
}

impl<T: fmt::Debug, S: StableStorage<T>> fmt::Debug for PointerColony<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, S: StableStorage<T>> PartialEq for PointerColony<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, S: StableStorage<T>> Eq for PointerColony<T, S> {}

impl<T, S: StableStorage<T>> Index<usize> for PointerColony<T, S> {
    type Output = T;

    fn index(&self, position: usize) -> &T {
        match self.get(position) {
            Some(value) => value,
            None => panic!("position {position} out of bounds (len {})", self.len()),
        }
    }
}

impl<T, S: StableStorage<T>> IndexMut<usize> for PointerColony<T, S> {
    fn index_mut(&mut self, position: usize) -> &mut T {
        let len = self.len();
        match self.get_mut(position) {
            Some(value) => value,
            None => panic!("position {position} out of bounds (len {len})"),
        }
    }
}

impl<'a, T, S: StableStorage<T>> IntoIterator for &'a PointerColony<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, S>;

    fn into_iter(self) -> Iter<'a, T, S> {
        self.iter()
    }
}

impl<T, S: StableStorage<T>> IntoIterator for PointerColony<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T, S>;

    fn into_iter(self) -> IntoIter<T, S> {
        IntoIter {
            handles: self.order.into_iter(),
            storage: self.storage,
            _marker: PhantomData,
        }
    }
}

impl<T, S: StableStorage<T> + Default> FromIterator<T> for PointerColony<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut colony = Self::default();
        colony.extend(iter);
        colony
    }
}

impl<T, S: StableStorage<T>> Extend<T> for PointerColony<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(lower);
        for value in iter {
            self.push_back(value);
        }
    }
}
