//! Core abstraction traits for stable storage and logical removal.

use crate::handle::Handle;

/// Address-stable element storage addressed by [`Handle`]s.
///
/// Implemented by allocator types to give ordered containers a place to
/// keep their elements. The contract the combinators rely on:
///
/// - **Stable handles**: a handle stays valid until its element is erased,
///   whatever else is inserted or erased in the meantime. Elements never
///   relocate.
/// - **O(1)** insert (amortized), erase and handle lookup.
/// - **Natural order**: [`handles`](StableStorage::handles) walks the live
///   elements in a fixed physical order, and
///   [`handle_at`](StableStorage::handle_at) indexes that same order.
/// - **Order-preserving copy**: where the storage is `Clone`, the copy must
///   issue new handle values while its natural order mirrors the source
///   element for element. Ordered combinators rebuild their own handle
///   sequences from this guarantee alone.
///
/// Stale or foreign handles are rejected (`None`), never resolved to some
/// other element.
pub trait StableStorage<T> {
    /// Iterator over live handles in natural order.
    type Handles<'a>: Iterator<Item = Handle>
    where
        Self: 'a,
        T: 'a;

    /// Store `value`, returning its handle.
    fn insert(&mut self, value: T) -> Handle;

    /// Remove and return the element behind `handle`.
    ///
    /// Returns `None` if the handle is stale or was issued elsewhere.
    fn erase(&mut self, handle: Handle) -> Option<T>;

    /// Shared access to the element behind `handle`.
    fn get(&self, handle: Handle) -> Option<&T>;

    /// Mutable access to the element behind `handle`.
    fn get_mut(&mut self, handle: Handle) -> Option<&mut T>;

    /// Whether `handle` currently refers to a live element.
    fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Live handles in natural order.
    fn handles(&self) -> Self::Handles<'_>;

    /// Handle of the element at `offset` in natural order.
    fn handle_at(&self, offset: usize) -> Option<Handle>;

    /// Element at `offset` in natural order.
    fn element_at(&self, offset: usize) -> Option<&T> {
        self.handle_at(offset).and_then(|h| self.get(h))
    }

    /// Number of live elements.
    fn len(&self) -> usize;

    /// Whether there are no live elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements that fit without allocating another bucket.
    fn capacity(&self) -> usize;

    /// Pre-allocate room for at least `additional` more elements.
    fn reserve(&mut self, additional: usize);

    /// Approximate memory footprint in bytes, including bookkeeping.
    fn memory_bytes(&self) -> usize;

    /// Drop every element. All previously issued handles become stale.
    fn clear(&mut self);
}

/// Client-controlled logical-removal flag.
///
/// Element types implement this so a container can skip or compact away
/// entries the client has marked, without the container deciding what
/// "removed" means. The container never sets the flag itself.
pub trait Removable {
    /// Whether the client has marked this element for removal.
    fn is_removed(&self) -> bool;
}

impl<T: Removable + ?Sized> Removable for Box<T> {
    fn is_removed(&self) -> bool {
        (**self).is_removed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::StorageId;

    /// Minimal slot-vector storage used to exercise the default methods.
    struct SlotVec<T> {
        id: StorageId,
        slots: Vec<Option<T>>,
    }

    impl<T> SlotVec<T> {
        fn new() -> Self {
            Self {
                id: StorageId::next(),
                slots: Vec::new(),
            }
        }

        fn handle(&self, slot: usize) -> Handle {
            Handle::new(self.id, 0, slot as u32, 0)
        }

        fn index(&self, handle: Handle) -> Option<usize> {
            (handle.storage() == self.id).then_some(handle.slot() as usize)
        }
    }

    impl<T> StableStorage<T> for SlotVec<T> {
        type Handles<'a>
            = std::vec::IntoIter<Handle>
        where
            T: 'a;

        fn insert(&mut self, value: T) -> Handle {
            self.slots.push(Some(value));
            self.handle(self.slots.len() - 1)
        }

        fn erase(&mut self, handle: Handle) -> Option<T> {
            let idx = self.index(handle)?;
            self.slots.get_mut(idx)?.take()
        }

        fn get(&self, handle: Handle) -> Option<&T> {
            self.slots.get(self.index(handle)?)?.as_ref()
        }

        fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
            let idx = self.index(handle)?;
            self.slots.get_mut(idx)?.as_mut()
        }

        fn handles(&self) -> Self::Handles<'_> {
            (0..self.slots.len())
                .filter(|&i| self.slots[i].is_some())
                .map(|i| self.handle(i))
                .collect::<Vec<_>>()
                .into_iter()
        }

        fn handle_at(&self, offset: usize) -> Option<Handle> {
            self.handles().nth(offset)
        }

        fn len(&self) -> usize {
            self.slots.iter().filter(|s| s.is_some()).count()
        }

        fn capacity(&self) -> usize {
            self.slots.capacity()
        }

        fn reserve(&mut self, additional: usize) {
            self.slots.reserve(additional);
        }

        fn memory_bytes(&self) -> usize {
            self.slots.capacity() * std::mem::size_of::<Option<T>>()
        }

        fn clear(&mut self) {
            self.slots.clear();
            self.id = StorageId::next();
        }
    }

    struct Flagged(bool);

    impl Removable for Flagged {
        fn is_removed(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn element_at_follows_natural_order() {
        let mut s = SlotVec::new();
        let a = s.insert('a');
        s.insert('b');
        s.insert('c');
        s.erase(a);
        assert_eq!(s.element_at(0), Some(&'b'));
        assert_eq!(s.element_at(1), Some(&'c'));
        assert_eq!(s.element_at(2), None);
    }

    #[test]
    fn contains_rejects_erased_handle() {
        let mut s = SlotVec::new();
        let h = s.insert(1u32);
        assert!(s.contains(h));
        s.erase(h);
        assert!(!s.contains(h));
    }

    #[test]
    fn is_empty_tracks_len() {
        let mut s = SlotVec::new();
        assert!(s.is_empty());
        let h = s.insert(());
        assert!(!s.is_empty());
        s.erase(h);
        assert!(s.is_empty());
    }

    #[test]
    fn boxed_removable_delegates() {
        let marked: Box<Flagged> = Box::new(Flagged(true));
        let kept: Box<Flagged> = Box::new(Flagged(false));
        assert!(marked.is_removed());
        assert!(!kept.is_removed());
    }
}
