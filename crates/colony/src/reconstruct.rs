//! Order index reconstruction after a storage copy.
//!
//! A deep copy of a storage issues new handles and gives no map from old
//! to new. What it does guarantee is that its natural order mirrors the
//! source element for element. So each source entry is located by identity
//! in the source's natural order, and the entry at the same offset in the
//! copy is the new handle.
//!
//! The lookup cursor advances monotonically: for an index built by
//! appending into fresh slots, each entry is found just past the previous
//! one and the whole rebuild is one pass over the source. Positional
//! inserts, prepends and recycled slots break that ordering. The first
//! entry the cursor cannot find ahead of itself switches the rebuild to an
//! offset table built once over the source, so the result is correct for
//! every history. The copy's natural order is read once up front, so the
//! cost stays O(n + m) whatever the storage's positional lookup costs.

use colony_core::{Handle, StableStorage};
use indexmap::IndexMap;

use crate::order::OrderIndex;

/// Forward-only search over a storage's natural order.
struct NaturalCursor<I> {
    handles: I,
    /// Offset of the next handle `handles` will yield.
    offset: usize,
}

impl<I: Iterator<Item = Handle>> NaturalCursor<I> {
    fn new(handles: I) -> Self {
        Self { handles, offset: 0 }
    }

    /// Advance to `target` and return its offset.
    ///
    /// On a miss the cursor is exhausted.
    fn seek(&mut self, target: Handle) -> Option<usize> {
        for handle in self.handles.by_ref() {
            let offset = self.offset;
            self.offset += 1;
            if handle == target {
                return Some(offset);
            }
        }
        None
    }
}

/// Build the order index for `copy`, a deep copy of `source`.
///
/// The k-th entry of the result refers to the copy of the element that
/// the k-th entry of `source_order` refers to.
///
/// # Panics
///
/// Panics if an entry of `source_order` is not live in `source`, or if
/// `copy` does not mirror `source`'s natural order.
pub(crate) fn rebuild_order<T, S>(source: &S, source_order: &OrderIndex, copy: &S) -> OrderIndex
where
    S: StableStorage<T>,
{
    debug_assert_eq!(source.len(), copy.len(), "copy must mirror the source");

    // The copy is dense, so its natural order is collected once and
    // indexed by offset instead of resolving each offset through the
    // storage.
    let copied: Vec<Handle> = copy.handles().collect();
    let mut order = OrderIndex::with_capacity(source_order.len());
    let mut cursor = NaturalCursor::new(source.handles());
    let mut offsets: Option<IndexMap<Handle, usize>> = None;

    for handle in source_order {
        let offset = match offsets.as_ref() {
            None => match cursor.seek(handle) {
                Some(offset) => offset,
                None => {
                    let table = offsets.insert(offset_table::<T, S>(source));
                    lookup(table, handle)
                }
            },
            Some(table) => lookup(table, handle),
        };
        let mapped = copied
            .get(offset)
            .expect("copy mirrors the source natural order");
        order.push_back(*mapped);
    }

    tracing::debug!(
        entries = order.len(),
        used_offset_table = offsets.is_some(),
        "rebuilt order index for copied storage"
    );
    order
}

fn offset_table<T, S: StableStorage<T>>(source: &S) -> IndexMap<Handle, usize> {
    source
        .handles()
        .enumerate()
        .map(|(offset, handle)| (handle, offset))
        .collect()
}

fn lookup(table: &IndexMap<Handle, usize>, handle: Handle) -> usize {
    match table.get(&handle) {
        Some(&offset) => offset,
        None => panic!("order entry {handle} is not live in the source storage"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use colony_storage::{BucketStorage, StorageConfig};

    fn storage() -> BucketStorage<u32> {
        BucketStorage::with_config(StorageConfig::new(2, 8))
    }

    fn values(storage: &BucketStorage<u32>, order: &OrderIndex) -> Vec<u32> {
        order.iter().map(|h| *storage.get(h).unwrap()).collect()
    }

    #[test]
    fn append_only_history() {
        let mut s = storage();
        let order: OrderIndex = (0..20).map(|v| s.insert(v)).collect();
        let copy = s.clone();
        let rebuilt = rebuild_order::<u32, _>(&s, &order, &copy);
        assert_eq!(values(&copy, &rebuilt), (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn reversed_order_falls_back() {
        let mut s = storage();
        let mut order = OrderIndex::new();
        for v in 0..10 {
            let h = s.insert(v);
            order.push_front(h);
        }
        let copy = s.clone();
        let rebuilt = rebuild_order::<u32, _>(&s, &order, &copy);
        assert_eq!(values(&copy, &rebuilt), (0..10).rev().collect::<Vec<_>>());
    }

    #[test]
    fn recycled_slot_appended_last() {
        let mut s = storage();
        let mut order = OrderIndex::new();
        for v in 1..=3 {
            order.push_back(s.insert(v));
        }
        let first = order.remove(0);
        s.erase(first);
        // Reuses the front slot but is appended at the back.
        order.push_back(s.insert(4));

        let copy = s.clone();
        let rebuilt = rebuild_order::<u32, _>(&s, &order, &copy);
        assert_eq!(values(&copy, &rebuilt), vec![2, 3, 4]);
    }

    #[test]
    fn rebuilt_handles_belong_to_copy() {
        let mut s = storage();
        let order: OrderIndex = (0..5).map(|v| s.insert(v)).collect();
        let copy = s.clone();
        let rebuilt = rebuild_order::<u32, _>(&s, &order, &copy);
        for (old, new) in order.iter().zip(rebuilt.iter()) {
            assert_ne!(old, new);
            assert_eq!(new.storage(), copy.id());
        }
    }

    #[test]
    fn partial_order_skips_detached_elements() {
        let mut s = storage();
        let all: Vec<_> = (0..6).map(|v| s.insert(v)).collect();
        let order: OrderIndex = all.iter().copied().filter(|&h| s.get(h) != Some(&1)).collect();
        let copy = s.clone();
        let rebuilt = rebuild_order::<u32, _>(&s, &order, &copy);
        assert_eq!(values(&copy, &rebuilt).len(), 5);
        assert!(!values(&copy, &rebuilt).contains(&1));
    }

    #[test]
    fn cursor_reports_offsets() {
        let id = colony_core::StorageId::next();
        let hs: Vec<_> = (0..4).map(|i| Handle::new(id, 0, i, 0)).collect();
        let mut cursor = NaturalCursor::new(hs.clone().into_iter());
        assert_eq!(cursor.seek(hs[1]), Some(1));
        assert_eq!(cursor.seek(hs[3]), Some(3));
        assert_eq!(cursor.seek(hs[0]), None);
    }

    /// Storage that counts positional lookups and natural-order walks.
    struct Counted {
        inner: BucketStorage<u32>,
        handle_at_calls: Cell<usize>,
        walks: Cell<usize>,
    }

    impl Counted {
        fn new() -> Self {
            Self {
                inner: storage(),
                handle_at_calls: Cell::new(0),
                walks: Cell::new(0),
            }
        }

        fn copy(&self) -> Self {
            Self {
                inner: self.inner.clone(),
                handle_at_calls: Cell::new(0),
                walks: Cell::new(0),
            }
        }
    }

    impl StableStorage<u32> for Counted {
        type Handles<'a>
            = colony_storage::Handles<'a, u32>
        where
            Self: 'a;

        fn insert(&mut self, value: u32) -> Handle {
            self.inner.insert(value)
        }

        fn erase(&mut self, handle: Handle) -> Option<u32> {
            self.inner.erase(handle)
        }

        fn get(&self, handle: Handle) -> Option<&u32> {
            self.inner.get(handle)
        }

        fn get_mut(&mut self, handle: Handle) -> Option<&mut u32> {
            self.inner.get_mut(handle)
        }

        fn handles(&self) -> Self::Handles<'_> {
            self.walks.set(self.walks.get() + 1);
            self.inner.handles()
        }

        fn handle_at(&self, offset: usize) -> Option<Handle> {
            self.handle_at_calls.set(self.handle_at_calls.get() + 1);
            self.inner.handle_at(offset)
        }

        fn len(&self) -> usize {
            self.inner.len()
        }

        fn capacity(&self) -> usize {
            self.inner.capacity()
        }

        fn reserve(&mut self, additional: usize) {
            self.inner.reserve(additional);
        }

        fn memory_bytes(&self) -> usize {
            self.inner.memory_bytes()
        }

        fn clear(&mut self) {
            self.inner.clear();
        }
    }

    #[test]
    fn copy_is_walked_once_without_positional_lookups() {
        let mut s = Counted::new();
        let mut order = OrderIndex::new();
        for v in 0..500 {
            let h = s.insert(v);
            if v % 3 == 0 {
                order.push_front(h);
            } else {
                order.push_back(h);
            }
        }
        let copy = s.copy();
        let rebuilt = rebuild_order::<u32, _>(&s, &order, &copy);

        assert_eq!(copy.handle_at_calls.get(), 0);
        assert_eq!(s.handle_at_calls.get(), 0);
        assert_eq!(copy.walks.get(), 1);
        // Cursor walk plus the one-off offset table.
        assert!(s.walks.get() <= 2);
        let expected: Vec<u32> = order.iter().map(|h| *s.get(h).unwrap()).collect();
        let got: Vec<u32> = rebuilt.iter().map(|h| *copy.get(h).unwrap()).collect();
        assert_eq!(got, expected);
    }

    #[test]
    #[should_panic(expected = "is not live in the source storage")]
    fn dead_entry_panics() {
        let mut s = storage();
        let mut order: OrderIndex = (0..3).map(|v| s.insert(v)).collect();
        let dead = s.insert(9);
        s.erase(dead);
        order.push_back(dead);
        let copy = s.clone();
        rebuild_order::<u32, _>(&s, &order, &copy);
    }
}
