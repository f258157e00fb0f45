//! Natural-order iterators over a [`BucketStorage`](crate::BucketStorage).

use std::iter::{Enumerate, FusedIterator};
use std::slice;

use colony_core::{Handle, StorageId};

use crate::bucket::{Bucket, Slot};

/// Iterator over `(handle, &element)` pairs in natural order.
pub struct Iter<'a, T> {
    id: StorageId,
    buckets: Enumerate<slice::Iter<'a, Bucket<T>>>,
    slots: Option<(u32, Enumerate<slice::Iter<'a, Slot<T>>>)>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(id: StorageId, buckets: &'a [Bucket<T>], len: usize) -> Self {
        Self {
            id,
            buckets: buckets.iter().enumerate(),
            slots: None,
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Handle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((bucket, slots)) = &mut self.slots {
                for (slot, entry) in slots.by_ref() {
                    if let Some(value) = &entry.value {
                        self.remaining -= 1;
                        let handle = Handle::new(self.id, *bucket, slot as u32, entry.generation);
                        return Some((handle, value));
                    }
                }
            }
            let (bucket, next) = self.buckets.next()?;
            self.slots = Some((bucket as u32, next.slots.iter().enumerate()));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Iterator over `(handle, &mut element)` pairs in natural order.
pub struct IterMut<'a, T> {
    id: StorageId,
    buckets: Enumerate<slice::IterMut<'a, Bucket<T>>>,
    slots: Option<(u32, Enumerate<slice::IterMut<'a, Slot<T>>>)>,
    remaining: usize,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(id: StorageId, buckets: &'a mut [Bucket<T>], len: usize) -> Self {
        Self {
            id,
            buckets: buckets.iter_mut().enumerate(),
            slots: None,
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = (Handle, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((bucket, slots)) = &mut self.slots {
                for (slot, entry) in slots.by_ref() {
                    let Slot { generation, value } = entry;
                    if let Some(value) = value {
                        self.remaining -= 1;
                        let handle = Handle::new(self.id, *bucket, slot as u32, *generation);
                        return Some((handle, value));
                    }
                }
            }
            let (bucket, next) = self.buckets.next()?;
            self.slots = Some((bucket as u32, next.slots.iter_mut().enumerate()));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// Iterator over live handles in natural order.
pub struct Handles<'a, T> {
    inner: Iter<'a, T>,
}

impl<'a, T> Handles<'a, T> {
    pub(crate) fn new(inner: Iter<'a, T>) -> Self {
        Self { inner }
    }
}

impl<T> Iterator for Handles<'_, T> {
    type Item = Handle;

    fn next(&mut self) -> Option<Handle> {
        self.inner.next().map(|(handle, _)| handle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Handles<'_, T> {}
impl<T> FusedIterator for Handles<'_, T> {}
