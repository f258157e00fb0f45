//! Order-index iterators over a [`PointerColony`](crate::PointerColony).

use std::collections::vec_deque;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use colony_core::StableStorage;

use crate::order;

/// Iterator over `&T` in colony order.
pub struct Iter<'a, T, S> {
    pub(crate) handles: order::Iter<'a>,
    pub(crate) storage: &'a S,
    pub(crate) _marker: PhantomData<&'a T>,
}

impl<'a, T: 'a, S: StableStorage<T>> Iterator for Iter<'a, T, S> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let handle = self.handles.next()?;
        Some(
            self.storage
                .get(handle)
                .expect("order entry refers to a live element"),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.handles.size_hint()
    }
}

impl<'a, T: 'a, S: StableStorage<T>> DoubleEndedIterator for Iter<'a, T, S> {
    fn next_back(&mut self) -> Option<&'a T> {
        let handle = self.handles.next_back()?;
        Some(
            self.storage
                .get(handle)
                .expect("order entry refers to a live element"),
        )
    }
}

impl<'a, T: 'a, S: StableStorage<T>> ExactSizeIterator for Iter<'a, T, S> {}
impl<'a, T: 'a, S: StableStorage<T>> FusedIterator for Iter<'a, T, S> {}

impl<T, S> Clone for Iter<'_, T, S> {
    fn clone(&self) -> Self {
        Self {
            handles: self.handles.clone(),
            storage: self.storage,
            _marker: PhantomData,
        }
    }
}

/// Owning iterator over the elements of a colony, in colony order.
///
/// Elements that were dropped from the order by `remove_if` are not
/// yielded; they are released together with the storage.
pub struct IntoIter<T, S> {
    pub(crate) handles: vec_deque::IntoIter<colony_core::Handle>,
    pub(crate) storage: S,
    pub(crate) _marker: PhantomData<T>,
}

impl<T, S: StableStorage<T>> Iterator for IntoIter<T, S> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let handle = self.handles.next()?;
        Some(
            self.storage
                .erase(handle)
                .expect("order entry refers to a live element"),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.handles.size_hint()
    }
}

impl<T, S: StableStorage<T>> DoubleEndedIterator for IntoIter<T, S> {
    fn next_back(&mut self) -> Option<T> {
        let handle = self.handles.next_back()?;
        Some(
            self.storage
                .erase(handle)
                .expect("order entry refers to a live element"),
        )
    }
}

impl<T, S: StableStorage<T>> ExactSizeIterator for IntoIter<T, S> {}
impl<T, S: StableStorage<T>> FusedIterator for IntoIter<T, S> {}
