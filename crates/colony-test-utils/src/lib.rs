//! Test utilities for colony development.
//!
//! Provides [`Tagged`], a value carrying a removal mark for exercising
//! `remove_if`, a [`ReferenceModel`] oracle backed by a plain `Vec`, and
//! the seeded [`Workload`] generator in [`workload`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod workload;

pub use workload::{Op, OpMix, Workload};

use colony_core::Removable;

/// A value plus a removal mark.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tagged<T> {
    pub value: T,
    pub removed: bool,
}

impl<T> Tagged<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            removed: false,
        }
    }

    /// Set the removal mark.
    pub fn mark(&mut self) {
        self.removed = true;
    }
}

impl<T> Removable for Tagged<T> {
    fn is_removed(&self) -> bool {
        self.removed
    }
}

/// Sequence oracle with the colony's positional semantics.
///
/// Every operation mirrors the colony operation of the same name on a
/// `Vec<T>`, so a test can apply the same script to both and compare.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceModel<T> {
    items: Vec<T>,
}

impl<T> ReferenceModel<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push_back(&mut self, value: T) {
        self.items.push(value);
    }

    pub fn push_front(&mut self, value: T) {
        self.items.insert(0, value);
    }

    pub fn insert(&mut self, position: usize, value: T) {
        self.items.insert(position, value);
    }

    /// Erase at `position` and return the position of the follower.
    pub fn erase(&mut self, position: usize) -> usize {
        self.items.remove(position);
        position
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut T> {
        self.items.get_mut(position)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current contents in order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Removable> ReferenceModel<T> {
    /// Drop every marked element; returns how many were dropped.
    pub fn remove_if(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.is_removed());
        before - self.items.len()
    }
}
